//! LodUpdateEngine - one LOD pass: evaluate every patch, then fix edges.
//!
//! # Pass Structure
//!
//! 1. **Evaluate**: every patch goes to the policy, which records LOD
//!    transitions in the pass's `UpdateMap`. A quad counts as changed when any
//!    descendant changed; quads never get records of their own.
//! 2. **Fix edges**: for every patch whose LOD changed, each neighbor's
//!    facing edge is constrained to the changed patch's new LOD. Neighbors
//!    without a record get one whose LOD stays put.
//!
//! The pass reports `changed = true` when the map ends up non-empty. Trees
//! are only read; applying the map is up to the caller
//! (`QuadTree::apply_updates` / `TileGrid::apply_updates`).

use glam::Vec3;
use rayon::prelude::*;
use web_time::Instant;

use super::policy::{DistanceLodPolicy, LodPolicy};
use super::stats::{EdgeStats, LodStats};
use super::update::{PatchKey, UpdateMap, UpdatePending};
use crate::direction::Direction;
use crate::neighbor::{NeighborResolver, TileGrid};
use crate::quadtree::{NodeRef, PatchRef, QuadTree};

/// Result of one update pass.
#[derive(Clone, Debug, Default)]
pub struct LodUpdateOutput {
  /// Every patch that needs new geometry.
  pub updates: UpdateMap,
  /// Whether `updates` is non-empty.
  pub changed: bool,
  pub stats: LodStats,
}

/// Runs update passes with one LOD policy.
#[derive(Clone, Debug, Default)]
pub struct LodUpdateEngine<P = DistanceLodPolicy> {
  policy: P,
}

impl<P: LodPolicy> LodUpdateEngine<P> {
  pub fn new(policy: P) -> Self {
    Self { policy }
  }

  #[inline]
  pub fn policy(&self) -> &P {
    &self.policy
  }

  /// Evaluate `node` and everything beneath it. Returns whether any patch in
  /// the subtree changed. Every child is visited, even after a change.
  pub fn evaluate(&self, node: NodeRef<'_>, viewpoints: &[Vec3], updates: &mut UpdateMap) -> bool {
    let mut evaluated = 0;
    self.evaluate_counted(node, viewpoints, updates, &mut evaluated)
  }

  fn evaluate_counted(
    &self,
    node: NodeRef<'_>,
    viewpoints: &[Vec3],
    updates: &mut UpdateMap,
    evaluated: &mut usize,
  ) -> bool {
    if let Some(patch) = node.as_patch() {
      *evaluated += 1;
      return self.policy.decide(patch, viewpoints, updates);
    }
    let mut changed = false;
    for child in node.children() {
      changed |= self.evaluate_counted(child, viewpoints, updates, evaluated);
    }
    changed
  }

  /// Full pass over a single tree. Edges on the tree border stay
  /// unconstrained.
  #[tracing::instrument(skip_all, name = "lod::update", fields(tile = ?tree.tile()))]
  pub fn update(&self, tree: &QuadTree, viewpoints: &[Vec3]) -> LodUpdateOutput {
    let start = Instant::now();
    let mut updates = UpdateMap::new();
    let mut stats = LodStats::default();
    self.evaluate_counted(tree.root(), viewpoints, &mut updates, &mut stats.patches_evaluated);

    let tile = tree.tile();
    finish_pass(updates, stats, start, &NeighborResolver::local(), |key| {
      if key.tile == tile {
        tree.patch_by_path(key.path)
      } else {
        None
      }
    })
  }

  /// Full pass over every tile of a grid.
  ///
  /// Tiles are evaluated in parallel into separate maps; the merged map is
  /// then edge-fixed across tile borders.
  #[tracing::instrument(skip_all, name = "lod::update_grid", fields(tiles = grid.len()))]
  pub fn update_grid(&self, grid: &TileGrid, viewpoints: &[Vec3]) -> LodUpdateOutput {
    let start = Instant::now();
    let per_tile: Vec<(UpdateMap, LodStats)> = grid
      .tiles()
      .par_iter()
      .map(|(_, tree)| {
        let mut updates = UpdateMap::new();
        let mut stats = LodStats::default();
        self.evaluate_counted(tree.root(), viewpoints, &mut updates, &mut stats.patches_evaluated);
        (updates, stats)
      })
      .collect();

    let mut updates = UpdateMap::new();
    let mut stats = LodStats::default();
    for (tile_updates, tile_stats) in per_tile {
      stats.merge(&tile_stats);
      updates.extend(tile_updates);
    }

    finish_pass(updates, stats, start, &grid.resolver(), |key| grid.patch(key))
  }
}

fn finish_pass<'t>(
  mut updates: UpdateMap,
  mut stats: LodStats,
  start: Instant,
  resolver: &NeighborResolver<'t>,
  locate: impl Fn(PatchKey) -> Option<PatchRef<'t>>,
) -> LodUpdateOutput {
  stats.lod_changes = updates.values().filter(|update| update.lod_changed()).count();

  let edges = fix_edges(&mut updates, resolver, locate);
  stats.edge_constraints = edges.edge_constraints;
  stats.neighbor_records = edges.neighbor_records;
  stats.elapsed_us = start.elapsed().as_micros() as u64;

  let changed = !updates.is_empty();
  tracing::debug!(
    evaluated = stats.patches_evaluated,
    lod_changes = stats.lod_changes,
    edge_constraints = stats.edge_constraints,
    neighbor_records = stats.neighbor_records,
    elapsed_us = stats.elapsed_us,
    "lod pass complete"
  );

  LodUpdateOutput {
    updates,
    changed,
    stats,
  }
}

/// Constrain the edges facing every patch whose LOD changed.
///
/// `locate` maps a key back to its patch. Each neighbor's edge toward the
/// changed patch is set to the changed patch's new LOD, and the changed
/// patch's edge toward the neighbor to the neighbor's new LOD. A neighbor
/// with no record gets one with its current LOD as both previous and new.
/// Own LOD transitions are never touched. Running it again with the same map is a
/// no-op, and the order in which changed patches are visited does not matter.
#[tracing::instrument(skip_all, name = "lod::fix_edges", fields(updates = updates.len()))]
pub fn fix_edges<'t>(
  updates: &mut UpdateMap,
  resolver: &NeighborResolver<'t>,
  locate: impl Fn(PatchKey) -> Option<PatchRef<'t>>,
) -> EdgeStats {
  let mut changed: Vec<(PatchKey, u32)> = updates
    .iter()
    .filter(|(_, update)| update.lod_changed())
    .map(|(key, update)| (*key, update.new_lod))
    .collect();
  changed.sort_unstable_by_key(|(key, _)| key.sort_key());

  let mut stats = EdgeStats::default();
  for (key, new_lod) in changed {
    let Some(patch) = locate(key) else {
      tracing::warn!(%key, "changed patch not found while fixing edges");
      continue;
    };

    for direction in Direction::ALL {
      let Some(neighbor) = resolver.find_patch(patch, direction) else {
        continue;
      };
      let record = updates.entry(neighbor.key()).or_insert_with(|| {
        stats.neighbor_records += 1;
        UpdatePending::unchanged(neighbor)
      });
      record.set_edge_lod(direction.opposite(), new_lod);
      let neighbor_lod = record.new_lod;
      tracing::trace!(from = %key, to = %record.key, ?direction, new_lod, "constrained edge");

      if let Some(own) = updates.get_mut(&key) {
        own.set_edge_lod(direction, neighbor_lod);
      }
      stats.edge_constraints += 2;
    }
  }

  tracing::debug!(
    edge_constraints = stats.edge_constraints,
    neighbor_records = stats.neighbor_records,
    "fixed edges"
  );
  stats
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;
