//! Pending LOD transitions produced by one update pass.

use std::collections::HashMap;
use std::fmt;

use glam::IVec2;

use crate::direction::Direction;
use crate::quadtree::{NodeId, NodePath, PatchRef};

/// Stable identifier of a patch across every tile of a world.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PatchKey {
  pub tile: IVec2,
  pub path: NodePath,
}

impl PatchKey {
  #[inline]
  pub fn new(tile: IVec2, path: NodePath) -> Self {
    Self { tile, path }
  }

  /// Sort key; `IVec2` itself has no ordering.
  #[inline]
  pub(crate) fn sort_key(&self) -> (i32, i32, NodePath) {
    (self.tile.y, self.tile.x, self.path)
  }
}

impl fmt::Display for PatchKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{},{}:{}", self.tile.x, self.tile.y, self.path)
  }
}

/// Pending updates of one pass, keyed by patch.
pub type UpdateMap = HashMap<PatchKey, UpdatePending>;

/// A patch whose geometry must be regenerated after a pass.
///
/// Either the patch's own LOD changed (`previous_lod != new_lod`), or it
/// borders a patch that changed and one of its edges must be re-stitched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatePending {
  pub key: PatchKey,
  /// Node of the patch inside its tile's tree.
  pub node: NodeId,
  pub previous_lod: u32,
  pub new_lod: u32,
  /// LOD each edge must match, indexed by `Direction`. `None` = unconstrained.
  edge_lods: [Option<u32>; 4],
}

impl UpdatePending {
  /// Transition of `patch` from its current LOD to `new_lod`.
  pub fn new(patch: PatchRef<'_>, new_lod: u32) -> Self {
    Self {
      key: patch.key(),
      node: patch.id(),
      previous_lod: patch.lod(),
      new_lod,
      edge_lods: [None; 4],
    }
  }

  /// Record for a patch whose LOD stays where it is.
  pub fn unchanged(patch: PatchRef<'_>) -> Self {
    Self::new(patch, patch.lod())
  }

  /// Insert (or retarget) the transition of `patch` to `new_lod`.
  ///
  /// Edge constraints already written for the patch are kept. Returns whether
  /// the patch's LOD actually changes.
  pub fn record(updates: &mut UpdateMap, patch: PatchRef<'_>, new_lod: u32) -> bool {
    let entry = updates
      .entry(patch.key())
      .or_insert_with(|| Self::unchanged(patch));
    entry.new_lod = new_lod;
    entry.lod_changed()
  }

  #[inline]
  pub fn lod_changed(&self) -> bool {
    self.previous_lod != self.new_lod
  }

  #[inline]
  pub fn edge_lod(&self, direction: Direction) -> Option<u32> {
    self.edge_lods[direction.index()]
  }

  #[inline]
  pub fn set_edge_lod(&mut self, direction: Direction, lod: u32) {
    self.edge_lods[direction.index()] = Some(lod);
  }

  #[inline]
  pub fn right_lod(&self) -> Option<u32> {
    self.edge_lod(Direction::Right)
  }

  #[inline]
  pub fn bottom_lod(&self) -> Option<u32> {
    self.edge_lod(Direction::Down)
  }

  #[inline]
  pub fn left_lod(&self) -> Option<u32> {
    self.edge_lod(Direction::Left)
  }

  #[inline]
  pub fn top_lod(&self) -> Option<u32> {
    self.edge_lod(Direction::Top)
  }

  /// Number of edges carrying an explicit constraint.
  pub fn constraint_count(&self) -> usize {
    self.edge_lods.iter().filter(|lod| lod.is_some()).count()
  }
}

#[cfg(test)]
#[path = "update_test.rs"]
mod update_test;
