//! LOD decision capability and the default distance policy.

use glam::Vec3;

use super::update::{UpdateMap, UpdatePending};
use crate::quadtree::PatchRef;

/// Decides a patch's LOD for a set of viewpoints.
///
/// Implementations must be deterministic in `(patch, viewpoints)`. A decision
/// that changes the LOD is registered in `updates` (see
/// [`UpdatePending::record`]) and reported by returning `true`.
pub trait LodPolicy: Sync {
  fn decide(&self, patch: PatchRef<'_>, viewpoints: &[Vec3], updates: &mut UpdateMap) -> bool;
}

impl<F> LodPolicy for F
where
  F: Fn(PatchRef<'_>, &[Vec3], &mut UpdateMap) -> bool + Sync,
{
  #[inline]
  fn decide(&self, patch: PatchRef<'_>, viewpoints: &[Vec3], updates: &mut UpdateMap) -> bool {
    self(patch, viewpoints, updates)
  }
}

/// Picks the LOD from the distance to the nearest viewpoint.
///
/// Level `i` covers distances below `side * lod_multiplier * (i + 1) * scale`
/// where `side` is the patch's samples per edge; beyond the last band the
/// patch sits at its `max_lod`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceLodPolicy {
  pub lod_multiplier: f32,
  /// Pin every patch to full detail.
  pub turn_off_lod: bool,
}

impl DistanceLodPolicy {
  pub const DEFAULT: Self = Self {
    lod_multiplier: 2.7,
    turn_off_lod: false,
  };

  pub fn new(lod_multiplier: f32) -> Self {
    Self {
      lod_multiplier,
      ..Self::DEFAULT
    }
  }

  /// LOD for a patch of `side` samples seen from `distance`.
  pub fn level_for(&self, distance: f32, side: usize, scale: f32, max_lod: u32) -> u32 {
    let band = side as f32 * self.lod_multiplier * scale;
    (0..=max_lod)
      .find(|&level| distance < band * (level + 1) as f32)
      .unwrap_or(max_lod)
  }
}

impl Default for DistanceLodPolicy {
  fn default() -> Self {
    Self::DEFAULT
  }
}

impl LodPolicy for DistanceLodPolicy {
  fn decide(&self, patch: PatchRef<'_>, viewpoints: &[Vec3], updates: &mut UpdateMap) -> bool {
    if viewpoints.is_empty() {
      return false;
    }

    let new_lod = if self.turn_off_lod {
      0
    } else {
      let center = patch.world_center();
      let distance = viewpoints
        .iter()
        .map(|viewpoint| viewpoint.distance(center))
        .fold(f32::INFINITY, f32::min);
      let grid = patch.patch();
      let scale = patch.node().tree().config().scale.x;
      self.level_for(distance, grid.side(), scale, grid.max_lod())
    };

    if new_lod == patch.lod() {
      return false;
    }
    UpdatePending::record(updates, patch, new_lod)
  }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod policy_test;
