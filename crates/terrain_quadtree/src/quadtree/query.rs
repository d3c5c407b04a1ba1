//! Height and normal lookup by grid coordinate, plus in-place height edits.
//!
//! Lookups descend from the root by comparing against each quad's middle
//! sample. A sample on a seam belongs to both sides; the descent prefers the
//! +x / +z child so interpolation always has a following sample available.
//! Anything that cannot be resolved (outside the root, missing child, quad
//! with fewer than four children) yields NaN / `None`.

use glam::{UVec2, Vec2, Vec3};

use super::node::{NodeId, NodeRef, PatchRef};
use super::tree::QuadTree;

impl QuadTree {
  /// Patch holding grid sample `(x, z)` and the sample's coordinate inside
  /// that patch.
  pub fn locate_patch(&self, x: i32, z: i32) -> Option<(PatchRef<'_>, i32, i32)> {
    let mut node = self.root();
    let size = node.size() as i32;
    if x < 0 || z < 0 || x >= size || z >= size {
      return None;
    }

    let (mut col, mut row) = (x, z);
    loop {
      if let Some(patch) = node.as_patch() {
        return Some((patch, col, row));
      }
      if node.child_count() != 4 {
        return None;
      }
      let shared = ((node.size() as i32 + 1) >> 1) - 1;
      let right = col >= shared;
      let bottom = row >= shared;
      if right {
        col -= shared;
      }
      if bottom {
        row -= shared;
      }
      node = node.child(quadrant_of(right, bottom))?;
    }
  }

  /// Raw height sample, NaN when the coordinate cannot be resolved.
  pub fn height_at(&self, x: i32, z: i32) -> f32 {
    self
      .locate_patch(x, z)
      .and_then(|(patch, col, row)| patch.patch().sample(col, row))
      .unwrap_or(f32::NAN)
  }

  /// Surface normal at a grid sample.
  pub fn normal_at(&self, x: i32, z: i32) -> Option<Vec3> {
    let (patch, col, row) = self.locate_patch(x, z)?;
    patch.patch().normal(col, row, self.config().scale)
  }

  /// Bilinear height between sample `(x, z)` and its +x / +z neighbors.
  pub fn interpolated_height_at(&self, x: i32, z: i32, x_frac: f32, z_frac: f32) -> f32 {
    self
      .locate_patch(x, z)
      .and_then(|(patch, col, row)| patch.patch().interpolated(col, row, x_frac, z_frac))
      .unwrap_or(f32::NAN)
  }

  /// Interpolated world-space elevation under a world `(x, z)` position.
  pub fn height_at_world(&self, xz: Vec2) -> f32 {
    let config = self.config();
    let half = (self.total_size().saturating_sub(1)) as f32 * 0.5;
    let gx = (xz.x - config.origin.x) / config.scale.x + half;
    let gz = (xz.y - config.origin.z) / config.scale.z + half;
    if !(gx >= 0.0 && gz >= 0.0) {
      return f32::NAN;
    }
    let height = self.interpolated_height_at(gx as i32, gz as i32, gx.fract(), gz.fract());
    height * config.scale.y + config.origin.y
  }

  /// Overwrite sample `(x, z)` in every patch that shares it. Returns the
  /// number of patches touched.
  pub fn set_height(&mut self, x: i32, z: i32, height: f32) -> usize {
    self.edit_height(x, z, |_| height)
  }

  /// Add `delta` to sample `(x, z)` in every patch that shares it.
  pub fn adjust_height(&mut self, x: i32, z: i32, delta: f32) -> usize {
    self.edit_height(x, z, |h| h + delta)
  }

  /// Reassemble the full `total_size × total_size` raster from the patches.
  pub fn heightmap(&self) -> Vec<f32> {
    let size = self.total_size() as usize;
    let mut raster = vec![0.0; size * size];
    for patch in self.patches() {
      let origin = patch.node().node().grid_origin();
      if origin.x as usize >= size {
        continue;
      }
      let grid = patch.patch();
      for (row, samples) in grid.heights().chunks_exact(grid.side()).enumerate() {
        let z = origin.y as usize + row;
        if z >= size {
          break;
        }
        let x = origin.x as usize;
        let count = grid.side().min(size.saturating_sub(x));
        raster[z * size + x..z * size + x + count].copy_from_slice(&samples[..count]);
      }
    }
    raster
  }

  fn edit_height(&mut self, x: i32, z: i32, edit: impl Fn(f32) -> f32) -> usize {
    if x < 0 || z < 0 {
      return 0;
    }
    let targets = self.patches_containing(UVec2::new(x as u32, z as u32));
    let scale = self.config().scale;
    for &(id, col, row) in &targets {
      if let Some(patch) = self.patch_mut(id) {
        if let Some(height) = patch.sample(col, row) {
          patch.set_sample(col, row, edit(height));
          patch.refresh_bounds(scale);
        }
      }
    }
    tracing::trace!(x, z, patches = targets.len(), "edited height sample");
    targets.len()
  }

  /// Every patch whose sub-grid contains `sample`, with local coordinates.
  fn patches_containing(&self, sample: UVec2) -> Vec<(NodeId, i32, i32)> {
    let mut found = Vec::new();
    let mut stack: Vec<NodeRef<'_>> = vec![self.root()];
    while let Some(node) = stack.pop() {
      let origin = node.node().grid_origin();
      let end = origin + UVec2::splat(node.size());
      if sample.cmplt(origin).any() || sample.cmpge(end).any() {
        continue;
      }
      if node.is_patch() {
        let local = sample - origin;
        found.push((node.id(), local.x as i32, local.y as i32));
      } else {
        stack.extend(node.children());
      }
    }
    found
  }
}

#[inline]
fn quadrant_of(right: bool, bottom: bool) -> u8 {
  match (right, bottom) {
    (false, false) => 1,
    (false, true) => 2,
    (true, false) => 3,
    (true, true) => 4,
  }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;
