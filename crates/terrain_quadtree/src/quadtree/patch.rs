//! Patch - the terminal node payload: a square height sub-grid.

use glam::Vec3;

use super::bounds::Aabb3;
use super::config::max_lod_for_cells;
use crate::direction::Direction;
use crate::error::{Result, TerrainError};

/// Height sub-grid of a leaf node.
///
/// The grid is `side × side` samples, row-major (x = column, z = row). The
/// outermost rows and columns are shared with the adjacent patches, so edge
/// geometry and normals never need to look outside the patch.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
  pub(crate) heights: Vec<f32>,
  pub(crate) side: usize,
  /// Current detail level (0 = full detail).
  pub(crate) lod: u32,
  pub(crate) max_lod: u32,
  /// LOD each edge is stitched to, indexed by `Direction`.
  pub(crate) edge_lods: [u32; 4],
  pub(crate) bounds: Aabb3,
  pub(crate) total_size: u32,
}

impl Patch {
  /// Create a patch from `side × side` samples.
  ///
  /// `scale` is the grid step scale used for the bounding volume and
  /// `total_size` the sample count along the whole terrain edge.
  pub fn new(heights: Vec<f32>, side: usize, scale: Vec3, total_size: u32) -> Result<Self> {
    if heights.is_empty() {
      return Err(TerrainError::EmptyHeightmap);
    }
    if side < 2 || heights.len() != side * side {
      return Err(TerrainError::InvalidArgument(format!(
        "patch grid of {} samples is not {}x{}",
        heights.len(),
        side,
        side
      )));
    }
    let bounds = compute_bounds(&heights, side - 1, scale);
    Ok(Self {
      heights,
      side,
      lod: 0,
      max_lod: max_lod_for_cells((side - 1) as u32),
      edge_lods: [0; 4],
      bounds,
      total_size,
    })
  }

  /// Flat patch of `side × side` zero samples.
  pub fn flat(side: usize) -> Self {
    let side = side.max(2);
    let heights = vec![0.0; side * side];
    Self {
      bounds: compute_bounds(&heights, side - 1, Vec3::ONE),
      heights,
      side,
      lod: 0,
      max_lod: max_lod_for_cells((side - 1) as u32),
      edge_lods: [0; 4],
      total_size: side as u32,
    }
  }

  #[inline]
  pub fn heights(&self) -> &[f32] {
    &self.heights
  }

  /// Samples per edge.
  #[inline]
  pub fn side(&self) -> usize {
    self.side
  }

  /// Cells per edge.
  #[inline]
  pub fn cells(&self) -> usize {
    self.side - 1
  }

  #[inline]
  pub fn lod(&self) -> u32 {
    self.lod
  }

  #[inline]
  pub fn max_lod(&self) -> u32 {
    self.max_lod
  }

  /// LOD the edge facing `direction` is currently stitched to.
  #[inline]
  pub fn edge_lod(&self, direction: Direction) -> u32 {
    self.edge_lods[direction.index()]
  }

  /// Bounding volume in patch-local space.
  #[inline]
  pub fn bounds(&self) -> Aabb3 {
    self.bounds
  }

  /// Samples along the full terrain edge this patch was cut from.
  #[inline]
  pub fn total_size(&self) -> u32 {
    self.total_size
  }

  /// Raw sample at grid coordinates, `None` outside the grid.
  #[inline]
  pub fn sample(&self, col: i32, row: i32) -> Option<f32> {
    let index = self.index(col, row)?;
    Some(self.heights[index])
  }

  /// Bilinear interpolation between the sample at `(col, row)` and its
  /// +x / +z neighbors. Fractions are clamped to `[0, 1]`; on the last
  /// row/column the missing neighbor is the sample itself.
  pub fn interpolated(&self, col: i32, row: i32, x_frac: f32, z_frac: f32) -> Option<f32> {
    self.index(col, row)?;
    let last = self.side as i32 - 1;
    let col1 = (col + 1).min(last);
    let row1 = (row + 1).min(last);
    let xf = x_frac.clamp(0.0, 1.0);
    let zf = z_frac.clamp(0.0, 1.0);

    let h00 = self.heights[self.index(col, row)?];
    let h10 = self.heights[self.index(col1, row)?];
    let h01 = self.heights[self.index(col, row1)?];
    let h11 = self.heights[self.index(col1, row1)?];

    let top = h00 + (h10 - h00) * xf;
    let bottom = h01 + (h11 - h01) * xf;
    Some(top + (bottom - top) * zf)
  }

  /// Surface normal at a sample from central differences (one-sided on the
  /// patch border).
  pub fn normal(&self, col: i32, row: i32, scale: Vec3) -> Option<Vec3> {
    self.index(col, row)?;
    let last = self.side as i32 - 1;
    let (left, right) = ((col - 1).max(0), (col + 1).min(last));
    let (up, down) = ((row - 1).max(0), (row + 1).min(last));

    let h = |c: i32, r: i32| self.heights[c as usize + r as usize * self.side] * scale.y;
    let dhdx = (h(right, row) - h(left, row)) / ((right - left) as f32 * scale.x);
    let dhdz = (h(col, down) - h(col, up)) / ((down - up) as f32 * scale.z);

    Vec3::new(-dhdx, 1.0, -dhdz).try_normalize()
  }

  pub(crate) fn set_sample(&mut self, col: i32, row: i32, height: f32) -> bool {
    match self.index(col, row) {
      Some(index) => {
        self.heights[index] = height;
        true
      }
      None => false,
    }
  }

  pub(crate) fn refresh_bounds(&mut self, scale: Vec3) {
    self.bounds = compute_bounds(&self.heights, self.cells(), scale);
  }

  #[inline]
  fn index(&self, col: i32, row: i32) -> Option<usize> {
    let side = self.side as i32;
    if col < 0 || row < 0 || col >= side || row >= side {
      return None;
    }
    Some(col as usize + row as usize * self.side)
  }
}

/// Patch-local bounds: the footprint spans `[0, cells]` on x/z and the
/// elevation range on y.
pub(crate) fn compute_bounds(heights: &[f32], cells: usize, scale: Vec3) -> Aabb3 {
  let (min, max) = heights
    .iter()
    .filter(|h| h.is_finite())
    .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
      (lo.min(h), hi.max(h))
    });
  let (min, max) = if min <= max { (min, max) } else { (0.0, 0.0) };

  let half_x = cells as f32 * scale.x * 0.5;
  let half_z = cells as f32 * scale.z * 0.5;
  Aabb3::from_center_half_extents(
    Vec3::new(half_x, (min + max) * 0.5 * scale.y, half_z),
    Vec3::new(half_x, (max - min) * 0.5 * scale.y, half_z),
  )
}

#[cfg(test)]
#[path = "patch_test.rs"]
mod patch_test;
