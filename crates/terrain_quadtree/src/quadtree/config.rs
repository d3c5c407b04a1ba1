//! TerrainConfig - patch sizing and world placement of a terrain tile.

use glam::{IVec2, Vec3};

use crate::error::{Result, TerrainError};

/// Configuration for splitting a heightmap and placing it in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainConfig {
  /// Grid cells along one patch edge. Must be a power of two >= 2.
  /// A patch stores `patch_size + 1` samples per edge.
  pub patch_size: u32,

  /// Grid step scale. `y` scales elevations.
  pub scale: Vec3,

  /// World-space position of the root quad's center.
  pub origin: Vec3,

  /// Tile coordinate when several trees are stitched into one world.
  pub tile: IVec2,
}

impl TerrainConfig {
  /// Small patches, handy for tests and tiny tiles.
  pub const SMALL: Self = Self {
    patch_size: 2,
    scale: Vec3::ONE,
    origin: Vec3::ZERO,
    tile: IVec2::ZERO,
  };

  /// Create a config with the given patch size and default placement.
  pub fn with_patch_size(patch_size: u32) -> Self {
    Self {
      patch_size,
      ..Default::default()
    }
  }

  /// Samples along one patch edge (cells + shared border sample).
  #[inline]
  pub fn patch_samples(&self) -> usize {
    self.patch_size as usize + 1
  }

  /// Coarsest LOD a patch of this size supports.
  /// max_lod = max(1, log2(patch_size) - 1)
  #[inline]
  pub fn max_patch_lod(&self) -> u32 {
    max_lod_for_cells(self.patch_size)
  }

  /// Check that a raster of `size` samples per edge splits into patches of
  /// this size, and return the number of quad levels above the patches.
  ///
  /// Valid sizes are `patch_size * 2^k + 1` with `k >= 1`, so the root always
  /// has four children.
  pub fn validate_size(&self, size: usize) -> Result<u32> {
    let invalid = |reason| TerrainError::InvalidDimension {
      size,
      patch_size: self.patch_size,
      reason,
    };

    if self.patch_size < 2 || !self.patch_size.is_power_of_two() {
      return Err(invalid("patch size must be a power of two >= 2"));
    }
    if size < 3 {
      return Err(invalid("raster must have at least 3 samples per edge"));
    }

    let cells = size - 1;
    let patch = self.patch_size as usize;
    if cells % patch != 0 {
      return Err(invalid("raster cells must be a multiple of the patch size"));
    }
    let ratio = cells / patch;
    if ratio < 2 || !ratio.is_power_of_two() {
      return Err(invalid("raster must be patch_size * 2^k + 1 with k >= 1"));
    }
    Ok(ratio.trailing_zeros())
  }
}

impl Default for TerrainConfig {
  fn default() -> Self {
    Self {
      patch_size: 64,
      scale: Vec3::ONE,
      origin: Vec3::ZERO,
      tile: IVec2::ZERO,
    }
  }
}

/// max(1, log2(cells) - 1)
#[inline]
pub(crate) fn max_lod_for_cells(cells: u32) -> u32 {
  if cells < 2 {
    return 1;
  }
  cells.ilog2().saturating_sub(1).max(1)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
