//! Error type shared by the tree builder, the manual assembly API and the
//! neighbor resolver.

use thiserror::Error;

/// Errors raised while building or addressing a terrain quadtree.
///
/// Out-of-range height and normal queries are not errors: they return NaN or
/// `None` because terrain edges and holes are an ordinary condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerrainError {
  /// The height raster has no samples.
  #[error("heightmap is empty")]
  EmptyHeightmap,

  /// The raster (or patch) dimensions cannot be split into a balanced tree.
  #[error("invalid terrain dimension: size {size}, patch size {patch_size}: {reason}")]
  InvalidDimension {
    size: usize,
    patch_size: u32,
    reason: &'static str,
  },

  /// A node reference, quadrant or node kind does not fit the operation.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, TerrainError>;
