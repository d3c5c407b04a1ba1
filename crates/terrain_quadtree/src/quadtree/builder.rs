//! TreeBuilder - splits a square height raster into a balanced quadtree.
//!
//! Each split hands every child a `(size + 1) / 2` sample block. Adjacent
//! blocks overlap by one row/column, so every patch carries the border it
//! shares with its neighbors:
//!
//! ```text
//!   size = 5, split = 3
//!
//!   col  0   1   2   3   4
//!      ┌───────────┐
//!      │ q1        │           q1: cols 0..3, rows 0..3
//!      │       ┌───┼───────┐   q3: cols 2..5, rows 0..3
//!      │       │ shared    │
//!      └───────┼───┘       │
//!              │        q3 │
//!              └───────────┘
//! ```

use super::node::NodeId;
use super::patch::Patch;
use super::tree::QuadTree;
use super::TerrainConfig;
use crate::error::{Result, TerrainError};

/// Builds `QuadTree`s from heightmaps for one configuration.
#[derive(Clone, Debug, Default)]
pub struct TreeBuilder {
  config: TerrainConfig,
}

impl TreeBuilder {
  pub fn new(config: TerrainConfig) -> Self {
    Self { config }
  }

  #[inline]
  pub fn config(&self) -> &TerrainConfig {
    &self.config
  }

  /// Build a tree from a row-major `size × size` raster.
  ///
  /// `size` must be `patch_size * 2^k + 1` with `k >= 1`.
  #[tracing::instrument(
    skip_all,
    name = "quadtree::build",
    fields(size = size, patch_size = self.config.patch_size)
  )]
  pub fn build(&self, heights: &[f32], size: usize) -> Result<QuadTree> {
    if heights.is_empty() {
      return Err(TerrainError::EmptyHeightmap);
    }
    let depth = self.config.validate_size(size)?;
    if heights.len() != size * size {
      return Err(TerrainError::InvalidDimension {
        size,
        patch_size: self.config.patch_size,
        reason: "raster length is not size * size",
      });
    }

    let mut tree = QuadTree::with_root(self.config.clone(), size as u32);
    self.split(&mut tree, QuadTree::ROOT, heights, size)?;

    tracing::debug!(
      nodes = tree.len(),
      patches = tree.patch_count(),
      depth,
      "built terrain quadtree"
    );
    Ok(tree)
  }

  fn split(&self, tree: &mut QuadTree, parent: NodeId, heights: &[f32], size: usize) -> Result<()> {
    let split = (size + 1) >> 1;
    let children_are_patches = split - 1 <= self.config.patch_size as usize;

    for quadrant in 1..=4u8 {
      let (col, row) = block_origin(quadrant, split);
      let block = sub_block(heights, size, col, row, split);

      if children_are_patches {
        let patch = Patch::new(block, split, self.config.scale, tree.total_size())?;
        tree.attach_patch(parent, quadrant, patch)?;
      } else {
        let child = tree.attach_quad(parent, quadrant, split as u32)?;
        self.split(tree, child, &block, split)?;
      }
    }
    Ok(())
  }
}

/// Build a tree with default placement and the given patch size.
pub fn build_terrain(heights: &[f32], patch_size: u32, size: usize) -> Result<QuadTree> {
  TreeBuilder::new(TerrainConfig::with_patch_size(patch_size)).build(heights, size)
}

/// Top-left sample of a quadrant's block inside its parent.
#[inline]
fn block_origin(quadrant: u8, split: usize) -> (usize, usize) {
  let shared = split - 1;
  match quadrant {
    1 => (0, 0),
    2 => (0, shared),
    3 => (shared, 0),
    _ => (shared, shared),
  }
}

/// Copy a `side × side` block starting at `(col, row)`. Samples beyond the
/// source raster read as zero.
pub fn sub_block(heights: &[f32], size: usize, col: usize, row: usize, side: usize) -> Vec<f32> {
  let mut block = vec![0.0; side * side];
  for (r, block_row) in block.chunks_exact_mut(side).enumerate() {
    let z = row + r;
    if z >= size {
      break;
    }
    let available = size.saturating_sub(col).min(side);
    if available == 0 {
      break;
    }
    let start = z * size + col;
    block_row[..available].copy_from_slice(&heights[start..start + available]);
  }
  block
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
