//! Shared fixtures for unit tests.

use glam::IVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::quadtree::{QuadTree, TerrainConfig, TreeBuilder};

/// Row-major ramp where every sample holds its own index: `h = x + size * z`.
pub fn ramp(size: usize) -> Vec<f32> {
  (0..size * size).map(|i| i as f32).collect()
}

/// Deterministic noisy raster.
pub fn hills(size: usize, seed: u64) -> Vec<f32> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..size * size).map(|_| rng.random_range(0.0..32.0)).collect()
}

/// Raster size for `depth` quad levels above 2-cell patches.
pub fn nested_size(depth: u32) -> usize {
  (2usize << depth) + 1
}

/// Balanced tree of 2-cell patches, `depth` quad levels deep, over a ramp.
pub fn nested_tree(depth: u32) -> QuadTree {
  nested_tree_at(depth, IVec2::ZERO)
}

/// Same as [`nested_tree`], tagged with a tile coordinate.
pub fn nested_tree_at(depth: u32, tile: IVec2) -> QuadTree {
  let size = nested_size(depth);
  let config = TerrainConfig {
    tile,
    ..TerrainConfig::SMALL
  };
  TreeBuilder::new(config)
    .build(&ramp(size), size)
    .expect("nested fixture is well formed")
}

/// Shorthand for parsing a node path literal.
pub fn path(digits: &str) -> crate::quadtree::NodePath {
  digits.parse().expect("valid path literal")
}
