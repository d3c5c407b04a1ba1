//! Quadtree over a square heightmap.
//!
//! The tree lives in an arena (`QuadTree`); nodes address each other by
//! `NodeId`. Every internal node is a quad with exactly four children once
//! built, and every leaf is a `Patch` holding a height sub-grid.
//!
//! # Size Convention
//!
//! Sizes count samples, not cells. A node of `size` samples splits into four
//! children of `(size + 1) / 2` samples that share the middle row and column.
//!
//! ```text
//! raster size = patch_size * 2^k + 1      (k >= 1)
//! patch side  = patch_size + 1
//! ```
//!
//! # Module Structure
//!
//! - [`node`]: `SpatialNode`, `NodePath` and the borrowed `NodeRef` / `PatchRef`
//! - [`patch`]: `Patch` - height sub-grid with LOD state
//! - [`tree`]: `QuadTree` - arena, path index, manual assembly
//! - [`builder`]: `TreeBuilder` - heightmap to tree
//! - [`query`]: height, normal and edit operations on a built tree

pub mod bounds;
pub mod builder;
pub mod config;
pub mod node;
pub mod patch;
pub mod query;
pub mod tree;

// Re-exports
pub use bounds::Aabb3;
pub use builder::{build_terrain, sub_block, TreeBuilder};
pub use config::TerrainConfig;
pub use node::{NodeId, NodeKind, NodePath, NodeRef, PatchRef, SpatialNode};
pub use patch::Patch;
pub use tree::QuadTree;
