//! terrain_quadtree - engine independent quadtree LOD terrain
//!
//! Splits a square heightmap into a quadtree of fixed-size patches, decides a
//! level of detail for every patch from a set of viewpoints, and reports which
//! patches (and which patch edges) need new geometry so adjacent patches
//! stitch without cracks. Rendering is left to the caller.
//!
//! # Features
//!
//! - **TreeBuilder**: heightmap → balanced quadtree, with one-sample overlap
//!   borders so every patch is self-contained
//! - **NeighborResolver**: neighbor search by quadrant table, across quads and
//!   (through a `NeighborFinder`) across tiles
//! - **LodUpdateEngine**: evaluate + edge fixing, per tile in parallel
//! - **Queries**: heights, normals, bilinear heights, in-place edits
//!
//! # Example
//!
//! ```ignore
//! use terrain_quadtree::{DistanceLodPolicy, LodUpdateEngine, TerrainConfig, TreeBuilder};
//!
//! let size = 513;
//! let heights = vec![0.0; size * size];
//! let mut tree = TreeBuilder::new(TerrainConfig::default()).build(&heights, size)?;
//!
//! let engine = LodUpdateEngine::new(DistanceLodPolicy::default());
//! let output = engine.update(&tree, &[camera_position]);
//! if output.changed {
//!     // regenerate meshes for output.updates, then
//!     tree.apply_updates(&output.updates);
//! }
//! ```

pub mod direction;
pub mod error;
pub mod lod;
pub mod metrics;
pub mod neighbor;
pub mod quadtree;

// Re-export commonly used items
pub use direction::{Direction, Step};
pub use error::{Result, TerrainError};
pub use lod::{
  fix_edges, DistanceLodPolicy, LodPolicy, LodStats, LodUpdateEngine, LodUpdateOutput, PatchKey,
  UpdateMap, UpdatePending,
};
pub use neighbor::{NeighborFinder, NeighborResolver, TileGrid};
pub use quadtree::{
  build_terrain, Aabb3, NodeId, NodeKind, NodePath, NodeRef, Patch, PatchRef, QuadTree,
  SpatialNode, TerrainConfig, TreeBuilder,
};

#[cfg(test)]
pub(crate) mod test_utils;
