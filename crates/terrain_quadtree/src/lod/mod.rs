//! Level-of-detail update passes.
//!
//! # LOD Convention
//!
//! LOD 0 = full detail, higher LOD = coarser, capped at the patch's
//! `max_lod`. A pass never mutates a tree; it produces an `UpdateMap` the
//! caller applies after regenerating meshes.
//!
//! # Module Structure
//!
//! - [`update`]: `UpdatePending`, `PatchKey`, `UpdateMap`
//! - [`policy`]: `LodPolicy` capability, `DistanceLodPolicy`
//! - [`engine`]: `LodUpdateEngine`, `fix_edges`
//! - [`stats`]: `LodStats`

pub mod engine;
pub mod policy;
pub mod stats;
pub mod update;

// Re-exports
pub use engine::{fix_edges, LodUpdateEngine, LodUpdateOutput};
pub use policy::{DistanceLodPolicy, LodPolicy};
pub use stats::{EdgeStats, LodStats};
pub use update::{PatchKey, UpdateMap, UpdatePending};
