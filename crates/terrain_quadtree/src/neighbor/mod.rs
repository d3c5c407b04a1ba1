//! Neighbor search across quadrant, quad and tile boundaries.
//!
//! - [`resolver`]: `NeighborResolver` and the `NeighborFinder` capability
//! - [`tile_grid`]: `TileGrid` - multi-tile container that finds adjacent roots

pub mod resolver;
pub mod tile_grid;

pub use resolver::{NeighborFinder, NeighborResolver};
pub use tile_grid::TileGrid;
