//! Spatial module: caller-owned object storage and the uniform grid used
//! for broad-phase culling queries.

mod cell_key;
mod object_store;
mod spatial_grid;

pub use cell_key::{CellKey, CellRange, MAX_CELLS_PER_AXIS};
pub use object_store::{ObjectKey, ObjectStore, SpatialObject};
pub use spatial_grid::{GridStats, SpatialGrid};
