//! Screen-space tiling for Forward+ light culling.

mod tile_grid;

pub use tile_grid::{Tile, TileGrid, TileGridConfig, DEFAULT_TILE_SIZE};
