/// TileGrid: screen split into fixed-size pixel tiles, each with a
/// view-space sub-frustum for Forward+ light assignment.
///
/// Tile frustums are rebuilt from the projection matrix on every `update`:
/// the 4 NDC corners of the tile are unprojected at the near and far depth
/// with the inverse projection, and the 6 planes are derived from the
/// edges of the resulting 8 view-space corners.
///
/// Pixel row 0 is the top of the screen (NDC y = +1).

use glam::{Mat4, Vec3, Vec4};
use crate::camera::{DepthRange, Frustum};
use crate::error::Result;
use crate::math::{invert_matrix, Plane};
use crate::{engine_bail, engine_debug};

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGridConfig {
    /// Tile width and height in pixels
    pub tile_size: u32,
    /// Clip-space depth convention of the projection matrices
    pub depth_range: DepthRange,
}

impl Default for TileGridConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            depth_range: DepthRange::ZeroToOne,
        }
    }
}

/// One screen tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Tile column
    pub x: u32,
    /// Tile row (0 = top)
    pub y: u32,
    /// Pixel rect; edge tiles may be smaller than the tile size
    pub min_x: u32,
    pub min_y: u32,
    pub width: u32,
    pub height: u32,
    /// View-space sub-frustum, `None` until the first successful `update`
    pub frustum: Option<Frustum>,
}

pub struct TileGrid {
    config: TileGridConfig,
    screen_width: u32,
    screen_height: u32,
    tiles_x: u32,
    tiles_y: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// # Errors
    ///
    /// `InvalidArgument` if a screen dimension or the tile size is zero.
    pub fn new(screen_width: u32, screen_height: u32, config: TileGridConfig) -> Result<Self> {
        if config.tile_size == 0 {
            engine_bail!("galaxy3d::TileGrid", InvalidArgument, "Tile size must be > 0");
        }
        let mut grid = Self {
            config,
            screen_width: 0,
            screen_height: 0,
            tiles_x: 0,
            tiles_y: 0,
            tiles: Vec::new(),
        };
        grid.resize(screen_width, screen_height)?;
        Ok(grid)
    }

    /// Rebuild the tile layout for a new screen size. Tile frustums are
    /// reset until the next `update`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a zero dimension; the grid is left unchanged.
    pub fn resize(&mut self, screen_width: u32, screen_height: u32) -> Result<()> {
        if screen_width == 0 || screen_height == 0 {
            engine_bail!("galaxy3d::TileGrid", InvalidArgument,
                "Screen size {}x{} must be non-zero", screen_width, screen_height);
        }

        let tile_size = self.config.tile_size;
        let tiles_x = screen_width.div_ceil(tile_size);
        let tiles_y = screen_height.div_ceil(tile_size);

        let mut tiles = Vec::with_capacity((tiles_x * tiles_y) as usize);
        for y in 0..tiles_y {
            for x in 0..tiles_x {
                let min_x = x * tile_size;
                let min_y = y * tile_size;
                tiles.push(Tile {
                    x,
                    y,
                    min_x,
                    min_y,
                    width: tile_size.min(screen_width - min_x),
                    height: tile_size.min(screen_height - min_y),
                    frustum: None,
                });
            }
        }

        self.screen_width = screen_width;
        self.screen_height = screen_height;
        self.tiles_x = tiles_x;
        self.tiles_y = tiles_y;
        self.tiles = tiles;

        engine_debug!("galaxy3d::TileGrid",
            "Resized to {}x{}: {}x{} tiles of {} px", screen_width, screen_height, tiles_x, tiles_y, tile_size);
        Ok(())
    }

    /// Recompute every tile frustum from a projection matrix.
    ///
    /// # Errors
    ///
    /// `DegenerateMatrix` if the projection is not invertible or a tile
    /// collapses to a degenerate volume. No tile is modified on error.
    pub fn update(&mut self, projection: &Mat4) -> Result<()> {
        let inverse = invert_matrix(projection)?;
        let near_ndc = self.config.depth_range.near_ndc();

        let mut frustums = Vec::with_capacity(self.tiles.len());
        for tile in &self.tiles {
            let corners = self.tile_corners(tile, &inverse, near_ndc);
            frustums.push(frustum_from_corners(&corners)?);
        }

        for (tile, frustum) in self.tiles.iter_mut().zip(frustums) {
            tile.frustum = Some(frustum);
        }
        Ok(())
    }

    pub fn tile(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.tiles_x || y >= self.tiles_y {
            return None;
        }
        self.tiles.get((y * self.tiles_x + x) as usize)
    }

    /// Tile containing pixel (px, py), row 0 at the top.
    pub fn tile_at_pixel(&self, px: u32, py: u32) -> Option<&Tile> {
        if px >= self.screen_width || py >= self.screen_height {
            return None;
        }
        self.tile(px / self.config.tile_size, py / self.config.tile_size)
    }

    /// Tiles in row-major order, top row first.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile_size(&self) -> u32 {
        self.config.tile_size
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    pub fn config(&self) -> &TileGridConfig {
        &self.config
    }

    /// View-space corners of a tile: near bl, br, tl, tr then far bl, br, tl, tr.
    fn tile_corners(&self, tile: &Tile, inverse: &Mat4, near_ndc: f32) -> [Vec3; 8] {
        let width = self.screen_width as f32;
        let height = self.screen_height as f32;

        let left = tile.min_x as f32 / width * 2.0 - 1.0;
        let right = (tile.min_x + tile.width) as f32 / width * 2.0 - 1.0;
        let top = 1.0 - tile.min_y as f32 / height * 2.0;
        let bottom = 1.0 - (tile.min_y + tile.height) as f32 / height * 2.0;

        let unproject = |x: f32, y: f32, z: f32| -> Vec3 {
            let p = *inverse * Vec4::new(x, y, z, 1.0);
            p.truncate() / p.w
        };

        [
            unproject(left, bottom, near_ndc),
            unproject(right, bottom, near_ndc),
            unproject(left, top, near_ndc),
            unproject(right, top, near_ndc),
            unproject(left, bottom, 1.0),
            unproject(right, bottom, 1.0),
            unproject(left, top, 1.0),
            unproject(right, top, 1.0),
        ]
    }
}

/// Six inward planes (LEFT, RIGHT, BOTTOM, TOP, NEAR, FAR) of a tile volume.
///
/// In-plane directions are taken from the far face, whose edges are the
/// longest for a perspective projection.
fn frustum_from_corners(corners: &[Vec3; 8]) -> Result<Frustum> {
    let [n_bl, n_br, n_tl, n_tr, f_bl, f_br, f_tl, f_tr] = *corners;
    let centroid = corners.iter().copied().sum::<Vec3>() / 8.0;

    let far_right = f_br - f_bl;
    let far_up = f_tl - f_bl;

    let raw = [
        (n_bl, far_up.cross(f_bl - n_bl)),                 // Left
        (n_br, (f_tr - f_br).cross(f_br - n_br)),          // Right
        (n_bl, far_right.cross(f_bl - n_bl)),              // Bottom
        (n_tl, (f_tr - f_tl).cross(f_tl - n_tl)),          // Top
        (n_bl, far_right.cross(far_up)),                   // Near
        (f_bl, far_right.cross(far_up)),                   // Far
    ];

    let mut planes = [Plane::new(Vec3::ZERO, 0.0); 6];
    for (plane, (point, normal)) in planes.iter_mut().zip(raw) {
        *plane = Plane::from_point_normal(point, normal)
            .normalized()?
            .oriented_toward(centroid);
    }
    Frustum::from_planes(planes)
}

#[cfg(test)]
#[path = "tile_grid_tests.rs"]
mod tests;
