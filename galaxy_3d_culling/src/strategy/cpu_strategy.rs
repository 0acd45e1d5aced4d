/// CPU tiled light culling.
///
/// Lights outside the camera frustum are dropped first with a
/// `LightCuller`. Survivors are moved to view space and tested as spheres
/// against every tile frustum of the `TileGrid`. Directional, ambient and
/// malformed lights are assigned to every tile.

use glam::Mat4;
use crate::culling::{LightBounds, LightCuller, LightDescriptor};
use crate::error::Result;
use crate::tiles::{TileGrid, TileGridConfig};
use crate::{engine_bail, engine_debug, engine_trace, engine_warn};
use super::tile_light_lists::TileLightLists;
use super::{LightCullingConfig, LightCullingStrategy, StrategyKind};

/// Counters of the last `cull`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileCullingStats {
    /// Lights given to the strategy
    pub lights_total: usize,
    /// Lights that survived the frustum test
    pub lights_visible: usize,
    /// Light-to-tile assignments written
    pub assignments: usize,
    /// Tiles that had more candidates than `max_lights_per_tile`
    pub overflowed_tiles: usize,
    /// Assignments dropped because a tile was full
    pub dropped: usize,
}

pub struct CpuLightCullingStrategy {
    config: LightCullingConfig,
    tile_grid: TileGrid,
    light_culler: LightCuller,
    visible: Vec<usize>,
    /// Per-tile overflow flags of the current cull
    overflowed: Vec<bool>,
    stats: TileCullingStats,
}

impl CpuLightCullingStrategy {
    /// # Errors
    ///
    /// `InvalidArgument` for a zero screen size or tile size.
    pub fn new(width: u32, height: u32, config: LightCullingConfig) -> Result<Self> {
        let tile_grid = TileGrid::new(width, height, TileGridConfig {
            tile_size: config.tile_size,
            depth_range: config.depth_range,
        })?;

        engine_debug!("galaxy3d::CpuLightCullingStrategy",
            "Created for {}x{} ({} tiles, max {} lights per tile)",
            width, height, tile_grid.num_tiles(), config.max_lights_per_tile);

        Ok(Self {
            config,
            tile_grid,
            light_culler: LightCuller::with_depth_range(config.depth_range),
            visible: Vec::new(),
            overflowed: Vec::new(),
            stats: TileCullingStats::default(),
        })
    }

    pub fn config(&self) -> &LightCullingConfig {
        &self.config
    }

    pub fn tile_grid(&self) -> &TileGrid {
        &self.tile_grid
    }

    pub fn stats(&self) -> &TileCullingStats {
        &self.stats
    }
}

impl LightCullingStrategy for CpuLightCullingStrategy {
    fn name(&self) -> &'static str {
        "cpu-tiled"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Cpu
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.tile_grid.resize(width, height)
    }

    fn cull(&mut self, lights: &[LightDescriptor], view: &Mat4, projection: &Mat4) -> Result<TileLightLists> {
        if lights.len() > u32::MAX as usize {
            engine_bail!("galaxy3d::CpuLightCullingStrategy", InvalidArgument,
                "{} lights do not fit u32 indices", lights.len());
        }

        self.tile_grid.update(projection)?;
        self.light_culler.cull(&(*projection * *view), lights, &mut self.visible)?;

        let mut lists = TileLightLists::new(
            self.tile_grid.tiles_x(),
            self.tile_grid.tiles_y(),
            self.config.max_lights_per_tile,
        );
        let mut stats = TileCullingStats {
            lights_total: lights.len(),
            lights_visible: self.visible.len(),
            ..Default::default()
        };

        let num_tiles = self.tile_grid.num_tiles();
        self.overflowed.clear();
        self.overflowed.resize(num_tiles, false);

        for &light_index in &self.visible {
            let view_light = lights[light_index].transformed(view);
            match view_light.bounds() {
                LightBounds::Global | LightBounds::Malformed => {
                    for tile_index in 0..num_tiles {
                        assign(&mut lists, &mut self.overflowed, &mut stats, tile_index, light_index);
                    }
                }
                LightBounds::Sphere(sphere) => {
                    for (tile_index, tile) in self.tile_grid.tiles().iter().enumerate() {
                        let touches = tile
                            .frustum
                            .as_ref()
                            .map_or(true, |frustum| frustum.intersects_sphere(&sphere));
                        if touches {
                            assign(&mut lists, &mut self.overflowed, &mut stats, tile_index, light_index);
                        }
                    }
                }
            }
        }

        if stats.dropped > 0 {
            engine_warn!("galaxy3d::CpuLightCullingStrategy",
                "{} tiles exceeded {} lights, {} assignments dropped",
                stats.overflowed_tiles, self.config.max_lights_per_tile, stats.dropped);
        }
        engine_trace!("galaxy3d::CpuLightCullingStrategy",
            "{}/{} lights visible, {} tile assignments",
            stats.lights_visible, stats.lights_total, stats.assignments);

        self.stats = stats;
        Ok(lists)
    }
}

fn assign(
    lists: &mut TileLightLists,
    overflowed: &mut [bool],
    stats: &mut TileCullingStats,
    tile_index: usize,
    light_index: usize,
) {
    if lists.push(tile_index, light_index as u32) {
        stats.assignments += 1;
        return;
    }
    stats.dropped += 1;
    if !overflowed[tile_index] {
        overflowed[tile_index] = true;
        stats.overflowed_tiles += 1;
    }
}

#[cfg(test)]
#[path = "cpu_strategy_tests.rs"]
mod tests;
