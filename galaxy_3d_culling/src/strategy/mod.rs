//! Light-culling strategies for Forward+ shading.
//!
//! A strategy turns the scene lights and the camera matrices into one
//! light index list per screen tile. The CPU strategy lives here; the GPU
//! strategy is provided by a backend crate and falls back to the CPU one.

mod cpu_strategy;
mod gpu_layout;
mod tile_light_lists;

pub use cpu_strategy::{CpuLightCullingStrategy, TileCullingStats};
pub use gpu_layout::{
    pack_lights, pack_tile_planes,
    GpuCullingConfig, GpuLight, GpuTilePlanes, GPU_LIGHT_ALWAYS_VISIBLE,
};
pub use tile_light_lists::TileLightLists;

use glam::Mat4;
use crate::camera::DepthRange;
use crate::culling::LightDescriptor;
use crate::error::Result;
use crate::tiles::DEFAULT_TILE_SIZE;

/// Default cap of lights per tile.
pub const DEFAULT_MAX_LIGHTS_PER_TILE: u32 = 256;

/// Where a strategy runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Cpu,
    Gpu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightCullingConfig {
    /// Cap of each tile's list; extra lights are dropped
    pub max_lights_per_tile: u32,
    pub tile_size: u32,
    pub depth_range: DepthRange,
}

impl Default for LightCullingConfig {
    fn default() -> Self {
        Self {
            max_lights_per_tile: DEFAULT_MAX_LIGHTS_PER_TILE,
            tile_size: DEFAULT_TILE_SIZE,
            depth_range: DepthRange::ZeroToOne,
        }
    }
}

/// Per-tile light assignment, CPU or GPU.
///
/// Chosen once at setup and called once per frame. `&mut self` lets
/// implementations keep their tile grid and buffers across frames.
pub trait LightCullingStrategy: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &'static str;

    fn kind(&self) -> StrategyKind;

    /// Adapt to a new screen size.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Assign `lights` to screen tiles for a camera.
    ///
    /// `view` is the world-to-view transform and `projection` the view-to-clip
    /// transform; light indices in the result refer to `lights`.
    fn cull(&mut self, lights: &[LightDescriptor], view: &Mat4, projection: &Mat4) -> Result<TileLightLists>;
}
