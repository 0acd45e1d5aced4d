/// GpuLightCullingStrategy: GPU tiled light culling with CPU fallback.
///
/// The first GPU failure (device lost, readback or backend error) is
/// logged and switches the strategy to its CPU twin for the rest of its
/// life. The GPU path is never retried.

use glam::Mat4;
use galaxy_3d_culling::{engine_info, engine_warn};
use galaxy_3d_culling::galaxy3d::{
    CpuLightCullingStrategy, Error, LightCullingConfig, LightCullingStrategy, LightDescriptor,
    Result, StrategyKind, TileGrid, TileGridConfig, TileLightLists,
};
use crate::gpu_context::GpuContext;
use crate::gpu_light_culler::{GpuLightCuller, GpuLightCullerConfig, DEFAULT_WORKGROUP_SIZE};

pub struct GpuLightCullingStrategy {
    /// `None` once the strategy fell back to the CPU
    gpu: Option<GpuLightCuller>,
    tile_grid: TileGrid,
    cpu: CpuLightCullingStrategy,
}

impl GpuLightCullingStrategy {
    /// # Errors
    ///
    /// `InvalidArgument` for a zero screen or tile size, any
    /// `GpuLightCuller::new` error otherwise.
    pub fn new(context: GpuContext, width: u32, height: u32, config: LightCullingConfig) -> Result<Self> {
        let tile_grid = TileGrid::new(width, height, TileGridConfig {
            tile_size: config.tile_size,
            depth_range: config.depth_range,
        })?;
        let cpu = CpuLightCullingStrategy::new(width, height, config)?;
        let gpu = GpuLightCuller::new(context, GpuLightCullerConfig {
            max_lights_per_tile: config.max_lights_per_tile,
            workgroup_size: DEFAULT_WORKGROUP_SIZE,
        })?;

        engine_info!("galaxy3d::wgpu::LightCullingStrategy",
            "GPU light culling enabled for {}x{} ({} tiles)", width, height, tile_grid.num_tiles());

        Ok(Self {
            gpu: Some(gpu),
            tile_grid,
            cpu,
        })
    }

    /// True once a GPU failure switched the strategy to the CPU path.
    pub fn is_fallback_active(&self) -> bool {
        self.gpu.is_none()
    }

    pub fn tile_grid(&self) -> &TileGrid {
        &self.tile_grid
    }

    fn cull_on_gpu(
        gpu: &mut GpuLightCuller,
        tile_grid: &TileGrid,
        lights: &[LightDescriptor],
        view: &Mat4,
    ) -> Result<TileLightLists> {
        gpu.upload(tile_grid, lights, view)?;
        gpu.dispatch()?;
        pollster::block_on(gpu.read_back())
    }

    fn fall_back(&mut self, error: &Error) {
        engine_warn!("galaxy3d::wgpu::LightCullingStrategy",
            "GPU light culling failed ({}), switching to CPU for good", error);
        self.gpu = None;
    }
}

impl LightCullingStrategy for GpuLightCullingStrategy {
    fn name(&self) -> &'static str {
        if self.gpu.is_some() {
            "gpu-tiled"
        } else {
            "gpu-tiled (cpu fallback)"
        }
    }

    fn kind(&self) -> StrategyKind {
        if self.gpu.is_some() {
            StrategyKind::Gpu
        } else {
            StrategyKind::Cpu
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.cpu.resize(width, height)?;
        self.tile_grid.resize(width, height)
    }

    fn cull(&mut self, lights: &[LightDescriptor], view: &Mat4, projection: &Mat4) -> Result<TileLightLists> {
        if let Some(gpu) = self.gpu.as_mut() {
            self.tile_grid.update(projection)?;
            match Self::cull_on_gpu(gpu, &self.tile_grid, lights, view) {
                Ok(lists) => return Ok(lists),
                Err(error) if error.is_gpu_error() => self.fall_back(&error),
                Err(error) => return Err(error),
            }
        }
        self.cpu.cull(lights, view, projection)
    }
}
