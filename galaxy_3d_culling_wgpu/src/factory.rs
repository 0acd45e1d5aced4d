/// Light-culling strategy selection.

use galaxy_3d_culling::{engine_info, engine_warn};
use galaxy_3d_culling::galaxy3d::{
    CpuLightCullingStrategy, LightCullingConfig, LightCullingStrategy, Result,
};
use crate::gpu_context::GpuContext;
use crate::gpu_strategy::GpuLightCullingStrategy;

/// Build the best available strategy for a screen.
///
/// With a context, the GPU strategy is attempted first; any failure while
/// building it is logged and the CPU strategy is returned instead. Without
/// a context the CPU strategy is returned directly.
///
/// # Errors
///
/// Only the CPU strategy's own construction errors (zero screen or tile
/// size): GPU failures never reach the caller.
pub fn create_light_culling_strategy(
    context: Option<GpuContext>,
    width: u32,
    height: u32,
    config: LightCullingConfig,
) -> Result<Box<dyn LightCullingStrategy>> {
    if let Some(context) = context {
        match GpuLightCullingStrategy::new(context, width, height, config) {
            Ok(strategy) => return Ok(Box::new(strategy)),
            Err(error) => {
                engine_warn!("galaxy3d::wgpu::factory",
                    "GPU light culling unavailable ({}), using CPU", error);
            }
        }
    }

    let strategy = CpuLightCullingStrategy::new(width, height, config)?;
    engine_info!("galaxy3d::wgpu::factory", "Using CPU light culling for {}x{}", width, height);
    Ok(Box::new(strategy))
}
