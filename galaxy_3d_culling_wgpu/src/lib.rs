/*!
# Galaxy 3D Culling - wgpu Backend

wgpu compute implementation of the Galaxy 3D tiled light culling.

This crate runs the per-tile light assignment of `galaxy_3d_culling` on
the GPU: a WGSL compute pass tests every light against every tile frustum
and the result is read back into the same `TileLightLists` the CPU
strategy produces.

Strategies are picked once at setup through `create_light_culling_strategy`,
which falls back to the CPU when no device is given or the GPU pipeline
cannot be built.
*/

mod factory;
mod gpu_context;
mod gpu_light_culler;
mod gpu_strategy;

pub use factory::create_light_culling_strategy;
pub use gpu_context::GpuContext;
pub use gpu_light_culler::{GpuLightCuller, GpuLightCullerConfig, DEFAULT_WORKGROUP_SIZE};
pub use gpu_strategy::GpuLightCullingStrategy;

// Main galaxy3d namespace module
pub mod galaxy3d {
    pub use crate::factory::create_light_culling_strategy;
    pub use crate::gpu_context::GpuContext;
    pub use crate::gpu_light_culler::{GpuLightCuller, GpuLightCullerConfig};
    pub use crate::gpu_strategy::GpuLightCullingStrategy;
}
