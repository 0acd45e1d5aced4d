//! Shared GPU helpers for integration tests

use std::sync::OnceLock;
use galaxy_3d_culling_wgpu::galaxy3d::GpuContext;

/// One headless device for the whole test binary.
pub fn test_context() -> GpuContext {
    static CONTEXT: OnceLock<GpuContext> = OnceLock::new();
    CONTEXT
        .get_or_init(|| pollster::block_on(GpuContext::request_headless()).unwrap())
        .clone()
}
