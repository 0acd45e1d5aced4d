/// GpuContext - shared wgpu device and queue
///
/// Every GPU object of this crate keeps a clone of the context instead of
/// borrowing the device, so the strategy can own its culler outright.

use std::sync::Arc;
use galaxy_3d_culling::{engine_bail, engine_err, engine_info};
use galaxy_3d_culling::galaxy3d::Result;

/// Shared wgpu device + queue.
#[derive(Clone)]
pub struct GpuContext {
    /// Logical device used to create pipelines and buffers
    pub device: Arc<wgpu::Device>,

    /// Queue used for uploads and compute submissions
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self { device, queue }
    }

    /// Request a headless device on the default adapter.
    ///
    /// # Errors
    ///
    /// `BackendError` if no adapter is available or the device request fails.
    pub async fn request_headless() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                engine_bail!("galaxy3d::wgpu::GpuContext", BackendError,
                    "No compatible GPU adapter: {}", e);
            }
        };

        let info = adapter.get_info();
        engine_info!("galaxy3d::wgpu::GpuContext",
            "Using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("galaxy3d culling device"),
                ..Default::default()
            })
            .await
            .map_err(|e| engine_err!("galaxy3d::wgpu::GpuContext", BackendError,
                "Failed to create device: {}", e))?;

        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }
}
