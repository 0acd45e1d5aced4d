/// GpuLightCuller: tiled light culling on a wgpu compute pipeline.
///
/// Frame flow:
///
/// 1. `upload` writes the lights, the tile planes of a `TileGrid` and the
///    dispatch constants. Buffers are reallocated only when the light or
///    tile count changes.
/// 2. `dispatch` records the compute pass (one workgroup per tile) and the
///    copy of the output into the readback buffer, in one submission.
/// 3. `read_back` maps the readback buffer and returns the tile lists.
///    It is the only suspension point and cannot be cancelled.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use bytemuck::Zeroable;
use futures::channel::oneshot;
use glam::Mat4;
use galaxy_3d_culling::{engine_bail, engine_debug, engine_err, engine_error, engine_info};
use galaxy_3d_culling::galaxy3d::{LightDescriptor, Result, TileGrid, TileLightLists};
use galaxy_3d_culling::galaxy3d::camera::FRUSTUM_EPSILON;
use galaxy_3d_culling::galaxy3d::strategy::{
    pack_lights, pack_tile_planes, GpuCullingConfig, GpuLight, GpuTilePlanes,
    DEFAULT_MAX_LIGHTS_PER_TILE,
};
use crate::gpu_context::GpuContext;

const SHADER_TEMPLATE: &str = include_str!("shaders/tiled_light_culling.wgsl");

/// Default invocations per workgroup.
pub const DEFAULT_WORKGROUP_SIZE: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuLightCullerConfig {
    /// Capacity of each tile's list; fixed at pipeline creation
    pub max_lights_per_tile: u32,
    /// Invocations per workgroup (each workgroup handles one tile)
    pub workgroup_size: u32,
}

impl Default for GpuLightCullerConfig {
    fn default() -> Self {
        Self {
            max_lights_per_tile: DEFAULT_MAX_LIGHTS_PER_TILE,
            workgroup_size: DEFAULT_WORKGROUP_SIZE,
        }
    }
}

/// Tile layout and light count of the last upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DispatchLayout {
    tiles_x: u32,
    tiles_y: u32,
    light_count: u32,
}

/// Buffers sized for one light/tile count.
struct CullingBuffers {
    lights: wgpu::Buffer,
    tiles: wgpu::Buffer,
    tile_lists: wgpu::Buffer,
    readback: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Light slots in `lights` (at least 1)
    light_slots: usize,
    tile_count: usize,
}

pub struct GpuLightCuller {
    context: GpuContext,
    config: GpuLightCullerConfig,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    config_buffer: wgpu::Buffer,
    buffers: Option<CullingBuffers>,
    layout: Option<DispatchLayout>,
    /// A dispatch was submitted and not read back yet
    pending: bool,
    device_lost: Arc<AtomicBool>,
}

impl GpuLightCuller {
    /// Compile the shader and build the pipeline.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a zero `max_lights_per_tile` or `workgroup_size`,
    /// `GpuSetupFailed` if the device limits are too small or shader /
    /// pipeline creation raises a validation error.
    pub fn new(context: GpuContext, config: GpuLightCullerConfig) -> Result<Self> {
        if config.max_lights_per_tile == 0 || config.workgroup_size == 0 {
            engine_bail!("galaxy3d::wgpu::LightCuller", InvalidArgument,
                "max_lights_per_tile ({}) and workgroup_size ({}) must be > 0",
                config.max_lights_per_tile, config.workgroup_size);
        }

        let device = &context.device;
        let limits = device.limits();
        if config.workgroup_size > limits.max_compute_workgroup_size_x
            || config.workgroup_size > limits.max_compute_invocations_per_workgroup
        {
            engine_bail!("galaxy3d::wgpu::LightCuller", GpuSetupFailed,
                "Workgroup size {} exceeds device limit {}",
                config.workgroup_size, limits.max_compute_workgroup_size_x);
        }
        let shared_bytes = (config.max_lights_per_tile as u64 + 1) * 4;
        if shared_bytes > limits.max_compute_workgroup_storage_size as u64 {
            engine_bail!("galaxy3d::wgpu::LightCuller", GpuSetupFailed,
                "{} lights per tile need {} bytes of workgroup memory (device limit {})",
                config.max_lights_per_tile, shared_bytes, limits.max_compute_workgroup_storage_size);
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("galaxy3d tiled light culling"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(shader_source(&config))),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("galaxy3d light culling bind group layout"),
            entries: &[
                // Dispatch constants
                layout_entry(0, wgpu::BufferBindingType::Uniform),
                // Lights (read)
                layout_entry(1, wgpu::BufferBindingType::Storage { read_only: true }),
                // Tile planes (read)
                layout_entry(2, wgpu::BufferBindingType::Storage { read_only: true }),
                // Tile light lists (write)
                layout_entry(3, wgpu::BufferBindingType::Storage { read_only: false }),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("galaxy3d light culling pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("galaxy3d light culling pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let config_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("galaxy3d light culling config"),
            size: std::mem::size_of::<GpuCullingConfig>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            engine_bail!("galaxy3d::wgpu::LightCuller", GpuSetupFailed,
                "Light culling pipeline creation failed: {}", error);
        }

        let device_lost = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&device_lost);
        device.set_device_lost_callback(move |reason, message| {
            flag.store(true, Ordering::Release);
            engine_error!("galaxy3d::wgpu::LightCuller", "Device lost ({:?}): {}", reason, message);
        });

        engine_info!("galaxy3d::wgpu::LightCuller",
            "Pipeline ready ({} lights per tile, workgroup size {})",
            config.max_lights_per_tile, config.workgroup_size);

        Ok(Self {
            context,
            config,
            pipeline,
            bind_group_layout,
            config_buffer,
            buffers: None,
            layout: None,
            pending: false,
            device_lost,
        })
    }

    pub fn config(&self) -> &GpuLightCullerConfig {
        &self.config
    }

    pub fn is_device_lost(&self) -> bool {
        self.device_lost.load(Ordering::Acquire)
    }

    /// Write the frame inputs. `grid` must already be updated for the
    /// current projection; `view` moves world-space lights to view space.
    /// A dispatch still waiting for `read_back` is discarded.
    ///
    /// # Errors
    ///
    /// `GpuDeviceLost` after a device loss, `InvalidArgument` if the light
    /// count does not fit u32 indices.
    pub fn upload(&mut self, grid: &TileGrid, lights: &[LightDescriptor], view: &Mat4) -> Result<()> {
        self.check_device()?;
        let Ok(light_count) = u32::try_from(lights.len()) else {
            engine_bail!("galaxy3d::wgpu::LightCuller", InvalidArgument,
                "{} lights do not fit u32 indices", lights.len());
        };

        let mut packed_lights = pack_lights(lights);
        if packed_lights.is_empty() {
            // Storage bindings cannot be empty
            packed_lights.push(GpuLight::zeroed());
        }
        let packed_tiles = pack_tile_planes(grid);

        // The readback buffer may be replaced and the layout changes
        self.pending = false;

        let reallocate = self.buffers.as_ref().map_or(true, |buffers| {
            buffers.light_slots != packed_lights.len() || buffers.tile_count != packed_tiles.len()
        });
        if reallocate {
            self.buffers = Some(self.create_buffers(packed_lights.len(), packed_tiles.len()));
        }
        let Some(buffers) = self.buffers.as_ref() else {
            engine_bail!("galaxy3d::wgpu::LightCuller", BackendError, "Culling buffers missing after allocation");
        };

        let queue = &self.context.queue;
        queue.write_buffer(&buffers.lights, 0, bytemuck::cast_slice(&packed_lights));
        queue.write_buffer(&buffers.tiles, 0, bytemuck::cast_slice(&packed_tiles));

        let culling_config = GpuCullingConfig::new(
            view,
            light_count,
            grid.tiles_x(),
            grid.tiles_y(),
            self.config.max_lights_per_tile,
        );
        queue.write_buffer(&self.config_buffer, 0, bytemuck::bytes_of(&culling_config));

        self.layout = Some(DispatchLayout {
            tiles_x: grid.tiles_x(),
            tiles_y: grid.tiles_y(),
            light_count,
        });
        Ok(())
    }

    /// Submit the compute pass and the readback copy.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if nothing was uploaded, `GpuDeviceLost` after a
    /// device loss.
    pub fn dispatch(&mut self) -> Result<()> {
        self.check_device()?;
        let (Some(buffers), Some(layout)) = (self.buffers.as_ref(), self.layout) else {
            engine_bail!("galaxy3d::wgpu::LightCuller", InvalidArgument, "dispatch() called before upload()");
        };

        let mut encoder = self.context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("galaxy3d light culling encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("galaxy3d light culling pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &buffers.bind_group, &[]);
            pass.dispatch_workgroups(layout.tiles_x, layout.tiles_y, 1);
        }
        encoder.copy_buffer_to_buffer(&buffers.tile_lists, 0, &buffers.readback, 0, buffers.readback.size());

        self.context.queue.submit(Some(encoder.finish()));
        self.pending = true;
        Ok(())
    }

    /// Wait for the last dispatch and read the tile lists back. Indices of
    /// each tile are returned in ascending order.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` without a pending dispatch, `GpuDeviceLost` if the
    /// device is lost or the mapping fails, `BackendError` if polling fails.
    pub async fn read_back(&mut self) -> Result<TileLightLists> {
        let (Some(buffers), Some(layout)) = (self.buffers.as_ref(), self.layout) else {
            engine_bail!("galaxy3d::wgpu::LightCuller", InvalidArgument, "read_back() called before dispatch()");
        };
        if !self.pending {
            engine_bail!("galaxy3d::wgpu::LightCuller", InvalidArgument, "read_back() called before dispatch()");
        }
        self.pending = false;

        let slice = buffers.readback.slice(..);
        let (sender, receiver) = oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        self.context
            .device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| engine_err!("galaxy3d::wgpu::LightCuller", BackendError, "Device poll failed: {}", e))?;

        match receiver.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                engine_bail!("galaxy3d::wgpu::LightCuller", GpuDeviceLost, "Readback mapping failed: {}", e);
            }
            Err(_) => {
                engine_bail!("galaxy3d::wgpu::LightCuller", GpuDeviceLost, "Readback mapping was dropped");
            }
        }
        self.check_device()?;

        let mut words: Vec<u32> = {
            let mapped = slice.get_mapped_range();
            bytemuck::cast_slice(&mapped).to_vec()
        };
        buffers.readback.unmap();

        let stride = self.config.max_lights_per_tile as usize + 1;
        for block in words.chunks_mut(stride) {
            let count = (block[0] as usize).min(stride - 1);
            block[1..=count].sort_unstable();
        }

        engine_debug!("galaxy3d::wgpu::LightCuller",
            "Read back {} tiles for {} lights", layout.tiles_x * layout.tiles_y, layout.light_count);

        TileLightLists::from_words(layout.tiles_x, layout.tiles_y, self.config.max_lights_per_tile, words)
    }

    fn check_device(&self) -> Result<()> {
        if self.is_device_lost() {
            engine_bail!("galaxy3d::wgpu::LightCuller", GpuDeviceLost, "Device was lost");
        }
        Ok(())
    }

    fn create_buffers(&self, light_slots: usize, tile_count: usize) -> CullingBuffers {
        let device = &self.context.device;
        let list_bytes = (TileLightLists::word_count(tile_count as u32, 1, self.config.max_lights_per_tile)
            * std::mem::size_of::<u32>()) as u64;

        let lights = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("galaxy3d culling lights"),
            size: (light_slots * std::mem::size_of::<GpuLight>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let tiles = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("galaxy3d culling tile planes"),
            size: (tile_count.max(1) * std::mem::size_of::<GpuTilePlanes>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let tile_lists = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("galaxy3d culling tile lists"),
            size: list_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("galaxy3d culling readback"),
            size: list_bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("galaxy3d light culling bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.config_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: tiles.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: tile_lists.as_entire_binding(),
                },
            ],
        });

        engine_debug!("galaxy3d::wgpu::LightCuller",
            "Allocated buffers for {} lights and {} tiles ({} bytes of lists)",
            light_slots, tile_count, list_bytes);

        CullingBuffers {
            lights,
            tiles,
            tile_lists,
            readback,
            bind_group,
            light_slots,
            tile_count,
        }
    }
}

fn layout_entry(binding: u32, ty: wgpu::BufferBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// WGSL source with the pipeline constants filled in.
fn shader_source(config: &GpuLightCullerConfig) -> String {
    SHADER_TEMPLATE
        .replace("{{WORKGROUP_SIZE}}", &config.workgroup_size.to_string())
        .replace("{{MAX_LIGHTS_PER_TILE}}", &config.max_lights_per_tile.to_string())
        .replace("{{FRUSTUM_EPSILON}}", &format!("{:?}", FRUSTUM_EPSILON))
}

#[cfg(test)]
#[path = "gpu_light_culler_tests.rs"]
mod tests;
