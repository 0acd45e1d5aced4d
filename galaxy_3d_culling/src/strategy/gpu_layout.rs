/// GPU data layouts of the tiled light-culling pass.
///
/// These structs are uploaded as-is (`bytemuck::cast_slice`) and must
/// match the WGSL declarations of the compute shader field for field.
/// Every member is a 16-byte vector so the std430 and std140 layouts
/// agree with `#[repr(C)]`.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use crate::culling::{LightBounds, LightDescriptor};
use crate::tiles::TileGrid;

/// `GpuLight::params.z` flag: skip the plane test for this light.
pub const GPU_LIGHT_ALWAYS_VISIBLE: f32 = 1.0;

/// One light, world space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    /// xyz = position, w = range
    pub position_radius: [f32; 4],
    /// xyz = direction, w = light type code (`LIGHT_TYPE_*`)
    pub direction_type: [f32; 4],
    /// x = cos(inner cone), y = cos(outer cone), z = flags, w unused
    pub params: [f32; 4],
}

/// The 6 inward planes of one tile, view space, LEFT..FAR order.
/// xyz = unit normal, w = distance.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuTilePlanes {
    pub planes: [[f32; 4]; 6],
}

/// Per-dispatch constants.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuCullingConfig {
    /// World to view transform applied to light positions and directions
    pub view: [[f32; 4]; 4],
    pub light_count: u32,
    pub tiles_x: u32,
    pub tiles_y: u32,
    pub max_lights_per_tile: u32,
}

impl GpuLight {
    pub fn from_descriptor(light: &LightDescriptor) -> Self {
        let type_code = light.type_code() as f32;
        match *light {
            LightDescriptor::Directional { direction } => Self {
                position_radius: [0.0; 4],
                direction_type: direction.extend(type_code).to_array(),
                params: [0.0; 4],
            },
            LightDescriptor::Ambient => Self {
                position_radius: [0.0; 4],
                direction_type: [0.0, 0.0, 0.0, type_code],
                params: [0.0; 4],
            },
            LightDescriptor::Point { position, radius } => Self {
                position_radius: position.extend(radius).to_array(),
                direction_type: [0.0, 0.0, 0.0, type_code],
                params: [0.0, 0.0, Self::flags(light), 0.0],
            },
            LightDescriptor::Spot { position, direction, radius, inner_cone_angle, outer_cone_angle } => Self {
                position_radius: position.extend(radius).to_array(),
                direction_type: direction.extend(type_code).to_array(),
                params: [inner_cone_angle.cos(), outer_cone_angle.cos(), Self::flags(light), 0.0],
            },
        }
        .sanitized()
    }

    fn flags(light: &LightDescriptor) -> f32 {
        match light.bounds() {
            LightBounds::Malformed => GPU_LIGHT_ALWAYS_VISIBLE,
            LightBounds::Global | LightBounds::Sphere(_) => 0.0,
        }
    }

    /// Replace non-finite values by 0 so the shader never reads NaN.
    /// Malformed lights already carry the always-visible flag.
    fn sanitized(mut self) -> Self {
        for value in self
            .position_radius
            .iter_mut()
            .chain(self.direction_type.iter_mut())
            .chain(self.params.iter_mut())
        {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        self
    }

    #[inline]
    pub fn is_always_visible(&self) -> bool {
        self.params[2] == GPU_LIGHT_ALWAYS_VISIBLE
    }
}

impl GpuTilePlanes {
    /// Planes that accept every point (zero normal, distance 1).
    pub const ACCEPT_ALL: Self = Self { planes: [[0.0, 0.0, 0.0, 1.0]; 6] };
}

impl GpuCullingConfig {
    pub fn new(view: &Mat4, light_count: u32, tiles_x: u32, tiles_y: u32, max_lights_per_tile: u32) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            light_count,
            tiles_x,
            tiles_y,
            max_lights_per_tile,
        }
    }
}

pub fn pack_lights(lights: &[LightDescriptor]) -> Vec<GpuLight> {
    lights.iter().map(GpuLight::from_descriptor).collect()
}

/// One entry per tile, row-major. Tiles without a frustum (grid never
/// updated) get `GpuTilePlanes::ACCEPT_ALL`.
pub fn pack_tile_planes(grid: &TileGrid) -> Vec<GpuTilePlanes> {
    grid.tiles()
        .iter()
        .map(|tile| match &tile.frustum {
            Some(frustum) => GpuTilePlanes {
                planes: frustum.planes().map(|plane| plane.to_vec4().to_array()),
            },
            None => GpuTilePlanes::ACCEPT_ALL,
        })
        .collect()
}

#[cfg(test)]
#[path = "gpu_layout_tests.rs"]
mod tests;
