/// Light descriptors: the culling-relevant part of a scene light.

use glam::{Mat4, Vec3};
use crate::bounds::BoundingSphere;

/// Light type code shared with the GPU layout (`GpuLight::direction.w`).
pub const LIGHT_TYPE_POINT: u32 = 0;
pub const LIGHT_TYPE_SPOT: u32 = 1;
pub const LIGHT_TYPE_DIRECTIONAL: u32 = 2;
pub const LIGHT_TYPE_AMBIENT: u32 = 3;

/// A light as seen by the cullers. One variant per light type, carrying
/// only the fields that type has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightDescriptor {
    /// Infinitely distant light, affects everything
    Directional { direction: Vec3 },
    /// Uniform fill light, affects everything
    Ambient,
    /// Omni light with a finite range
    Point { position: Vec3, radius: f32 },
    /// Cone light. Angles are half-angles in radians.
    Spot {
        position: Vec3,
        direction: Vec3,
        radius: f32,
        inner_cone_angle: f32,
        outer_cone_angle: f32,
    },
}

/// Volume a light must be tested with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightBounds {
    /// Directional / ambient: never culled
    Global,
    /// Point, or spot approximated by its full range sphere
    Sphere(BoundingSphere),
    /// Non-finite position or negative / non-finite radius
    Malformed,
}

impl LightDescriptor {
    pub fn point(position: Vec3, radius: f32) -> Self {
        LightDescriptor::Point { position, radius }
    }

    pub fn spot(position: Vec3, direction: Vec3, radius: f32, inner_cone_angle: f32, outer_cone_angle: f32) -> Self {
        LightDescriptor::Spot { position, direction, radius, inner_cone_angle, outer_cone_angle }
    }

    pub fn directional(direction: Vec3) -> Self {
        LightDescriptor::Directional { direction }
    }

    pub fn type_code(&self) -> u32 {
        match self {
            LightDescriptor::Point { .. } => LIGHT_TYPE_POINT,
            LightDescriptor::Spot { .. } => LIGHT_TYPE_SPOT,
            LightDescriptor::Directional { .. } => LIGHT_TYPE_DIRECTIONAL,
            LightDescriptor::Ambient => LIGHT_TYPE_AMBIENT,
        }
    }

    /// True for light types that affect the whole frame.
    #[inline]
    pub fn is_global(&self) -> bool {
        matches!(self, LightDescriptor::Directional { .. } | LightDescriptor::Ambient)
    }

    /// Culling volume. A spot's cone is not modelled: the sphere of its
    /// range contains the cone, so the approximation only adds false
    /// positives.
    pub fn bounds(&self) -> LightBounds {
        let (position, radius) = match *self {
            LightDescriptor::Directional { .. } | LightDescriptor::Ambient => {
                return LightBounds::Global;
            }
            LightDescriptor::Point { position, radius } => (position, radius),
            LightDescriptor::Spot { position, radius, .. } => (position, radius),
        };

        if !position.is_finite() || !radius.is_finite() || radius < 0.0 {
            return LightBounds::Malformed;
        }
        LightBounds::Sphere(BoundingSphere { center: position, radius })
    }

    /// Same light with positions and directions moved by `transform`
    /// (typically world → view). Assumes a rigid transform: radii are kept.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        match *self {
            LightDescriptor::Directional { direction } => LightDescriptor::Directional {
                direction: transform.transform_vector3(direction),
            },
            LightDescriptor::Ambient => LightDescriptor::Ambient,
            LightDescriptor::Point { position, radius } => LightDescriptor::Point {
                position: transform.transform_point3(position),
                radius,
            },
            LightDescriptor::Spot { position, direction, radius, inner_cone_angle, outer_cone_angle } => {
                LightDescriptor::Spot {
                    position: transform.transform_point3(position),
                    direction: transform.transform_vector3(direction),
                    radius,
                    inner_cone_angle,
                    outer_cone_angle,
                }
            }
        }
    }
}
