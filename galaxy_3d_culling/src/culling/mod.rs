//! Culling module: per-frame visibility of objects and lights.
//!
//! The cullers own their scratch buffers and frustums and are reused
//! across frames; nothing is allocated per frame once capacities settle.

mod light;
mod light_culler;
mod object_culler;
mod stats;

pub use light::{
    LightBounds, LightDescriptor,
    LIGHT_TYPE_AMBIENT, LIGHT_TYPE_DIRECTIONAL, LIGHT_TYPE_POINT, LIGHT_TYPE_SPOT,
};
pub use light_culler::{BatchLightCuller, LightCuller};
pub use object_culler::{ObjectCuller, ObjectCullerConfig, SortMode, VisibleObject};
pub use stats::{CullingStats, LightCullingStats};
