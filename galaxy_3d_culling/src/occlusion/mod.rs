//! Occlusion module: optional second-stage visibility tests run after
//! frustum culling.
//!
//! `OccluderVolume` only reports objects fully contained in an occluder.
//! `SoftwareOcclusionTest` is a coarse approximation: it tests sphere
//! centers only, so a large sphere peeking past an occluder edge can be
//! reported occluded.

mod occluder_volume;
mod software_occlusion;

use crate::bounds::BoundingSphere;

pub use occluder_volume::{Occluder, OccluderVolume};
pub use software_occlusion::{
    SoftwareOcclusionConfig, SoftwareOcclusionStats, SoftwareOcclusionTest,
    MAX_OCCLUSION_RESOLUTION,
};

/// Outcome of an occlusion query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcclusionResult {
    Visible,
    Occluded,
}

/// Occlusion query consumed by `ObjectCuller::cull`.
pub trait OcclusionTest {
    fn test_sphere(&self, sphere: &BoundingSphere) -> OcclusionResult;
}
