/// Per-frame culling counters.

use std::time::Duration;

/// Counters of the last `ObjectCuller::cull` call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CullingStats {
    /// Objects tracked by the grid
    pub total_objects: usize,
    /// Objects returned by the coarse grid query
    pub candidates: usize,
    /// Objects in the final visible list
    pub visible: usize,
    /// Candidates rejected by the exact sphere-vs-frustum test
    pub frustum_culled: usize,
    /// Frustum survivors rejected by the occlusion test
    pub occluded: usize,
    /// Wall time of the whole cull, sort included
    pub elapsed: Duration,
}

impl CullingStats {
    /// Fraction of tracked objects that were not drawn, in [0, 1].
    pub fn cull_ratio(&self) -> f32 {
        if self.total_objects == 0 {
            return 0.0;
        }
        1.0 - self.visible as f32 / self.total_objects as f32
    }
}

/// Counters of the last `LightCuller::cull` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightCullingStats {
    pub total: usize,
    pub visible: usize,
    /// Directional / ambient lights (never culled)
    pub always_visible: usize,
    /// Lights kept because their data could not be tested
    pub malformed: usize,
    pub culled: usize,
}
