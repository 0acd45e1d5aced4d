/// LightCuller: frustum culling of scene lights for one view.
///
/// Directional and ambient lights always pass. Point and spot lights are
/// tested as the sphere of their range, so a spot light may be kept even
/// if its cone points away from the view; the opposite never happens.
///
/// BatchLightCuller runs the same test for several views (cascades, cube
/// faces, split screen) with one LightCuller per view.

use glam::Mat4;
use crate::camera::{DepthRange, Frustum};
use crate::error::Result;
use crate::{engine_debug, engine_trace};
use super::light::{LightBounds, LightDescriptor};
use super::stats::LightCullingStats;

pub struct LightCuller {
    depth_range: DepthRange,
    /// Frustum of the last successful `cull`, `None` before the first one
    frustum: Option<Frustum>,
    stats: LightCullingStats,
}

impl LightCuller {
    /// Culler for projections with [0, 1] clip depth.
    pub fn new() -> Self {
        Self::with_depth_range(DepthRange::ZeroToOne)
    }

    pub fn with_depth_range(depth_range: DepthRange) -> Self {
        Self {
            depth_range,
            frustum: None,
            stats: LightCullingStats::default(),
        }
    }

    /// Replace `visible` with the indices (into `lights`) of the lights that
    /// can affect the view, in input order.
    ///
    /// # Errors
    ///
    /// `DegenerateMatrix` if no frustum can be extracted from
    /// `view_projection`. The previous frustum, `visible` and stats are left
    /// untouched in that case.
    pub fn cull(
        &mut self,
        view_projection: &Mat4,
        lights: &[LightDescriptor],
        visible: &mut Vec<usize>,
    ) -> Result<()> {
        let frustum = match &mut self.frustum {
            Some(frustum) => {
                frustum.update(view_projection)?;
                *frustum
            }
            None => {
                let frustum = Frustum::from_view_projection_with_depth(view_projection, self.depth_range)?;
                self.frustum = Some(frustum);
                frustum
            }
        };

        visible.clear();
        let mut stats = LightCullingStats {
            total: lights.len(),
            ..Default::default()
        };

        for (index, light) in lights.iter().enumerate() {
            match light.bounds() {
                LightBounds::Global => {
                    stats.always_visible += 1;
                    visible.push(index);
                }
                LightBounds::Malformed => {
                    engine_debug!("galaxy3d::LightCuller",
                        "Light {} has malformed bounds, kept visible: {:?}", index, light);
                    stats.malformed += 1;
                    visible.push(index);
                }
                LightBounds::Sphere(sphere) => {
                    if frustum.intersects_sphere(&sphere) {
                        visible.push(index);
                    } else {
                        stats.culled += 1;
                    }
                }
            }
        }

        stats.visible = visible.len();
        self.stats = stats;

        engine_trace!("galaxy3d::LightCuller",
            "{}/{} lights visible ({} culled)", stats.visible, stats.total, stats.culled);
        Ok(())
    }

    /// Test one light against the frustum of the last `cull`.
    ///
    /// Before the first `cull` there is no frustum and every light passes.
    pub fn is_light_visible(&self, light: &LightDescriptor) -> bool {
        match light.bounds() {
            LightBounds::Global | LightBounds::Malformed => true,
            LightBounds::Sphere(sphere) => self
                .frustum
                .as_ref()
                .map_or(true, |frustum| frustum.intersects_sphere(&sphere)),
        }
    }

    pub fn frustum(&self) -> Option<&Frustum> {
        self.frustum.as_ref()
    }

    pub fn stats(&self) -> &LightCullingStats {
        &self.stats
    }
}

impl Default for LightCuller {
    fn default() -> Self {
        Self::new()
    }
}

/// Multi-view light culling.
///
/// The pool of per-view cullers grows to the largest view count seen and
/// never shrinks.
pub struct BatchLightCuller {
    depth_range: DepthRange,
    cullers: Vec<LightCuller>,
    results: Vec<Vec<usize>>,
}

impl BatchLightCuller {
    pub fn new() -> Self {
        Self::with_depth_range(DepthRange::ZeroToOne)
    }

    pub fn with_depth_range(depth_range: DepthRange) -> Self {
        Self {
            depth_range,
            cullers: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Cull `lights` against every view. Returns one visible-index list per
    /// view, in view order.
    ///
    /// # Errors
    ///
    /// Fails on the first view whose matrix is degenerate.
    pub fn cull_views(&mut self, views: &[Mat4], lights: &[LightDescriptor]) -> Result<&[Vec<usize>]> {
        while self.cullers.len() < views.len() {
            self.cullers.push(LightCuller::with_depth_range(self.depth_range));
            self.results.push(Vec::new());
        }

        for ((view, culler), visible) in views
            .iter()
            .zip(self.cullers.iter_mut())
            .zip(self.results.iter_mut())
        {
            culler.cull(view, lights, visible)?;
        }

        Ok(&self.results[..views.len()])
    }

    /// Culler of view `index` from the last `cull_views`.
    pub fn culler(&self, index: usize) -> Option<&LightCuller> {
        self.cullers.get(index)
    }

    /// Number of pooled per-view cullers.
    pub fn pool_size(&self) -> usize {
        self.cullers.len()
    }
}

impl Default for BatchLightCuller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "light_culler_tests.rs"]
mod tests;
