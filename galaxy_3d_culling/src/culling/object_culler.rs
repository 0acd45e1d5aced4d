/// ObjectCuller: two-tier visibility for grid-tracked objects.
///
/// 1. Coarse: the frustum's world box (from its corners) queries the
///    spatial grid for candidates.
/// 2. Fine: each candidate's bounding sphere is tested against the exact
///    frustum planes, then against the optional occlusion test.
///
/// Survivors are returned with their squared distance to the camera,
/// sorted with a radix sort on the f32 bit pattern.

use std::time::Instant;
use glam::{Mat4, Vec3};
use rdst::{RadixKey, RadixSort};
use crate::bounds::BoundingBox;
use crate::camera::{DepthRange, Frustum, FRUSTUM_EPSILON};
use crate::error::Result;
use crate::engine_trace;
use crate::occlusion::{OcclusionResult, OcclusionTest};
use crate::spatial::{ObjectKey, SpatialGrid, SpatialObject};
use super::stats::CullingStats;

/// Order of the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Nearest first (opaque geometry, early-z)
    #[default]
    FrontToBack,
    /// Farthest first (transparent geometry)
    BackToFront,
    /// Grid query order
    Unsorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectCullerConfig {
    pub sort_mode: SortMode,
    /// Record `CullingStats` on every cull (costs two clock reads)
    pub collect_stats: bool,
    /// Clip-space depth convention of the view-projection matrices
    pub depth_range: DepthRange,
}

impl Default for ObjectCullerConfig {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::FrontToBack,
            collect_stats: false,
            depth_range: DepthRange::ZeroToOne,
        }
    }
}

/// One entry of the visible list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleObject {
    pub key: ObjectKey,
    /// Squared distance from the camera to the bounding sphere center
    pub distance_squared: f32,
}

impl RadixKey for VisibleObject {
    const LEVELS: usize = 4;

    /// Non-negative f32 values order the same as their bit patterns.
    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        (self.distance_squared.to_bits() >> (level * 8)) as u8
    }
}

pub struct ObjectCuller {
    grid: SpatialGrid,
    config: ObjectCullerConfig,
    /// Frustum of the last successful cull, updated in place
    frustum: Option<Frustum>,
    candidates: Vec<ObjectKey>,
    visible: Vec<VisibleObject>,
    stats: Option<CullingStats>,
}

impl ObjectCuller {
    /// Create a culler owning an empty grid over `bounds`.
    ///
    /// # Errors
    ///
    /// Same as `SpatialGrid::new`.
    pub fn new(bounds: BoundingBox, cells_per_axis: u32, config: ObjectCullerConfig) -> Result<Self> {
        Ok(Self {
            grid: SpatialGrid::new(bounds, cells_per_axis)?,
            config,
            frustum: None,
            candidates: Vec::new(),
            visible: Vec::new(),
            stats: None,
        })
    }

    // ===== OBJECT TRACKING =====

    pub fn add_object<T>(&mut self, key: ObjectKey, object: &SpatialObject<T>) -> Result<()> {
        self.grid.insert(key, object)
    }

    /// Must be called after an object's bounds changed.
    pub fn update_object<T>(&mut self, key: ObjectKey, object: &SpatialObject<T>) -> Result<()> {
        self.grid.update(key, object)
    }

    pub fn remove_object(&mut self, key: ObjectKey) -> bool {
        self.grid.remove(key)
    }

    /// Untrack every object and drop the last visible list.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.visible.clear();
        self.candidates.clear();
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn config(&self) -> &ObjectCullerConfig {
        &self.config
    }

    // ===== CULLING =====

    /// Compute the visible list for a camera.
    ///
    /// # Errors
    ///
    /// `DegenerateMatrix` if no frustum can be extracted from
    /// `view_projection`; the previous visible list is kept.
    pub fn cull(
        &mut self,
        view_projection: &Mat4,
        camera_position: Vec3,
        occlusion: Option<&dyn OcclusionTest>,
    ) -> Result<&[VisibleObject]> {
        let start = self.config.collect_stats.then(Instant::now);

        let frustum = match &mut self.frustum {
            Some(frustum) => {
                frustum.update(view_projection)?;
                *frustum
            }
            None => {
                let frustum = Frustum::from_view_projection_with_depth(
                    view_projection,
                    self.config.depth_range,
                )?;
                self.frustum = Some(frustum);
                frustum
            }
        };

        // ----- Coarse: grid query with the frustum's box -----
        let grid_bounds = *self.grid.bounds();
        let region = match frustum.bounding_box() {
            // Widened by the plane tolerance so the coarse phase keeps every
            // sphere the fine test accepts. A box disjoint from the grid
            // still reaches the clamped border cells, where out-of-bounds
            // objects live.
            Some(frustum_box) => {
                let band = Vec3::splat(FRUSTUM_EPSILON);
                let widened = BoundingBox {
                    min: frustum_box.min - band,
                    max: frustum_box.max + band,
                };
                widened.clamped_to(&grid_bounds).unwrap_or(widened)
            }
            // No corner survived: query everything
            None => grid_bounds,
        };

        self.candidates.clear();
        self.grid.query_box(&region, &mut self.candidates)?;

        // ----- Fine: exact sphere test + occlusion -----
        self.visible.clear();
        let mut frustum_culled = 0;
        let mut occluded = 0;

        for &key in &self.candidates {
            let Some(sphere) = self.grid.bounding_sphere(key) else {
                continue;
            };
            if !frustum.intersects_sphere(sphere) {
                frustum_culled += 1;
                continue;
            }
            if let Some(test) = occlusion {
                if test.test_sphere(sphere) == OcclusionResult::Occluded {
                    occluded += 1;
                    continue;
                }
            }
            self.visible.push(VisibleObject {
                key,
                distance_squared: sphere.center.distance_squared(camera_position),
            });
        }

        // ----- Sort -----
        match self.config.sort_mode {
            SortMode::FrontToBack => self.visible.radix_sort_unstable(),
            SortMode::BackToFront => {
                self.visible.radix_sort_unstable();
                self.visible.reverse();
            }
            SortMode::Unsorted => {}
        }

        if let Some(start) = start {
            let stats = CullingStats {
                total_objects: self.grid.len(),
                candidates: self.candidates.len(),
                visible: self.visible.len(),
                frustum_culled,
                occluded,
                elapsed: start.elapsed(),
            };
            engine_trace!("galaxy3d::ObjectCuller",
                "{}/{} visible ({} candidates, {} frustum-culled, {} occluded) in {:?}",
                stats.visible, stats.total_objects, stats.candidates,
                stats.frustum_culled, stats.occluded, stats.elapsed);
            self.stats = Some(stats);
        }

        Ok(&self.visible)
    }

    /// Visible list of the last successful cull.
    pub fn visible(&self) -> &[VisibleObject] {
        &self.visible
    }

    /// Frustum of the last successful cull.
    pub fn frustum(&self) -> Option<&Frustum> {
        self.frustum.as_ref()
    }

    /// Counters of the last cull; `None` unless `collect_stats` is set.
    pub fn stats(&self) -> Option<&CullingStats> {
        self.stats.as_ref()
    }
}

#[cfg(test)]
#[path = "object_culler_tests.rs"]
mod tests;
