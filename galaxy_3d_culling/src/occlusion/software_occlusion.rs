/// SoftwareOcclusionTest: coarse CPU depth buffer for occluder boxes.
///
/// Each frame:
/// 1. `begin_frame` clears a small square depth buffer to the far plane
/// 2. `rasterize` projects each occluder box, fills the convex hull of its
///    8 projected corners with the depth of its nearest corner
/// 3. `test_sphere` projects only the sphere center and compares it to the
///    stored depth
///
/// Occluders crossing the near plane are skipped. Sphere radii are ignored
/// and off-screen / behind-camera centers are always visible.

use std::cell::Cell;
use glam::{Mat4, Vec2, Vec3};
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::camera::DepthRange;
use crate::engine_trace;
use super::occluder_volume::Occluder;
use super::{OcclusionResult, OcclusionTest};

/// Clip-space w below which a point counts as on or behind the eye plane.
const MIN_CLIP_W: f32 = 1e-6;

/// Cleared depth value (far plane).
const FAR_DEPTH: f32 = 1.0;

/// Largest depth buffer edge in pixels. Keeps `resolution²` and every
/// `y * resolution + x` index within `u32`.
pub const MAX_OCCLUSION_RESOLUTION: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftwareOcclusionConfig {
    /// Width and height of the depth buffer in pixels
    pub resolution: u32,
    /// Margin added to the stored depth before declaring a point occluded,
    /// in [0, 1] depth units
    pub depth_bias: f32,
    /// Clip-space depth convention of the view-projection matrices
    pub depth_range: DepthRange,
}

impl Default for SoftwareOcclusionConfig {
    fn default() -> Self {
        Self {
            resolution: 64,
            depth_bias: 1e-5,
            depth_range: DepthRange::ZeroToOne,
        }
    }
}

/// Counters since the last `begin_frame`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftwareOcclusionStats {
    pub occluders_rasterized: u32,
    /// Occluders crossing the near plane or projecting to no area
    pub occluders_skipped: u32,
    pub pixels_written: u32,
    pub spheres_tested: u32,
    pub spheres_occluded: u32,
}

/// A corner projected to the depth buffer.
#[derive(Debug, Clone, Copy)]
struct ScreenPoint {
    /// Pixel coordinates, row 0 at the top
    position: Vec2,
    /// Depth in [0, 1] (values outside mean outside the depth range)
    depth: f32,
}

pub struct SoftwareOcclusionTest {
    config: SoftwareOcclusionConfig,
    depth: Vec<f32>,
    view_projection: Mat4,
    stats: SoftwareOcclusionStats,
    spheres_tested: Cell<u32>,
    spheres_occluded: Cell<u32>,
}

impl SoftwareOcclusionTest {
    /// Create the test with a cleared buffer. The resolution is clamped to
    /// `[1, MAX_OCCLUSION_RESOLUTION]`.
    pub fn new(config: SoftwareOcclusionConfig) -> Self {
        let config = SoftwareOcclusionConfig {
            resolution: config.resolution.clamp(1, MAX_OCCLUSION_RESOLUTION),
            ..config
        };
        let pixel_count = config.resolution as usize * config.resolution as usize;

        Self {
            config,
            depth: vec![FAR_DEPTH; pixel_count],
            view_projection: Mat4::IDENTITY,
            stats: SoftwareOcclusionStats::default(),
            spheres_tested: Cell::new(0),
            spheres_occluded: Cell::new(0),
        }
    }

    /// Clear the depth buffer and set the camera for this frame.
    pub fn begin_frame(&mut self, view_projection: &Mat4) {
        self.depth.fill(FAR_DEPTH);
        self.view_projection = *view_projection;
        self.stats = SoftwareOcclusionStats::default();
        self.spheres_tested.set(0);
        self.spheres_occluded.set(0);
    }

    pub fn rasterize(&mut self, occluder: &Occluder) {
        self.rasterize_box(&occluder.bounds);
    }

    /// Write a box into the depth buffer (min-write, nearest corner depth).
    pub fn rasterize_box(&mut self, aabb: &BoundingBox) {
        let mut projected = [ScreenPoint { position: Vec2::ZERO, depth: 0.0 }; 8];
        for (slot, corner) in projected.iter_mut().zip(aabb.corners()) {
            match self.project(corner) {
                Some(point) => *slot = point,
                None => {
                    // Crosses the near plane: its hull cannot be bounded
                    self.stats.occluders_skipped += 1;
                    return;
                }
            }
        }

        let nearest = projected
            .iter()
            .map(|point| point.depth)
            .fold(f32::INFINITY, f32::min);

        let points: Vec<Vec2> = projected.iter().map(|point| point.position).collect();
        let hull = convex_hull(points);
        if hull.len() < 3 {
            self.stats.occluders_skipped += 1;
            return;
        }

        let written = self.fill_polygon(&hull, nearest);
        self.stats.occluders_rasterized += 1;
        self.stats.pixels_written += written;
    }

    /// Stored depth at pixel (x, y), row 0 at the top.
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        let resolution = self.config.resolution;
        if x >= resolution || y >= resolution {
            return None;
        }
        self.depth.get((y * resolution + x) as usize).copied()
    }

    pub fn resolution(&self) -> u32 {
        self.config.resolution
    }

    pub fn config(&self) -> &SoftwareOcclusionConfig {
        &self.config
    }

    pub fn stats(&self) -> SoftwareOcclusionStats {
        SoftwareOcclusionStats {
            spheres_tested: self.spheres_tested.get(),
            spheres_occluded: self.spheres_occluded.get(),
            ..self.stats
        }
    }

    /// Log the frame counters at TRACE.
    pub fn log_stats(&self) {
        let stats = self.stats();
        engine_trace!("galaxy3d::SoftwareOcclusionTest",
            "{} occluders rasterized ({} skipped), {} px written, {}/{} spheres occluded",
            stats.occluders_rasterized, stats.occluders_skipped, stats.pixels_written,
            stats.spheres_occluded, stats.spheres_tested);
    }

    // ===== INTERNALS =====

    /// World point → pixel position + [0, 1] depth.
    ///
    /// `None` when the point is on or behind the eye plane, or in front of
    /// the near plane.
    fn project(&self, point: Vec3) -> Option<ScreenPoint> {
        let clip = self.view_projection * point.extend(1.0);
        if !clip.is_finite() || clip.w <= MIN_CLIP_W {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        let depth = match self.config.depth_range {
            DepthRange::ZeroToOne => ndc.z,
            DepthRange::NegativeOneToOne => ndc.z * 0.5 + 0.5,
        };
        if depth < 0.0 {
            return None;
        }

        let resolution = self.config.resolution as f32;
        Some(ScreenPoint {
            position: Vec2::new(
                (ndc.x * 0.5 + 0.5) * resolution,
                (0.5 - ndc.y * 0.5) * resolution,
            ),
            depth,
        })
    }

    /// Min-write `depth` into every pixel whose center lies inside the
    /// convex hull polygon. Returns the number of pixels lowered.
    fn fill_polygon(&mut self, hull: &[Vec2], depth: f32) -> u32 {
        let resolution = self.config.resolution;
        let max_index = (resolution - 1) as f32;

        let (min, max) = hull[1..]
            .iter()
            .fold((hull[0], hull[0]), |(min, max), p| (min.min(*p), max.max(*p)));

        // Pixel centers at i + 0.5: candidate range of indices
        let x0 = (min.x - 0.5).ceil().clamp(0.0, max_index) as u32;
        let x1 = (max.x - 0.5).floor();
        let y0 = (min.y - 0.5).ceil().clamp(0.0, max_index) as u32;
        let y1 = (max.y - 0.5).floor();
        if x1 < 0.0 || y1 < 0.0 {
            return 0;
        }
        let x1 = x1.min(max_index) as u32;
        let y1 = y1.min(max_index) as u32;

        let mut written = 0;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !point_in_convex_polygon(hull, center) {
                    continue;
                }
                let texel = &mut self.depth[(y * resolution + x) as usize];
                if depth < *texel {
                    *texel = depth;
                    written += 1;
                }
            }
        }
        written
    }
}

impl OcclusionTest for SoftwareOcclusionTest {
    /// Center-only test: the sphere is occluded when its center is further
    /// than the stored depth (plus bias) at the pixel it projects to.
    fn test_sphere(&self, sphere: &BoundingSphere) -> OcclusionResult {
        self.spheres_tested.set(self.spheres_tested.get() + 1);

        let Some(point) = self.project(sphere.center) else {
            return OcclusionResult::Visible;
        };
        let resolution = self.config.resolution as f32;
        if point.position.x < 0.0
            || point.position.y < 0.0
            || point.position.x >= resolution
            || point.position.y >= resolution
        {
            return OcclusionResult::Visible;
        }

        let x = point.position.x as u32;
        let y = point.position.y as u32;
        let stored = match self.depth_at(x, y) {
            Some(stored) if stored < FAR_DEPTH => stored,
            _ => return OcclusionResult::Visible,
        };

        if point.depth > stored + self.config.depth_bias {
            self.spheres_occluded.set(self.spheres_occluded.get() + 1);
            OcclusionResult::Occluded
        } else {
            OcclusionResult::Visible
        }
    }
}

/// 2D convex hull (Andrew's monotone chain), collinear points dropped.
///
/// Consecutive hull vertices always turn with `cross > 0`, the orientation
/// `point_in_convex_polygon` expects.
fn convex_hull(mut points: Vec<Vec2>) -> Vec<Vec2> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<Vec2> = Vec::with_capacity(points.len());
    for p in &points {
        push_hull_point(&mut lower, *p);
    }
    let mut upper: Vec<Vec2> = Vec::with_capacity(points.len());
    for p in points.iter().rev() {
        push_hull_point(&mut upper, *p);
    }

    // Each chain ends on the first point of the other
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn push_hull_point(chain: &mut Vec<Vec2>, point: Vec2) {
    while chain.len() >= 2 && cross(chain[chain.len() - 2], chain[chain.len() - 1], point) <= 0.0 {
        chain.pop();
    }
    chain.push(point);
}

/// z of (b - a) × (c - a).
#[inline]
fn cross(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

/// Inclusive inside test for a polygon from `convex_hull`.
fn point_in_convex_polygon(polygon: &[Vec2], point: Vec2) -> bool {
    (0..polygon.len()).all(|i| {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        cross(a, b, point) >= 0.0
    })
}

#[cfg(test)]
#[path = "software_occlusion_tests.rs"]
mod tests;
