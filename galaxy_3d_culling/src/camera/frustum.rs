/// Frustum: six inward-facing clipping planes for visibility culling.
///
/// Each plane is stored as a unit normal + distance, so
/// `plane.signed_distance(p)` is a true Euclidean distance:
/// - positive: p is on the visible side
/// - a point is inside the frustum if its distance is >= 0 for all planes
///
/// The caller owns the frustum and refreshes it from the camera matrices
/// every frame (`update`), no history is kept.

use glam::{Mat4, Vec3, Vec4};
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::error::Result;
use crate::engine_bail;
use crate::math::{Plane, intersect_three_planes, matrix_from_slice};

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Tolerance band of the sphere / box / point tests, in world units.
///
/// Plane distances come out of a 4x4 product and a normalization. For
/// coordinates up to ~1e4 units, f32 epsilon (1.19e-7) times the magnitude
/// times a handful of rounding steps lands in the 1e-3..1e-2 range. Objects
/// grazing a plane within that band are kept: a false positive costs one
/// extra draw, a false negative is a visible pop.
pub const FRUSTUM_EPSILON: f32 = 1e-2;

/// Accepted deviation of |normal| from 1 in `Frustum::from_planes`.
///
/// Planes normalized in f32 and round-tripped through GPU buffers or
/// serialization drift by a few ulps; 1e-3 accepts that and still rejects
/// planes that were never normalized.
pub const PLANE_UNIT_TOLERANCE: f32 = 1e-3;

/// Clip-space depth convention of the projection matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthRange {
    /// z_ndc in [0, 1] (wgpu, Vulkan, Metal, D3D; glam's `perspective_rh`)
    #[default]
    ZeroToOne,
    /// z_ndc in [-1, 1] (OpenGL; glam's `perspective_rh_gl`)
    NegativeOneToOne,
}

impl DepthRange {
    /// NDC depth of the near plane.
    #[inline]
    pub fn near_ndc(self) -> f32 {
        match self {
            DepthRange::ZeroToOne => 0.0,
            DepthRange::NegativeOneToOne => -1.0,
        }
    }
}

/// Six frustum planes for culling.
///
/// Normals point inward (toward the visible volume). Works with both
/// perspective and orthographic projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    planes: [Plane; 6],
    depth_range: DepthRange,
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix with [0, 1] depth.
    ///
    /// # Errors
    ///
    /// `DegenerateMatrix` if a plane normal is too short to normalize.
    pub fn from_view_projection(vp: &Mat4) -> Result<Self> {
        Self::from_view_projection_with_depth(vp, DepthRange::ZeroToOne)
    }

    /// Extract frustum planes with an explicit clip-space depth convention.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections.
    pub fn from_view_projection_with_depth(vp: &Mat4, depth_range: DepthRange) -> Result<Self> {
        let planes = extract_planes(vp, depth_range)?;
        Ok(Self { planes, depth_range })
    }

    /// Extract from 16 column-major floats ([0, 1] depth).
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `values.len() != 16` or an entry is not finite,
    /// `DegenerateMatrix` as for `from_view_projection`.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        let vp = matrix_from_slice(values)?;
        Self::from_view_projection(&vp)
    }

    /// Build from explicit planes in LEFT/RIGHT/BOTTOM/TOP/NEAR/FAR order.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if any normal is not unit length within
    /// `PLANE_UNIT_TOLERANCE`, or any value is not finite.
    pub fn from_planes(planes: [Plane; 6]) -> Result<Self> {
        for (index, plane) in planes.iter().enumerate() {
            if !plane.normal.is_finite() || !plane.distance.is_finite() {
                engine_bail!("galaxy3d::Frustum", InvalidGeometry,
                    "Plane {} is not finite: {:?}", index, plane);
            }
            if !plane.is_unit(PLANE_UNIT_TOLERANCE) {
                engine_bail!("galaxy3d::Frustum", InvalidGeometry,
                    "Plane {} normal {:?} is not unit length (|n| = {})",
                    index, plane.normal, plane.normal.length());
            }
        }
        Ok(Self {
            planes,
            depth_range: DepthRange::default(),
        })
    }

    /// Re-extract the planes in place from a new view-projection matrix.
    ///
    /// On failure the previous planes are kept untouched.
    pub fn update(&mut self, vp: &Mat4) -> Result<()> {
        self.planes = extract_planes(vp, self.depth_range)?;
        Ok(())
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// One plane by index (`PLANE_LEFT` .. `PLANE_FAR`).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 6`.
    pub fn plane(&self, index: usize) -> &Plane {
        &self.planes[index]
    }

    pub fn depth_range(&self) -> DepthRange {
        self.depth_range
    }

    /// Test if a sphere intersects this frustum.
    ///
    /// The sphere is rejected as soon as one plane puts its center further
    /// than `radius + FRUSTUM_EPSILON` on the outside.
    #[inline]
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        for plane in &self.planes {
            if plane.signed_distance(sphere.center) + FRUSTUM_EPSILON < -sphere.radius {
                return false;
            }
        }
        true
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// Uses the "positive vertex" test: for each plane, find the AABB corner
    /// most in the direction of the plane normal. If that corner is outside,
    /// the AABB is fully outside.
    ///
    /// May return false positives (conservative), never false negatives.
    pub fn intersects_aabb(&self, aabb: &BoundingBox) -> bool {
        for plane in &self.planes {
            let normal = plane.normal;

            // Find the positive vertex (corner most aligned with the normal)
            let p_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if plane.signed_distance(p_vertex) + FRUSTUM_EPSILON < 0.0 {
                return false;
            }
        }

        true
    }

    /// True if the point is inside every plane (within `FRUSTUM_EPSILON`).
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(point) >= -FRUSTUM_EPSILON)
    }

    /// Frustum corners from (LEFT|RIGHT) x (BOTTOM|TOP) x (NEAR|FAR) plane
    /// triples.
    ///
    /// Triples that are near-singular (e.g. an infinite far plane) are
    /// skipped, so fewer than 8 corners may come back. Order follows
    /// `BoundingBox::corners`: bit 0 selects RIGHT, bit 1 TOP, bit 2 FAR.
    pub fn corners(&self) -> Vec<Vec3> {
        let mut corners = Vec::with_capacity(8);
        for depth in [PLANE_NEAR, PLANE_FAR] {
            for vertical in [PLANE_BOTTOM, PLANE_TOP] {
                for horizontal in [PLANE_LEFT, PLANE_RIGHT] {
                    if let Some(corner) = intersect_three_planes(
                        &self.planes[horizontal],
                        &self.planes[vertical],
                        &self.planes[depth],
                    ) {
                        corners.push(corner);
                    }
                }
            }
        }
        corners
    }

    /// World-space box around the frustum corners.
    ///
    /// `None` when no corner could be computed.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let corners = self.corners();
        let (first, rest) = corners.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(BoundingBox { min, max })
    }
}

/// Gribb & Hartmann: planes from rows of the VP matrix, each normalized so
/// that the normal is a unit vector.
fn extract_planes(vp: &Mat4, depth_range: DepthRange) -> Result<[Plane; 6]> {
    let row0 = vp.row(0);
    let row1 = vp.row(1);
    let row2 = vp.row(2);
    let row3 = vp.row(3);

    let near: Vec4 = match depth_range {
        DepthRange::ZeroToOne => row2,
        DepthRange::NegativeOneToOne => row3 + row2,
    };

    let raw = [
        row3 + row0, // Left
        row3 - row0, // Right
        row3 + row1, // Bottom
        row3 - row1, // Top
        near,        // Near
        row3 - row2, // Far
    ];

    let mut planes = [Plane::new(Vec3::ZERO, 0.0); 6];
    for (plane, coefficients) in planes.iter_mut().zip(raw) {
        *plane = Plane::from_vec4(coefficients).normalized()?;
    }
    Ok(planes)
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
