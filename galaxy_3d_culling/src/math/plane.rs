/// Plane in Hessian normal form: `normal · p + distance = 0`.
///
/// The signed distance of a point is positive on the side the normal
/// points to. Culling volumes keep their normals pointing inward, so
/// "positive" means "inside".

use glam::{Vec3, Vec4};
use crate::error::Result;
use crate::engine_bail;

/// Minimum normal length accepted when normalizing a plane.
///
/// Gribb-Hartmann rows of a sane view-projection have normal lengths of
/// order 1/tan(fov/2) or 1/(far-near); anything below 1e-6 means the matrix
/// collapsed an axis (zero scale, near == far) and the plane has no
/// meaningful orientation.
pub const PLANE_NORMAL_EPSILON: f32 = 1e-6;

/// Minimum |det| of the 3x3 normal system for a three-plane intersection.
///
/// For unit normals the determinant is the volume of the parallelepiped
/// they span, i.e. sin of the angle between one normal and the plane of the
/// other two. 1e-6 rejects planes within ~1e-4 degrees of being parallel,
/// where the solution would sit beyond f32 range for any real scene.
pub const PLANE_INTERSECTION_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal (for planes built through `normalized` / frustum extraction)
    pub normal: Vec3,
    /// Offset along the normal
    pub distance: f32,
}

impl Plane {
    pub const fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Raw (A, B, C, D) coefficients, not normalized.
    #[inline]
    pub fn from_vec4(coefficients: Vec4) -> Self {
        Self {
            normal: coefficients.truncate(),
            distance: coefficients.w,
        }
    }

    #[inline]
    pub fn to_vec4(&self) -> Vec4 {
        self.normal.extend(self.distance)
    }

    /// Plane with the given (not necessarily unit) normal through `point`.
    #[inline]
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Scale so the normal has unit length.
    ///
    /// # Errors
    ///
    /// `DegenerateMatrix` if the normal is shorter than `PLANE_NORMAL_EPSILON`
    /// or not finite.
    pub fn normalized(&self) -> Result<Self> {
        let length = self.normal.length();
        if !length.is_finite() || length < PLANE_NORMAL_EPSILON {
            engine_bail!("galaxy3d::Plane", DegenerateMatrix,
                "Plane normal {:?} has length {} (min {})",
                self.normal, length, PLANE_NORMAL_EPSILON);
        }
        Ok(Self {
            normal: self.normal / length,
            distance: self.distance / length,
        })
    }

    /// Flip the plane if needed so that `point` lies on the positive side.
    #[inline]
    pub fn oriented_toward(self, point: Vec3) -> Self {
        if self.signed_distance(point) < 0.0 {
            Self {
                normal: -self.normal,
                distance: -self.distance,
            }
        } else {
            self
        }
    }

    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// True if |normal| is within `tolerance` of 1.
    #[inline]
    pub fn is_unit(&self, tolerance: f32) -> bool {
        (self.normal.length() - 1.0).abs() <= tolerance
    }
}

/// Common point of three planes, by Cramer's rule.
///
/// The system `n_i · x = -d_i` has determinant `det = n_a · (n_b × n_c)`.
/// Replacing each column by the right-hand side and expanding gives the
/// closed form
///
/// ```text
/// x = -(d_a (n_b × n_c) + d_b (n_c × n_a) + d_c (n_a × n_b)) / det
/// ```
///
/// Returns `None` when |det| < `PLANE_INTERSECTION_EPSILON` (two or more
/// planes are near-parallel) or the result is not finite.
pub fn intersect_three_planes(a: &Plane, b: &Plane, c: &Plane) -> Option<Vec3> {
    let bc = b.normal.cross(c.normal);
    let det = a.normal.dot(bc);
    if !det.is_finite() || det.abs() < PLANE_INTERSECTION_EPSILON {
        return None;
    }

    let ca = c.normal.cross(a.normal);
    let ab = a.normal.cross(b.normal);
    let point = -(bc * a.distance + ca * b.distance + ab * c.distance) / det;

    point.is_finite().then_some(point)
}

#[cfg(test)]
#[path = "plane_tests.rs"]
mod tests;
