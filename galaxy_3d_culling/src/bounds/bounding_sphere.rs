/// Bounding sphere: center + radius, radius >= 0.
///
/// All predicates compare squared distances; no square root is taken on
/// the hot path.

use glam::Vec3;
use crate::error::Result;
use crate::engine_bail;
use super::bounding_box::BoundingBox;

/// Bounding sphere in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center (x, y, z)
    pub center: Vec3,
    /// Radius, never negative
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a validated sphere.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if the radius is negative or any component is not finite.
    pub fn new(center: Vec3, radius: f32) -> Result<Self> {
        let sphere = Self { center, radius };
        sphere.validate()?;
        Ok(sphere)
    }

    /// Check the sphere invariants (finite center, finite radius >= 0).
    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() {
            engine_bail!("galaxy3d::BoundingSphere", InvalidGeometry,
                "Sphere center {:?} is not finite", self.center);
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            engine_bail!("galaxy3d::BoundingSphere", InvalidGeometry,
                "Sphere radius {} must be finite and >= 0", self.radius);
        }
        Ok(())
    }

    /// Smallest-effort enclosing sphere: centroid + farthest point.
    ///
    /// Not the minimal sphere, but it contains every input point.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` for an empty slice or non-finite points.
    pub fn from_points(points: &[Vec3]) -> Result<Self> {
        if points.is_empty() {
            engine_bail!("galaxy3d::BoundingSphere", InvalidGeometry,
                "Cannot build a bounding sphere from zero points");
        }

        let sum: Vec3 = points.iter().copied().sum();
        let center = sum / points.len() as f32;

        let max_distance_sq = points
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0f32, f32::max);

        // Grow by one ulp-scale step so boundary points stay inside after rounding
        let radius = max_distance_sq.sqrt();
        let radius = radius + radius.max(1.0) * f32::EPSILON * 4.0;

        Self::new(center, radius)
    }

    /// True if the point lies inside or on the sphere (inclusive boundary).
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Sphere-vs-AABB: clamp the center to the box, compare squared distance.
    #[inline]
    pub fn intersects_aabb(&self, aabb: &BoundingBox) -> bool {
        let closest = self.center.clamp(aabb.min, aabb.max);
        closest.distance_squared(self.center) <= self.radius * self.radius
    }

    /// Sphere-vs-sphere overlap (touching counts).
    #[inline]
    pub fn intersects_sphere(&self, other: &BoundingSphere) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }

    /// Axis-aligned box enclosing this sphere.
    #[inline]
    pub fn to_aabb(&self) -> BoundingBox {
        BoundingBox::from_sphere(self)
    }
}

#[cfg(test)]
#[path = "bounding_sphere_tests.rs"]
mod tests;
