/// Axis-aligned bounding box, min <= max on every axis.

use glam::Vec3;
use crate::error::Result;
use crate::engine_bail;
use super::bounding_sphere::BoundingSphere;

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl BoundingBox {
    /// Create a validated box.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if min > max on any axis or a component is not finite.
    pub fn new(min: Vec3, max: Vec3) -> Result<Self> {
        let aabb = Self { min, max };
        aabb.validate()?;
        Ok(aabb)
    }

    /// Check the box invariants.
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            engine_bail!("galaxy3d::BoundingBox", InvalidGeometry,
                "Box corners {:?} / {:?} are not finite", self.min, self.max);
        }
        if self.min.cmpgt(self.max).any() {
            engine_bail!("galaxy3d::BoundingBox", InvalidGeometry,
                "Box min {:?} exceeds max {:?}", self.min, self.max);
        }
        Ok(())
    }

    /// Componentwise min/max of a point set.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` for an empty slice or non-finite points.
    pub fn from_points(points: &[Vec3]) -> Result<Self> {
        let Some(first) = points.first() else {
            engine_bail!("galaxy3d::BoundingBox", InvalidGeometry,
                "Cannot build a bounding box from zero points");
        };

        let (min, max) = points[1..]
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));

        Self::new(min, max)
    }

    /// Tight box around a sphere.
    #[inline]
    pub fn from_sphere(sphere: &BoundingSphere) -> Self {
        let r = Vec3::splat(sphere.radius);
        Self {
            min: sphere.center - r,
            max: sphere.center + r,
        }
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis.
    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half size along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// The 8 corners. Bit 0 selects max.x, bit 1 max.y, bit 2 max.z.
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        corners
    }

    /// Smallest box containing both boxes.
    #[inline]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Intersection with `limits`, or `None` when they do not overlap.
    pub fn clamped_to(&self, limits: &BoundingBox) -> Option<BoundingBox> {
        let min = self.min.max(limits.min);
        let max = self.max.min(limits.max);
        if min.cmpgt(max).any() {
            None
        } else {
            Some(BoundingBox { min, max })
        }
    }

    /// True if the point lies inside or on the box.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// True if `other` lies entirely within this box (touching faces count).
    #[inline]
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// AABB-vs-AABB, separating axis with early out per axis.
    #[inline]
    pub fn intersects_aabb(&self, other: &BoundingBox) -> bool {
        if self.max.x < other.min.x || self.min.x > other.max.x {
            return false;
        }
        if self.max.y < other.min.y || self.min.y > other.max.y {
            return false;
        }
        if self.max.z < other.min.z || self.min.z > other.max.z {
            return false;
        }
        true
    }

    /// Box-vs-sphere. Same predicate as `BoundingSphere::intersects_aabb`.
    #[inline]
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        sphere.intersects_aabb(self)
    }
}

#[cfg(test)]
#[path = "bounding_box_tests.rs"]
mod tests;
