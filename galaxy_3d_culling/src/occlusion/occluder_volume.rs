/// OccluderVolume: occlusion by containment in caller-declared boxes.
///
/// An object is occluded only if its box lies entirely inside a single
/// occluder (e.g. the inside of a building). Partial overlap, or coverage
/// split across several occluders, is always reported visible.

use crate::bounds::{BoundingBox, BoundingSphere};
use crate::error::Result;
use super::{OcclusionResult, OcclusionTest};

/// A solid box that hides everything inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occluder {
    pub id: u64,
    pub bounds: BoundingBox,
}

impl Occluder {
    pub fn new(id: u64, bounds: BoundingBox) -> Self {
        Self { id, bounds }
    }
}

#[derive(Debug, Default)]
pub struct OccluderVolume {
    occluders: Vec<Occluder>,
}

impl OccluderVolume {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an occluder.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if the occluder's box is malformed.
    pub fn add(&mut self, occluder: Occluder) -> Result<()> {
        occluder.bounds.validate()?;
        self.occluders.push(occluder);
        Ok(())
    }

    /// Remove every occluder with this id. Returns false if none matched.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.occluders.len();
        self.occluders.retain(|occluder| occluder.id != id);
        self.occluders.len() != before
    }

    pub fn clear(&mut self) {
        self.occluders.clear();
    }

    pub fn len(&self) -> usize {
        self.occluders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occluders.is_empty()
    }

    pub fn occluders(&self) -> &[Occluder] {
        &self.occluders
    }

    pub fn test_box(&self, aabb: &BoundingBox) -> OcclusionResult {
        if self.occluders.iter().any(|occluder| occluder.bounds.contains_box(aabb)) {
            OcclusionResult::Occluded
        } else {
            OcclusionResult::Visible
        }
    }
}

impl OcclusionTest for OccluderVolume {
    /// Tests the sphere's enclosing box, so a sphere is occluded only when
    /// its box fits inside one occluder.
    fn test_sphere(&self, sphere: &BoundingSphere) -> OcclusionResult {
        self.test_box(&sphere.to_aabb())
    }
}
