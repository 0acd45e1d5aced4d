//! Bounding volumes: sphere and axis-aligned box value types with the
//! intersection predicates every culling stage is built on.

mod bounding_sphere;
mod bounding_box;

pub use bounding_sphere::BoundingSphere;
pub use bounding_box::BoundingBox;
