//! Camera module: view frustum extraction and clip-space conventions.
//!
//! Frustums are passive data recomputed by the caller every frame from the
//! camera matrices.

mod frustum;

pub use frustum::{
    Frustum, DepthRange,
    FRUSTUM_EPSILON, PLANE_UNIT_TOLERANCE,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
