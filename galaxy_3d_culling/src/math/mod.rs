//! Math module: plane and matrix helpers that glam does not provide with
//! the failure semantics culling needs (checked inversion, checked slices,
//! three-plane intersection).

mod matrix;
mod plane;

pub use matrix::{invert_matrix, matrix_from_slice, determinant, DETERMINANT_EPSILON};
pub use plane::{
    Plane, intersect_three_planes,
    PLANE_NORMAL_EPSILON, PLANE_INTERSECTION_EPSILON,
};
