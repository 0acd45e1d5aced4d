use glam::{Mat4, Vec3, Vec4};
use crate::error::Error;
use super::*;

fn assert_mat_approx(a: &Mat4, b: &Mat4, eps: f32) {
    let a = a.to_cols_array();
    let b = b.to_cols_array();
    for i in 0..16 {
        assert!((a[i] - b[i]).abs() < eps, "element {} differs: {} vs {}", i, a[i], b[i]);
    }
}

// ============================================================================
// invert_matrix
// ============================================================================

#[test]
fn test_invert_identity() {
    let inv = invert_matrix(&Mat4::IDENTITY).unwrap();
    assert_mat_approx(&inv, &Mat4::IDENTITY, 1e-6);
}

#[test]
fn test_invert_perspective_matches_glam() {
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, 500.0);
    let inv = invert_matrix(&proj).unwrap();
    assert_mat_approx(&inv, &proj.inverse(), 1e-3);
    assert_mat_approx(&(proj * inv), &Mat4::IDENTITY, 1e-4);
}

#[test]
fn test_invert_general_transform() {
    let m = Mat4::from_scale_rotation_translation(
        Vec3::new(2.0, 0.5, 3.0),
        glam::Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 0.7),
        Vec3::new(10.0, -4.0, 2.5),
    );
    let inv = invert_matrix(&m).unwrap();
    assert_mat_approx(&(m * inv), &Mat4::IDENTITY, 1e-4);
    assert_mat_approx(&inv, &m.inverse(), 1e-4);
}

#[test]
fn test_invert_zero_matrix_fails() {
    let result = invert_matrix(&Mat4::ZERO);
    assert!(matches!(result, Err(Error::DegenerateMatrix(_))));
}

#[test]
fn test_invert_duplicated_column_fails() {
    let col = Vec4::new(1.0, 2.0, 3.0, 4.0);
    let m = Mat4::from_cols(col, col, Vec4::Z, Vec4::W);
    assert!(matches!(invert_matrix(&m), Err(Error::DegenerateMatrix(_))));
}

#[test]
fn test_determinant_of_scale() {
    let m = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
    assert!((determinant(&m) - 24.0).abs() < 1e-5);
}

// ============================================================================
// matrix_from_slice
// ============================================================================

#[test]
fn test_matrix_from_slice_column_major() {
    let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let values = m.to_cols_array();
    let rebuilt = matrix_from_slice(&values).unwrap();
    assert_eq!(rebuilt, m);
    // Translation lives in elements 12..15 in column-major order
    assert_eq!(values[12], 1.0);
    assert_eq!(values[13], 2.0);
    assert_eq!(values[14], 3.0);
}

#[test]
fn test_matrix_from_slice_wrong_length() {
    assert!(matches!(matrix_from_slice(&[0.0; 15]), Err(Error::InvalidArgument(_))));
    assert!(matches!(matrix_from_slice(&[0.0; 17]), Err(Error::InvalidArgument(_))));
    assert!(matches!(matrix_from_slice(&[]), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_matrix_from_slice_non_finite() {
    let mut values = Mat4::IDENTITY.to_cols_array();
    values[5] = f32::NAN;
    assert!(matches!(matrix_from_slice(&values), Err(Error::InvalidArgument(_))));
}
