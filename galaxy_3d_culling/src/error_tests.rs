//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_invalid_geometry_display() {
    let err = Error::InvalidGeometry("radius -1 is negative".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid geometry"));
    assert!(display.contains("radius -1 is negative"));
}

#[test]
fn test_invalid_argument_display() {
    let err = Error::InvalidArgument("cells_per_axis 0 out of range".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid argument"));
    assert!(display.contains("cells_per_axis"));
}

#[test]
fn test_degenerate_matrix_display() {
    let err = Error::DegenerateMatrix("determinant is zero".to_string());
    assert_eq!(format!("{}", err), "Degenerate matrix: determinant is zero");
}

#[test]
fn test_gpu_errors_display() {
    let setup = Error::GpuSetupFailed("shader compilation".to_string());
    assert!(format!("{}", setup).contains("GPU setup failed"));

    let lost = Error::GpuDeviceLost("map failed".to_string());
    assert!(format!("{}", lost).contains("GPU device lost"));

    let backend = Error::BackendError("poll timeout".to_string());
    assert!(format!("{}", backend).contains("Backend error"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::InvalidArgument("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let err = Error::InvalidGeometry("test".to_string());
    let debug = format!("{:?}", err);
    assert!(debug.contains("InvalidGeometry"));
}

#[test]
fn test_error_clone_and_eq() {
    let err1 = Error::GpuDeviceLost("device removed".to_string());
    let err2 = err1.clone();
    assert_eq!(err1, err2);
}

#[test]
fn test_is_gpu_error() {
    assert!(Error::GpuSetupFailed(String::new()).is_gpu_error());
    assert!(Error::GpuDeviceLost(String::new()).is_gpu_error());
    assert!(Error::BackendError(String::new()).is_gpu_error());
    assert!(!Error::InvalidGeometry(String::new()).is_gpu_error());
    assert!(!Error::DegenerateMatrix(String::new()).is_gpu_error());
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

#[test]
fn test_result_propagation() {
    fn inner() -> Result<u32> {
        Err(Error::InvalidArgument("inner".to_string()))
    }
    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert!(matches!(outer(), Err(Error::InvalidArgument(_))));
}
