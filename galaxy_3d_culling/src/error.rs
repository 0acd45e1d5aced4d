//! Error types for the Galaxy3D culling core
//!
//! This module defines the error types used throughout the culling system,
//! including geometry validation, matrix degeneracy and GPU backend failures.

use thiserror::Error as ThisError;

/// Result type for Galaxy3D culling operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D culling errors
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// Geometry violates its invariants (negative radius, inverted bounds, non-unit plane)
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Argument outside its accepted domain (cell count, matrix length, screen size, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Numerically degenerate matrix (near-zero determinant or plane normal)
    #[error("Degenerate matrix: {0}")]
    DegenerateMatrix(String),

    /// GPU pipeline or resource creation failed
    #[error("GPU setup failed: {0}")]
    GpuSetupFailed(String),

    /// GPU device was lost (or a readback mapping failed) while culling
    #[error("GPU device lost: {0}")]
    GpuDeviceLost(String),

    /// Backend-specific error (wgpu poll, submission, ...)
    #[error("Backend error: {0}")]
    BackendError(String),
}

impl Error {
    /// True for errors raised by the GPU path.
    ///
    /// The strategy layer uses this to decide whether falling back to the
    /// CPU path can recover the frame.
    pub fn is_gpu_error(&self) -> bool {
        matches!(
            self,
            Error::GpuSetupFailed(_) | Error::GpuDeviceLost(_) | Error::BackendError(_)
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
