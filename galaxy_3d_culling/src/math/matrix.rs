/// Checked 4x4 matrix operations.
///
/// `glam::Mat4::inverse()` silently produces NaN/inf for singular input.
/// Tile frustum construction must instead fail loudly on a degenerate
/// projection, so inversion is done here by cofactor expansion with an
/// explicit determinant check.

use glam::Mat4;
use crate::error::Result;
use crate::engine_bail;

/// Minimum |determinant| accepted by `invert_matrix`.
///
/// Derivation: the smallest determinant of a legitimate camera projection
/// is an orthographic projection spanning ~10 km on every axis,
/// `(2 / 1e4)^3 ≈ 8e-12`. Exactly singular inputs (zero rows, duplicated
/// rows, zero-extent projections) evaluate to 0 or a subnormal value. The
/// threshold sits three orders of magnitude under the legitimate minimum.
pub const DETERMINANT_EPSILON: f32 = 1e-15;

/// The 2x2 sub-determinants shared by the determinant and the adjugate.
///
/// `s*` come from the top two rows, `c*` from the bottom two rows.
struct SubDeterminants {
    s: [f32; 6],
    c: [f32; 6],
}

fn sub_determinants(a: &[[f32; 4]; 4]) -> SubDeterminants {
    SubDeterminants {
        s: [
            a[0][0] * a[1][1] - a[1][0] * a[0][1],
            a[0][0] * a[1][2] - a[1][0] * a[0][2],
            a[0][0] * a[1][3] - a[1][0] * a[0][3],
            a[0][1] * a[1][2] - a[1][1] * a[0][2],
            a[0][1] * a[1][3] - a[1][1] * a[0][3],
            a[0][2] * a[1][3] - a[1][2] * a[0][3],
        ],
        c: [
            a[2][0] * a[3][1] - a[3][0] * a[2][1],
            a[2][0] * a[3][2] - a[3][0] * a[2][2],
            a[2][0] * a[3][3] - a[3][0] * a[2][3],
            a[2][1] * a[3][2] - a[3][1] * a[2][2],
            a[2][1] * a[3][3] - a[3][1] * a[2][3],
            a[2][2] * a[3][3] - a[3][2] * a[2][3],
        ],
    }
}

fn determinant_from(sd: &SubDeterminants) -> f32 {
    let (s, c) = (&sd.s, &sd.c);
    s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
}

/// Determinant of a 4x4 matrix (Laplace expansion over 2x2 minors).
pub fn determinant(matrix: &Mat4) -> f32 {
    let a = matrix.to_cols_array_2d();
    determinant_from(&sub_determinants(&a))
}

/// Invert a 4x4 matrix by cofactor expansion.
///
/// The input is read as its column array; because `(Aᵀ)⁻¹ = (A⁻¹)ᵀ`, writing
/// the adjugate back in the same layout yields the inverse of `matrix`.
///
/// # Errors
///
/// `DegenerateMatrix` if |det| < `DETERMINANT_EPSILON` or the result is not finite.
pub fn invert_matrix(matrix: &Mat4) -> Result<Mat4> {
    let a = matrix.to_cols_array_2d();
    let sd = sub_determinants(&a);
    let det = determinant_from(&sd);

    if !det.is_finite() || det.abs() < DETERMINANT_EPSILON {
        engine_bail!("galaxy3d::math", DegenerateMatrix,
            "Cannot invert matrix: determinant {} is below {}", det, DETERMINANT_EPSILON);
    }

    let inv_det = 1.0 / det;
    let (s, c) = (&sd.s, &sd.c);

    let b = [
        [
            (a[1][1] * c[5] - a[1][2] * c[4] + a[1][3] * c[3]) * inv_det,
            (-a[0][1] * c[5] + a[0][2] * c[4] - a[0][3] * c[3]) * inv_det,
            (a[3][1] * s[5] - a[3][2] * s[4] + a[3][3] * s[3]) * inv_det,
            (-a[2][1] * s[5] + a[2][2] * s[4] - a[2][3] * s[3]) * inv_det,
        ],
        [
            (-a[1][0] * c[5] + a[1][2] * c[2] - a[1][3] * c[1]) * inv_det,
            (a[0][0] * c[5] - a[0][2] * c[2] + a[0][3] * c[1]) * inv_det,
            (-a[3][0] * s[5] + a[3][2] * s[2] - a[3][3] * s[1]) * inv_det,
            (a[2][0] * s[5] - a[2][2] * s[2] + a[2][3] * s[1]) * inv_det,
        ],
        [
            (a[1][0] * c[4] - a[1][1] * c[2] + a[1][3] * c[0]) * inv_det,
            (-a[0][0] * c[4] + a[0][1] * c[2] - a[0][3] * c[0]) * inv_det,
            (a[3][0] * s[4] - a[3][1] * s[2] + a[3][3] * s[0]) * inv_det,
            (-a[2][0] * s[4] + a[2][1] * s[2] - a[2][3] * s[0]) * inv_det,
        ],
        [
            (-a[1][0] * c[3] + a[1][1] * c[1] - a[1][2] * c[0]) * inv_det,
            (a[0][0] * c[3] - a[0][1] * c[1] + a[0][2] * c[0]) * inv_det,
            (-a[3][0] * s[3] + a[3][1] * s[1] - a[3][2] * s[0]) * inv_det,
            (a[2][0] * s[3] - a[2][1] * s[1] + a[2][2] * s[0]) * inv_det,
        ],
    ];

    let inverse = Mat4::from_cols_array_2d(&b);
    if !inverse.is_finite() {
        engine_bail!("galaxy3d::math", DegenerateMatrix,
            "Matrix inverse is not finite (determinant {})", det);
    }
    Ok(inverse)
}

/// Build a matrix from 16 column-major floats.
///
/// # Errors
///
/// `InvalidArgument` if the slice is not exactly 16 long or holds a
/// non-finite value.
pub fn matrix_from_slice(values: &[f32]) -> Result<Mat4> {
    if values.len() != 16 {
        engine_bail!("galaxy3d::math", InvalidArgument,
            "Expected 16 matrix elements (column-major 4x4), got {}", values.len());
    }
    if values.iter().any(|v| !v.is_finite()) {
        engine_bail!("galaxy3d::math", InvalidArgument,
            "Matrix contains non-finite elements");
    }
    Ok(Mat4::from_cols_slice(values))
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
