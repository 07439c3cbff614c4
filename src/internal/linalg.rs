//! Dense linear algebra pieces of the Kalman correction step.

use nalgebra::{DMatrix, DVector};

/// Innovation covariance `S = H·P·Hᵗ + R`.
pub fn innovation_covariance(h: &DMatrix<f64>, p: &DMatrix<f64>, r: &DMatrix<f64>) -> DMatrix<f64> {
    h * p * h.transpose() + r
}

/// Reciprocal condition number below which an innovation covariance is treated as singular.
pub const SINGULAR_RCOND: f64 = 1e-12;

/// Whether `s` is singular or too ill-conditioned to invert.
///
/// Compares the smallest singular value against the largest, so rank-deficient
/// matrices are caught even when rounding leaves a tiny non-zero determinant.
/// Matrices with NaN or infinite entries count as singular.
pub fn is_singular(s: &DMatrix<f64>) -> bool {
    if s.is_empty() {
        return false;
    }
    if !s.iter().all(|v| v.is_finite()) {
        return true;
    }
    let sv = s.singular_values();
    !(sv.min() > sv.max() * SINGULAR_RCOND)
}

/// Kalman gain `K = P·Hᵗ·S⁻¹`.
///
/// Returns `None` when `S` is singular (see [`is_singular`]).
pub fn kalman_gain(p: &DMatrix<f64>, h: &DMatrix<f64>, s: DMatrix<f64>) -> Option<DMatrix<f64>> {
    if is_singular(&s) {
        return None;
    }
    let si = s.try_inverse()?;
    Some(p * h.transpose() * si)
}

/// Innovation `y = z - H·x`.
pub fn innovation(z: &DVector<f64>, h: &DMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    z - h * x
}

/// Largest absolute difference between `m` and its transpose.
pub fn asymmetry(m: &DMatrix<f64>) -> f64 {
    (m - m.transpose()).amax()
}
