//! Linear algebra utilities
//!
//! Matrix helpers required by the filter recursion: the gain solve with its
//! conditioning check, covariance sanity checks, and Gaussian densities used
//! for innovation diagnostics.

use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

use crate::filter::FilterError;

/// Default threshold on the reciprocal condition estimate of `S`
pub const DEFAULT_SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Default tolerance used by symmetry checks
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Reciprocal 2-norm condition number `σ_min / σ_max`.
///
/// Taken from the singular values, so strongly correlated channels are
/// flagged even when every diagonal entry looks healthy. Returns 0.0 for an
/// empty, non-square, non-finite or exactly singular matrix.
pub fn reciprocal_condition(matrix: &DMatrix<f64>) -> f64 {
    if matrix.is_empty() || !matrix.is_square() || matrix.iter().any(|v| !v.is_finite()) {
        return 0.0;
    }
    let singular_values = matrix.clone().svd(false, false).singular_values;
    let max = singular_values.iter().fold(0.0_f64, |acc, &v| acc.max(v));
    let min = singular_values
        .iter()
        .fold(f64::INFINITY, |acc, &v| acc.min(v));
    if max <= 0.0 {
        return 0.0;
    }
    min / max
}

/// Compute the Kalman gain `K = P_pred Cᵀ S⁻¹` without forming `S⁻¹`.
///
/// Rejects `S` when its reciprocal condition number is not above zero or is
/// below `tolerance`, then solves `S Kᵀ = C P_pred` with a Cholesky
/// factorization, falling back to LU when `S` is not positive definite.
///
/// # Errors
/// `SingularMatrix` when `S` is too ill-conditioned or the solve fails;
/// `NumericalInstability` when `S` contains non-finite entries.
pub fn solve_kalman_gain(
    p_pred: &DMatrix<f64>,
    c: &DMatrix<f64>,
    s: &DMatrix<f64>,
    tolerance: f64,
) -> Result<DMatrix<f64>, FilterError> {
    if s.iter().any(|v| !v.is_finite()) {
        return Err(FilterError::NumericalInstability {
            description: "innovation covariance contains non-finite values".to_string(),
        });
    }

    let rcond = reciprocal_condition(s);
    if rcond <= 0.0 || rcond < tolerance {
        return Err(FilterError::SingularMatrix {
            context: "innovation covariance is singular or ill-conditioned".to_string(),
            rcond,
        });
    }

    let c_p = c * p_pred;
    if let Some(chol) = s.clone().cholesky() {
        return Ok(chol.solve(&c_p).transpose());
    }

    match s.clone().lu().solve(&c_p) {
        Some(k_t) => Ok(k_t.transpose()),
        None => Err(FilterError::SingularMatrix {
            context: "innovation covariance LU solve failed".to_string(),
            rcond,
        }),
    }
}

/// Compute Mahalanobis distance
///
/// Returns infinity when `sigma` is not positive definite.
pub fn mahalanobis_distance(x: &DVector<f64>, mu: &DVector<f64>, sigma: &DMatrix<f64>) -> f64 {
    let diff = x - mu;

    match sigma.clone().cholesky() {
        Some(chol) => {
            let inv_sigma_diff = chol.solve(&diff);
            diff.dot(&inv_sigma_diff).sqrt()
        }
        None => f64::INFINITY,
    }
}

/// Normalized innovation squared `ỹᵀ S⁻¹ ỹ`.
///
/// Falls back to LU when `S` is not positive definite; returns infinity when
/// `S` cannot be solved at all.
pub fn normalized_innovation_squared(residual: &DVector<f64>, s: &DMatrix<f64>) -> f64 {
    let solved = match s.clone().cholesky() {
        Some(chol) => Some(chol.solve(residual)),
        None => s.clone().lu().solve(residual),
    };
    solved.map_or(f64::INFINITY, |v| residual.dot(&v))
}

/// Compute log Gaussian PDF for numerical stability
///
/// The log-determinant is taken from the Cholesky factor rather than from
/// `determinant()`, which underflows for small covariances.
pub fn log_gaussian_pdf(x: &DVector<f64>, mu: &DVector<f64>, sigma: &DMatrix<f64>) -> f64 {
    let n = x.len() as f64;
    let diff = x - mu;

    match sigma.clone().cholesky() {
        Some(chol) => {
            let log_det = 2.0 * chol.l().diagonal().iter().map(|v| v.ln()).sum::<f64>();
            let inv_sigma_diff = chol.solve(&diff);
            let mahalanobis = diff.dot(&inv_sigma_diff);

            -0.5 * (n * (2.0 * PI).ln() + log_det + mahalanobis)
        }
        None => f64::NEG_INFINITY,
    }
}

/// Check symmetry within an absolute tolerance scaled by the matrix magnitude
pub fn is_symmetric(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    if !matrix.is_square() {
        return false;
    }
    let scale = matrix.amax().max(1.0);
    let n = matrix.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            if (matrix[(i, j)] - matrix[(j, i)]).abs() > tolerance * scale {
                return false;
            }
        }
    }
    true
}

/// Check that a matrix is symmetric positive semi-definite.
///
/// Eigenvalues down to `-tolerance * max|λ|` are accepted as zero.
pub fn is_positive_semi_definite(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    if !is_symmetric(matrix, tolerance) {
        return false;
    }
    if matrix.is_empty() {
        return true;
    }
    let eigenvalues = symmetrize(matrix).symmetric_eigen().eigenvalues;
    let largest = eigenvalues.amax().max(1.0);
    eigenvalues.iter().all(|&v| v >= -tolerance * largest)
}

/// Make matrix symmetric
///
/// Ensures a matrix is symmetric by averaging with its transpose
pub fn symmetrize(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    0.5 * (matrix + matrix.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_matches_explicit_inverse() {
        let p = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let c = DMatrix::from_row_slice(1, 2, &[1.0, 0.0]);
        let r = DMatrix::from_element(1, 1, 0.5);
        let s = &c * &p * c.transpose() + &r;

        let k = solve_kalman_gain(&p, &c, &s, DEFAULT_SINGULARITY_TOLERANCE).unwrap();
        let expected = &p * c.transpose() * s.clone().try_inverse().unwrap();

        assert_eq!(k.shape(), (2, 1));
        assert!((k - expected).amax() < 1e-12);
    }

    #[test]
    fn test_gain_rejects_singular_innovation() {
        let p = DMatrix::from_element(2, 2, 4.0);
        let c = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 0.0]);
        let s = &c * &p * c.transpose();

        let err = solve_kalman_gain(&p, &c, &s, DEFAULT_SINGULARITY_TOLERANCE).unwrap_err();
        assert!(matches!(err, FilterError::SingularMatrix { .. }));
    }

    #[test]
    fn test_gain_rejects_non_finite() {
        let p = DMatrix::identity(2, 2);
        let c = DMatrix::identity(2, 2);
        let mut s = DMatrix::identity(2, 2);
        s[(0, 0)] = f64::NAN;

        let err = solve_kalman_gain(&p, &c, &s, DEFAULT_SINGULARITY_TOLERANCE).unwrap_err();
        assert!(matches!(err, FilterError::NumericalInstability { .. }));
    }

    #[test]
    fn test_gain_lu_fallback_for_indefinite() {
        // Symmetric but indefinite: Cholesky fails, LU still solves
        let p = DMatrix::identity(2, 2);
        let c = DMatrix::identity(2, 2);
        let s = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);

        let k = solve_kalman_gain(&p, &c, &s, DEFAULT_SINGULARITY_TOLERANCE).unwrap();
        let expected = s.clone().try_inverse().unwrap();
        assert!((k - expected).amax() < 1e-12);
    }

    #[test]
    fn test_reciprocal_condition() {
        assert!((reciprocal_condition(&DMatrix::identity(3, 3)) - 1.0).abs() < 1e-15);
        let diag = DMatrix::from_diagonal(&DVector::from_vec(vec![1.0, 1e-4]));
        assert!((reciprocal_condition(&diag) - 1e-4).abs() < 1e-12);
        assert_eq!(reciprocal_condition(&DMatrix::zeros(2, 2)), 0.0);

        // Balanced diagonal, nearly collinear rows
        let correlated = DMatrix::from_row_slice(2, 2, &[1.0, 0.999_999, 0.999_999, 1.0]);
        let expected = 1e-6 / (2.0 - 1e-6);
        assert!((reciprocal_condition(&correlated) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_gain_rejects_correlated_innovation_with_balanced_cholesky() {
        // L = [[1, 0], [1e4, 1]]: equal-magnitude diagonal, true rcond ~1e-16
        let s = DMatrix::from_row_slice(2, 2, &[1.0, 1e4, 1e4, 1e8 + 1.0]);
        let p = DMatrix::zeros(2, 2);
        let c = DMatrix::identity(2, 2);

        assert!(reciprocal_condition(&s) < 1e-12);
        let err = solve_kalman_gain(&p, &c, &s, 1e-6).unwrap_err();
        assert!(matches!(err, FilterError::SingularMatrix { rcond, .. } if rcond < 1e-6));
    }

    #[test]
    fn test_symmetry_and_psd_checks() {
        let sym = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        assert!(is_symmetric(&sym, SYMMETRY_TOLERANCE));
        assert!(is_positive_semi_definite(&sym, SYMMETRY_TOLERANCE));

        let asym = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 0.0, 2.0]);
        assert!(!is_symmetric(&asym, SYMMETRY_TOLERANCE));

        let indefinite = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(!is_positive_semi_definite(&indefinite, SYMMETRY_TOLERANCE));

        // Rank-deficient but PSD
        let rank_one = DMatrix::from_element(2, 2, 0.1);
        assert!(is_positive_semi_definite(&rank_one, SYMMETRY_TOLERANCE));

        let fixed = symmetrize(&asym);
        assert!(is_symmetric(&fixed, SYMMETRY_TOLERANCE));
        assert_eq!(fixed[(0, 1)], 0.5);
    }

    #[test]
    fn test_log_gaussian_pdf_standard_normal() {
        let x = DVector::from_vec(vec![0.0]);
        let mu = DVector::from_vec(vec![0.0]);
        let sigma = DMatrix::identity(1, 1);
        let expected = -0.5 * (2.0 * PI).ln();
        assert!((log_gaussian_pdf(&x, &mu, &sigma) - expected).abs() < 1e-12);

        let x = DVector::from_vec(vec![3.0, 4.0]);
        let mu = DVector::zeros(2);
        assert!((mahalanobis_distance(&x, &mu, &DMatrix::identity(2, 2)) - 5.0).abs() < 1e-12);
    }
}
