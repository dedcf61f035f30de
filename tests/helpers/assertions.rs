//! Generic assertion functions for numerical comparisons with tolerance

use nalgebra::{DMatrix, DVector};

/// Compare scalar values with tolerance
pub fn assert_scalar_close(actual: f64, expected: f64, tolerance: f64, field_name: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {}, got {} (diff: {}, tolerance: {})",
        field_name,
        expected,
        actual,
        diff,
        tolerance
    );
}

/// Compare DVector with tolerance
pub fn assert_dvector_close(
    actual: &DVector<f64>,
    expected: &DVector<f64>,
    tolerance: f64,
    field_name: &str,
) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: dimension mismatch (actual: {}, expected: {})",
        field_name,
        actual.len(),
        expected.len()
    );

    for i in 0..actual.len() {
        let diff = (actual[i] - expected[i]).abs();
        assert!(
            diff <= tolerance,
            "{}[{}]: expected {}, got {} (diff: {}, tolerance: {})",
            field_name,
            i,
            expected[i],
            actual[i],
            diff,
            tolerance
        );
    }
}

/// Compare DMatrix with tolerance
pub fn assert_dmatrix_close(
    actual: &DMatrix<f64>,
    expected: &DMatrix<f64>,
    tolerance: f64,
    field_name: &str,
) {
    assert_eq!(
        actual.shape(),
        expected.shape(),
        "{}: shape mismatch (actual: {:?}, expected: {:?})",
        field_name,
        actual.shape(),
        expected.shape()
    );

    for i in 0..actual.nrows() {
        for j in 0..actual.ncols() {
            let diff = (actual[(i, j)] - expected[(i, j)]).abs();
            assert!(
                diff <= tolerance,
                "{}[{},{}]: expected {}, got {} (diff: {}, tolerance: {})",
                field_name,
                i,
                j,
                expected[(i, j)],
                actual[(i, j)],
                diff,
                tolerance
            );
        }
    }
}

/// Assert a matrix equals its transpose within a relative tolerance
pub fn assert_symmetric(matrix: &DMatrix<f64>, tolerance: f64, field_name: &str) {
    let scale = matrix.amax().max(1.0);
    assert_dmatrix_close(matrix, &matrix.transpose(), tolerance * scale, field_name);
}
