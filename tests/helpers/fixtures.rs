//! Filter setup shared between test files

use nalgebra::{DMatrix, DVector};

use linear_kalman_rs::common::model::{constant_velocity_1d, sample_initial_state, sample_tracking_config};
use linear_kalman_rs::{KalmanConfig, KalmanFilter};

/// Sample scenario filter, initialized at t = 0 from the first measurement
pub fn sample_filter() -> KalmanFilter {
    let mut filter = KalmanFilter::new(sample_tracking_config()).expect("sample config is valid");
    filter
        .init(0.0, sample_initial_state())
        .expect("sample initial state has 4 entries");
    filter
}

/// 1D constant velocity model with moderate noise and a wide prior
pub fn cv_1d_config() -> KalmanConfig {
    constant_velocity_1d(0.1, 0.5, 0.3).with_initial_covariance(DMatrix::identity(2, 2) * 100.0)
}

/// 1D constant velocity model with negligible noise
pub fn near_noiseless_config() -> KalmanConfig {
    let dt = 0.1;
    KalmanConfig::new(
        dt,
        DMatrix::from_row_slice(2, 2, &[1.0, dt, 0.0, 1.0]),
        DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
        DMatrix::identity(2, 2) * 1e-10,
        DMatrix::from_element(1, 1, 1e-8),
    )
    .with_initial_covariance(DMatrix::identity(2, 2) * 100.0)
}

/// Wrap scalars as one-channel measurements
pub fn scalar_measurements(values: &[f64]) -> Vec<DVector<f64>> {
    values.iter().map(|&v| DVector::from_vec(vec![v])).collect()
}
