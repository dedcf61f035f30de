//! Ready-made filter configurations
//!
//! Constant-velocity trackers and the sample planar tracking scenario used
//! by tests and benchmarks.

use nalgebra::{DMatrix, DVector};

use crate::config::KalmanConfig;

/// Constant velocity model in 1D
/// State: [x, vx], measures [x]
///
/// Process noise from continuous white noise acceleration with intensity
/// `process_noise_std²`.
pub fn constant_velocity_1d(dt: f64, process_noise_std: f64, measurement_noise_std: f64) -> KalmanConfig {
    #[rustfmt::skip]
    let a = DMatrix::from_row_slice(2, 2, &[
        1.0, dt,
        0.0, 1.0,
    ]);
    let c = DMatrix::from_row_slice(1, 2, &[1.0, 0.0]);

    let q = process_noise_std * process_noise_std;
    let dt2 = dt * dt;
    let dt3 = dt2 * dt;
    #[rustfmt::skip]
    let process_noise = DMatrix::from_row_slice(2, 2, &[
        q * dt3 / 3.0, q * dt2 / 2.0,
        q * dt2 / 2.0, q * dt,
    ]);
    let r = DMatrix::from_element(1, 1, measurement_noise_std * measurement_noise_std);

    KalmanConfig::new(dt, a, c, process_noise, r)
}

/// Constant velocity model in 2D
/// State: [x, y, vx, vy], measures [x, y]
///
/// Transition matrix A = [I, dt*I; 0, I] where I is 2x2 identity
/// Process noise Q = q * [(dt³/3)*I, (dt²/2)*I; (dt²/2)*I, dt*I]
pub fn constant_velocity_2d(dt: f64, process_noise_std: f64, measurement_noise_std: f64) -> KalmanConfig {
    #[rustfmt::skip]
    let a = DMatrix::from_row_slice(4, 4, &[
        1.0, 0.0, dt,  0.0,   // x' = x + dt*vx
        0.0, 1.0, 0.0, dt,    // y' = y + dt*vy
        0.0, 0.0, 1.0, 0.0,   // vx' = vx
        0.0, 0.0, 0.0, 1.0,   // vy' = vy
    ]);

    #[rustfmt::skip]
    let c = DMatrix::from_row_slice(2, 4, &[
        1.0, 0.0, 0.0, 0.0,   // z[0] = x
        0.0, 1.0, 0.0, 0.0,   // z[1] = y
    ]);

    let q = process_noise_std * process_noise_std;
    let dt2 = dt * dt;
    let dt3 = dt2 * dt;
    #[rustfmt::skip]
    let process_noise = DMatrix::from_row_slice(4, 4, &[
        q * dt3 / 3.0,  0.0,            q * dt2 / 2.0,  0.0,
        0.0,            q * dt3 / 3.0,  0.0,            q * dt2 / 2.0,
        q * dt2 / 2.0,  0.0,            q * dt,         0.0,
        0.0,            q * dt2 / 2.0,  0.0,            q * dt,
    ]);

    let r_var = measurement_noise_std * measurement_noise_std;
    let r = DMatrix::from_diagonal(&DVector::from_vec(vec![r_var, r_var]));

    KalmanConfig::new(dt, a, c, process_noise, r)
}

/// Time step of the sample scenario (30 Hz)
pub const SAMPLE_DT: f64 = 1.0 / 30.0;

/// Twenty `[x, y]` position measurements of the sample scenario
pub const SAMPLE_MEASUREMENTS: [[f64; 2]; 20] = [
    [1.0420271, 1.97125435],
    [1.1072679, 1.90713242],
    [1.29135111, 1.77047746],
    [1.48485251, 1.59290453],
    [1.72825901, 2.03651545],
    [1.7421649, 1.81403957],
    [2.1167204, 2.95436506],
    [2.14529225, 2.83082132],
    [2.16029641, 2.86511146],
    [2.21269371, 2.80456971],
    [2.5770935, 2.76326424],
    [2.66822157, 2.78468231],
    [2.51641839, 3.23616546],
    [2.76034057, 3.49974578],
    [2.88131781, 2.93471433],
    [2.88373787, 2.99267245],
    [2.94484687, 3.06242828],
    [2.828666, 2.96649138],
    [3.00066019, 3.39960905],
    [3.12920592, 3.73870541],
];

/// Sample planar tracking scenario
///
/// Two position channels, each integrating its own velocity. Q and R are
/// fully correlated across entries; P0 leaves velocities almost unknown.
pub fn sample_tracking_config() -> KalmanConfig {
    let dt = SAMPLE_DT;

    #[rustfmt::skip]
    let a = DMatrix::from_row_slice(4, 4, &[
        1.0, 0.0, dt,  0.0,
        0.0, 1.0, 0.0, dt,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    #[rustfmt::skip]
    let c = DMatrix::from_row_slice(2, 4, &[
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
    ]);

    let mut q = DMatrix::from_element(4, 4, 0.05);
    q[(3, 3)] = 0.5;

    let r = DMatrix::from_element(2, 2, 0.1);

    #[rustfmt::skip]
    let p0 = DMatrix::from_row_slice(4, 4, &[
        0.1, 0.1, 0.1,     0.1,
        0.1, 0.1, 0.1,     0.1,
        0.1, 0.1, 10000.0, 100.0,
        0.1, 0.1, 100.0,   10000.0,
    ]);

    KalmanConfig::new(dt, a, c, q, r).with_initial_covariance(p0)
}

/// Sample measurements as filter-ready vectors
pub fn sample_measurements() -> Vec<DVector<f64>> {
    SAMPLE_MEASUREMENTS
        .iter()
        .map(|m| DVector::from_column_slice(m))
        .collect()
}

/// Initial state for the sample scenario: first measurement, zero velocity
pub fn sample_initial_state() -> DVector<f64> {
    let [x, y] = SAMPLE_MEASUREMENTS[0];
    DVector::from_vec(vec![x, y, 0.0, 0.0])
}
