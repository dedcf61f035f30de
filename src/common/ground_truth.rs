//! Ground truth and measurement generation
//!
//! Simulates a linear system described by a [`KalmanConfig`] to produce true
//! state sequences and the noisy measurements a sensor would report. Used by
//! tests and benchmarks.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::config::KalmanConfig;

/// Simulated trajectory and measurements
///
/// Entry `k` of every vector refers to the same step: the state reached after
/// `k + 1` transitions from `x0`, the measurement of that state, and its time.
#[derive(Debug, Clone)]
pub struct GroundTruth {
    /// True states
    pub states: Vec<DVector<f64>>,
    /// Measurements of the true states
    pub measurements: Vec<DVector<f64>>,
    /// Elapsed time at each step
    pub times: Vec<f64>,
}

impl GroundTruth {
    /// Number of simulated steps
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if no steps were simulated
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Square-root factor `L` with `L Lᵀ = cov`.
///
/// Cholesky when the covariance is positive definite, otherwise an
/// eigendecomposition with negative eigenvalues clamped to zero, so
/// rank-deficient and all-zero covariances are supported.
fn noise_factor(cov: &DMatrix<f64>) -> DMatrix<f64> {
    if let Some(chol) = cov.clone().cholesky() {
        return chol.l();
    }
    let eigen = cov.clone().symmetric_eigen();
    let sqrt_values = eigen.eigenvalues.map(|v| v.max(0.0).sqrt());
    &eigen.eigenvectors * DMatrix::from_diagonal(&sqrt_values)
}

fn sample_noise(factor: &DMatrix<f64>, rng: &mut StdRng) -> DVector<f64> {
    let z: DVector<f64> = DVector::from_fn(factor.ncols(), |_, _| StandardNormal.sample(&mut *rng));
    factor * z
}

/// Generate a trajectory with process and measurement noise
///
/// `x_{k+1} = A x_k + w_k`, `y_k = C x_k + v_k` with `w ~ N(0, Q)` and
/// `v ~ N(0, R)`. The same seed always produces the same output.
pub fn simulate(config: &KalmanConfig, x0: &DVector<f64>, steps: usize, seed: u64) -> GroundTruth {
    let mut rng = StdRng::seed_from_u64(seed);
    let process_factor = noise_factor(&config.process_noise);
    let measurement_factor = noise_factor(&config.measurement_noise);

    let mut states = Vec::with_capacity(steps);
    let mut measurements = Vec::with_capacity(steps);
    let mut times = Vec::with_capacity(steps);

    let mut x = x0.clone();
    for k in 0..steps {
        x = &config.transition_matrix * &x + sample_noise(&process_factor, &mut rng);
        let y = &config.observation_matrix * &x + sample_noise(&measurement_factor, &mut rng);
        states.push(x.clone());
        measurements.push(y);
        times.push((k + 1) as f64 * config.dt);
    }

    GroundTruth {
        states,
        measurements,
        times,
    }
}

/// Generate an exact trajectory: `x_{k+1} = A x_k`, `y_k = C x_k`
pub fn noiseless(config: &KalmanConfig, x0: &DVector<f64>, steps: usize) -> GroundTruth {
    let mut states = Vec::with_capacity(steps);
    let mut measurements = Vec::with_capacity(steps);
    let mut times = Vec::with_capacity(steps);

    let mut x = x0.clone();
    for k in 0..steps {
        x = &config.transition_matrix * &x;
        measurements.push(&config.observation_matrix * &x);
        states.push(x.clone());
        times.push((k + 1) as f64 * config.dt);
    }

    GroundTruth {
        states,
        measurements,
        times,
    }
}
