//! Discrete-time linear Kalman filter
//!
//! [`KalmanFilter`] owns a validated [`KalmanConfig`] and, once initialized,
//! a belief made of the state mean `x`, its covariance `P` and the elapsed
//! time `t`. Each [`KalmanFilter::update`] runs the full recursion:
//!
//! ```text
//! x_pred = A x                  P_pred = A P Aᵀ + Q
//! ỹ      = y - C x_pred         S      = C P_pred Cᵀ + R
//! K      = P_pred Cᵀ S⁻¹        (solved, never inverted)
//! x      = x_pred + K ỹ         P      = (I - K C) P_pred
//! t      = t + dt
//! ```
//!
//! Updates are all-or-nothing: when any step fails the belief keeps its
//! previous value.

use nalgebra::{DMatrix, DVector};

use crate::common::linalg::{
    log_gaussian_pdf, normalized_innovation_squared, solve_kalman_gain, symmetrize,
};
use crate::config::{CovarianceUpdate, KalmanConfig};

use super::errors::FilterError;
use super::traits::Filter;

/// Current estimate: state mean, covariance and elapsed time
#[derive(Debug, Clone)]
struct Belief {
    mean: DVector<f64>,
    covariance: DMatrix<f64>,
    time: f64,
}

/// Diagnostics from the most recent successful update
#[derive(Debug, Clone, PartialEq)]
pub struct Innovation {
    /// Measurement residual `ỹ = y - C x_pred`
    pub residual: DVector<f64>,
    /// Innovation covariance `S`
    pub covariance: DMatrix<f64>,
    /// Kalman gain `K` applied to the residual
    pub gain: DMatrix<f64>,
    /// Normalized innovation squared `ỹᵀ S⁻¹ ỹ`
    pub nis: f64,
    /// Log-density of `ỹ` under `N(0, S)`
    pub log_likelihood: f64,
}

/// Linear time-invariant Kalman filter
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    config: KalmanConfig,
    identity: DMatrix<f64>,
    belief: Option<Belief>,
    innovation: Option<Innovation>,
}

fn all_finite<'a>(mut values: impl Iterator<Item = &'a f64>) -> bool {
    values.all(|v| v.is_finite())
}

impl KalmanFilter {
    /// Create an uninitialized filter from a configuration record
    ///
    /// # Errors
    /// `Configuration` when the matrix dimensions are inconsistent.
    pub fn new(config: KalmanConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let n = config.x_dim();
        Ok(Self {
            config,
            identity: DMatrix::identity(n, n),
            belief: None,
            innovation: None,
        })
    }

    /// Create a filter from individual matrices
    pub fn from_matrices(
        dt: f64,
        a: DMatrix<f64>,
        c: DMatrix<f64>,
        q: DMatrix<f64>,
        r: DMatrix<f64>,
        p0: Option<DMatrix<f64>>,
    ) -> Result<Self, FilterError> {
        let mut config = KalmanConfig::new(dt, a, c, q, r);
        config.initial_covariance = p0;
        Self::new(config)
    }

    /// Start (or restart) estimation at time `t0` from state `x0`.
    ///
    /// The covariance is reset to the configured `P0`, identity when none was
    /// configured. Any previous history is discarded.
    pub fn init(&mut self, t0: f64, x0: DVector<f64>) -> Result<(), FilterError> {
        let p0 = self.config.initial_covariance_or_identity();
        self.init_with_covariance(t0, x0, p0)
    }

    /// Start estimation with a caller-supplied covariance for this session
    pub fn init_with_covariance(
        &mut self,
        t0: f64,
        x0: DVector<f64>,
        p0: DMatrix<f64>,
    ) -> Result<(), FilterError> {
        let n = self.x_dim();
        if x0.len() != n {
            return Err(FilterError::dimension(n, x0.len(), "initial state"));
        }
        if p0.shape() != (n, n) {
            return Err(FilterError::dimension(
                n * n,
                p0.nrows() * p0.ncols(),
                "initial covariance",
            ));
        }

        log::trace!("init: t0={}, x0={:?}", t0, x0.as_slice());
        self.belief = Some(Belief {
            mean: x0,
            covariance: p0,
            time: t0,
        });
        self.innovation = None;
        Ok(())
    }

    /// Start at `t = 0` with a zero state and the configured covariance
    pub fn init_default(&mut self) {
        self.belief = Some(Belief {
            mean: DVector::zeros(self.x_dim()),
            covariance: self.config.initial_covariance_or_identity(),
            time: 0.0,
        });
        self.innovation = None;
    }

    /// Return to the uninitialized state
    pub fn reset(&mut self) {
        self.belief = None;
        self.innovation = None;
    }

    fn belief(&self, operation: &'static str) -> Result<&Belief, FilterError> {
        self.belief
            .as_ref()
            .ok_or(FilterError::NotInitialized { operation })
    }

    /// `x_pred = A x`, `P_pred = A P Aᵀ + Q`
    fn propagate(&self, belief: &Belief) -> (DVector<f64>, DMatrix<f64>) {
        let a = &self.config.transition_matrix;
        let mean = a * &belief.mean;
        let covariance = a * &belief.covariance * a.transpose() + &self.config.process_noise;
        (mean, covariance)
    }

    /// Advance the belief one time step without a measurement.
    ///
    /// Also advances `t` by `dt`.
    pub fn predict(&mut self) -> Result<&DVector<f64>, FilterError> {
        let belief = self.belief("predict")?;
        let (mean, covariance) = self.propagate(belief);
        if !all_finite(mean.iter()) || !all_finite(covariance.iter()) {
            log::warn!("predict produced non-finite values, belief unchanged");
            return Err(FilterError::NumericalInstability {
                description: "prediction produced non-finite values".to_string(),
            });
        }
        let time = belief.time + self.config.dt;

        log::trace!("predict: t={}, x={:?}", time, mean.as_slice());
        let belief = self.belief.insert(Belief {
            mean,
            covariance,
            time,
        });
        Ok(&belief.mean)
    }

    /// Fold one measurement into the belief and return the new state.
    ///
    /// # Errors
    /// - `NotInitialized` before [`KalmanFilter::init`]
    /// - `DimensionMismatch` when `measurement.len() != m`
    /// - `SingularMatrix` when the innovation covariance is singular or its
    ///   reciprocal condition number is below the configured tolerance
    /// - `NumericalInstability` when the result is not finite
    ///
    /// The belief is untouched on every error.
    pub fn update(&mut self, measurement: &DVector<f64>) -> Result<&DVector<f64>, FilterError> {
        let belief = self.belief("update")?;
        let m = self.z_dim();
        if measurement.len() != m {
            return Err(FilterError::dimension(m, measurement.len(), "measurement"));
        }

        let c = &self.config.observation_matrix;
        let r = &self.config.measurement_noise;

        let (x_pred, p_pred) = self.propagate(belief);
        let residual = measurement - c * &x_pred;
        let s = c * &p_pred * c.transpose() + r;

        let gain = solve_kalman_gain(&p_pred, c, &s, self.config.singularity_tolerance)
            .map_err(|e| {
                log::warn!("update rejected at t={}: {}", belief.time, e);
                e
            })?;

        let mean = &x_pred + &gain * &residual;
        let i_kc = &self.identity - &gain * c;
        let covariance = match self.config.covariance_update {
            CovarianceUpdate::Standard => &i_kc * &p_pred,
            CovarianceUpdate::Joseph => symmetrize(
                &(&i_kc * &p_pred * i_kc.transpose() + &gain * r * gain.transpose()),
            ),
        };

        if !all_finite(mean.iter()) || !all_finite(covariance.iter()) {
            log::warn!(
                "update at t={} produced non-finite values, belief unchanged",
                belief.time
            );
            return Err(FilterError::NumericalInstability {
                description: "update produced non-finite state or covariance".to_string(),
            });
        }

        let time = belief.time + self.config.dt;
        let nis = normalized_innovation_squared(&residual, &s);
        let log_likelihood = log_gaussian_pdf(&residual, &DVector::zeros(m), &s);

        log::trace!(
            "update: t={}, nis={:.4}, x={:?}",
            time,
            nis,
            mean.as_slice()
        );

        self.innovation = Some(Innovation {
            residual,
            covariance: s,
            gain,
            nis,
            log_likelihood,
        });
        let belief = self.belief.insert(Belief {
            mean,
            covariance,
            time,
        });
        Ok(&belief.mean)
    }

    /// Current state estimate
    pub fn state(&self) -> Result<&DVector<f64>, FilterError> {
        self.belief("state").map(|b| &b.mean)
    }

    /// Current estimate covariance
    pub fn covariance(&self) -> Result<&DMatrix<f64>, FilterError> {
        self.belief("covariance").map(|b| &b.covariance)
    }

    /// Elapsed time
    pub fn time(&self) -> Result<f64, FilterError> {
        self.belief("time").map(|b| b.time)
    }

    /// Diagnostics of the last successful update since `init`
    pub fn innovation(&self) -> Option<&Innovation> {
        self.innovation.as_ref()
    }

    /// Kalman gain used by the last successful update
    pub fn gain(&self) -> Option<&DMatrix<f64>> {
        self.innovation.as_ref().map(|i| &i.gain)
    }

    /// Whether `init` has been called
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.belief.is_some()
    }

    /// The configuration this filter was built from
    pub fn config(&self) -> &KalmanConfig {
        &self.config
    }

    /// Time step
    #[inline]
    pub fn dt(&self) -> f64 {
        self.config.dt
    }

    /// State dimension (n)
    #[inline]
    pub fn x_dim(&self) -> usize {
        self.config.x_dim()
    }

    /// Measurement dimension (m)
    #[inline]
    pub fn z_dim(&self) -> usize {
        self.config.z_dim()
    }
}

impl Filter for KalmanFilter {
    fn init(&mut self, t0: f64, x0: DVector<f64>) -> Result<(), FilterError> {
        KalmanFilter::init(self, t0, x0)
    }

    fn predict(&mut self) -> Result<&DVector<f64>, FilterError> {
        KalmanFilter::predict(self)
    }

    fn update(&mut self, measurement: &DVector<f64>) -> Result<&DVector<f64>, FilterError> {
        KalmanFilter::update(self, measurement)
    }

    fn state(&self) -> Result<&DVector<f64>, FilterError> {
        KalmanFilter::state(self)
    }

    fn covariance(&self) -> Result<&DMatrix<f64>, FilterError> {
        KalmanFilter::covariance(self)
    }

    fn time(&self) -> Result<f64, FilterError> {
        KalmanFilter::time(self)
    }

    fn innovation(&self) -> Option<&Innovation> {
        KalmanFilter::innovation(self)
    }

    fn reset(&mut self) {
        KalmanFilter::reset(self)
    }

    fn x_dim(&self) -> usize {
        KalmanFilter::x_dim(self)
    }

    fn z_dim(&self) -> usize {
        KalmanFilter::z_dim(self)
    }
}
