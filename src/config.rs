//! Configuration record for the filter
//!
//! [`KalmanConfig`] gathers everything fixed for a filter's lifetime: the
//! time step, the system matrices, an optional initial covariance and the
//! numerical options. It is plain data, validated once when a filter is
//! constructed, and can be loaded from JSON by callers.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::common::linalg::DEFAULT_SINGULARITY_TOLERANCE;
use crate::filter::FilterError;

/// Form of the covariance correction applied after the gain is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovarianceUpdate {
    /// `P = (I - K C) P_pred`
    #[default]
    Standard,
    /// `P = (I - K C) P_pred (I - K C)ᵀ + K R Kᵀ`, symmetrized
    Joseph,
}

fn default_singularity_tolerance() -> f64 {
    DEFAULT_SINGULARITY_TOLERANCE
}

/// Linear time-invariant filter configuration
///
/// Dimensions: `A` and `Q` are n×n, `C` is m×n, `R` is m×m and `P0`, when
/// given, is n×n.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KalmanConfig {
    /// Time step between consecutive measurements
    pub dt: f64,
    /// System dynamics matrix (A)
    pub transition_matrix: DMatrix<f64>,
    /// Observation matrix (C)
    pub observation_matrix: DMatrix<f64>,
    /// Process noise covariance (Q)
    pub process_noise: DMatrix<f64>,
    /// Measurement noise covariance (R)
    pub measurement_noise: DMatrix<f64>,
    /// Initial estimate covariance (P0); identity when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_covariance: Option<DMatrix<f64>>,
    /// Minimum reciprocal condition number accepted for the innovation covariance
    #[serde(default = "default_singularity_tolerance")]
    pub singularity_tolerance: f64,
    /// Covariance correction form
    #[serde(default)]
    pub covariance_update: CovarianceUpdate,
}

impl KalmanConfig {
    /// Create a configuration with default numerical options and no P0
    pub fn new(
        dt: f64,
        transition_matrix: DMatrix<f64>,
        observation_matrix: DMatrix<f64>,
        process_noise: DMatrix<f64>,
        measurement_noise: DMatrix<f64>,
    ) -> Self {
        Self {
            dt,
            transition_matrix,
            observation_matrix,
            process_noise,
            measurement_noise,
            initial_covariance: None,
            singularity_tolerance: DEFAULT_SINGULARITY_TOLERANCE,
            covariance_update: CovarianceUpdate::Standard,
        }
    }

    /// Set the initial covariance used by `init`
    pub fn with_initial_covariance(mut self, p0: DMatrix<f64>) -> Self {
        self.initial_covariance = Some(p0);
        self
    }

    /// Set the conditioning threshold for the innovation covariance solve
    pub fn with_singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.singularity_tolerance = tolerance;
        self
    }

    /// Select the covariance correction form
    pub fn with_covariance_update(mut self, form: CovarianceUpdate) -> Self {
        self.covariance_update = form;
        self
    }

    /// State dimension (n)
    #[inline]
    pub fn x_dim(&self) -> usize {
        self.observation_matrix.ncols()
    }

    /// Measurement dimension (m)
    #[inline]
    pub fn z_dim(&self) -> usize {
        self.observation_matrix.nrows()
    }

    /// Covariance `init` seeds the filter with
    pub fn initial_covariance_or_identity(&self) -> DMatrix<f64> {
        self.initial_covariance
            .clone()
            .unwrap_or_else(|| DMatrix::identity(self.x_dim(), self.x_dim()))
    }

    /// Check that all dimensions and options are mutually consistent.
    ///
    /// Symmetry and positive semi-definiteness of Q, R and P0 are not
    /// checked here; see [`crate::common::linalg::is_positive_semi_definite`].
    pub fn validate(&self) -> Result<(), FilterError> {
        let (m, n) = self.observation_matrix.shape();
        if m == 0 || n == 0 {
            return Err(FilterError::configuration(format!(
                "observation matrix C must be non-empty, got {}x{}",
                m, n
            )));
        }

        let (a_rows, a_cols) = self.transition_matrix.shape();
        if a_rows != a_cols {
            return Err(FilterError::configuration(format!(
                "transition matrix A must be square, got {}x{}",
                a_rows, a_cols
            )));
        }
        if a_rows != n {
            return Err(FilterError::configuration(format!(
                "C has {} columns but A is {}x{}",
                n, a_rows, a_cols
            )));
        }

        if self.process_noise.shape() != (n, n) {
            let (q_rows, q_cols) = self.process_noise.shape();
            return Err(FilterError::configuration(format!(
                "process noise Q must be {}x{}, got {}x{}",
                n, n, q_rows, q_cols
            )));
        }

        if self.measurement_noise.shape() != (m, m) {
            let (r_rows, r_cols) = self.measurement_noise.shape();
            return Err(FilterError::configuration(format!(
                "measurement noise R must be {}x{}, got {}x{}",
                m, m, r_rows, r_cols
            )));
        }

        if let Some(p0) = &self.initial_covariance {
            if p0.shape() != (n, n) {
                let (p_rows, p_cols) = p0.shape();
                return Err(FilterError::configuration(format!(
                    "initial covariance P0 must be {}x{}, got {}x{}",
                    n, n, p_rows, p_cols
                )));
            }
        }

        if !self.dt.is_finite() {
            return Err(FilterError::configuration(format!(
                "time step must be finite, got {}",
                self.dt
            )));
        }

        if !self.singularity_tolerance.is_finite() || self.singularity_tolerance < 0.0 {
            return Err(FilterError::configuration(format!(
                "singularity tolerance must be finite and non-negative, got {}",
                self.singularity_tolerance
            )));
        }

        Ok(())
    }

    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let config: KalmanConfig = serde_json::from_str(json)
            .map_err(|e| FilterError::configuration(format!("invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Serialize to pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
