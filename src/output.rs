//! Output types for filter state estimates and trajectories.
//!
//! After each accepted measurement the filter's belief is snapshotted into a
//! [`StateEstimate`]. Runs over a measurement sequence collect these into a
//! [`Trajectory`] and report skipped steps in a [`FilterOutput`].
//!
//! These are caller-facing records; they can be serialized for plotting or
//! storage, the filter itself never is.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// Estimated state at one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateEstimate {
    /// Step index (0-based, one per measurement).
    pub step: usize,
    /// Elapsed filter time after this step.
    pub time: f64,
    /// Estimated state vector (e.g., [x, y, vx, vy]).
    pub mean: DVector<f64>,
    /// Uncertainty in the state estimate.
    pub covariance: DMatrix<f64>,
}

impl StateEstimate {
    /// Create a new state estimate
    pub fn new(step: usize, time: f64, mean: DVector<f64>, covariance: DMatrix<f64>) -> Self {
        Self {
            step,
            time,
            mean,
            covariance,
        }
    }

    /// Get state dimension
    #[inline]
    pub fn x_dim(&self) -> usize {
        self.mean.len()
    }

    /// Trace of the covariance, a scalar summary of total uncertainty
    #[inline]
    pub fn uncertainty(&self) -> f64 {
        self.covariance.trace()
    }
}

/// Ordered sequence of state estimates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trajectory {
    estimates: Vec<StateEstimate>,
}

impl Trajectory {
    /// Create a new trajectory
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an estimate
    pub fn push(&mut self, estimate: StateEstimate) {
        self.estimates.push(estimate);
    }

    /// Length of the trajectory
    #[inline]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    /// Check if trajectory is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// Get estimate at index
    pub fn get(&self, index: usize) -> Option<&StateEstimate> {
        self.estimates.get(index)
    }

    /// Last estimate
    pub fn last(&self) -> Option<&StateEstimate> {
        self.estimates.last()
    }

    /// All estimates in order
    pub fn estimates(&self) -> &[StateEstimate] {
        &self.estimates
    }

    /// State vectors in order
    pub fn states(&self) -> impl Iterator<Item = &DVector<f64>> {
        self.estimates.iter().map(|e| &e.mean)
    }

    /// Selected state component over time (e.g. index 0 for x position)
    ///
    /// Returns `None` if any estimate has no component at `index`.
    pub fn component(&self, index: usize) -> Option<Vec<f64>> {
        self.estimates
            .iter()
            .map(|e| e.mean.get(index).copied())
            .collect()
    }
}

/// Complete output from running a filter over a measurement sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOutput {
    /// Estimate after every step (accepted or skipped).
    pub trajectory: Trajectory,
    /// Steps whose measurement was rejected and replaced by a prediction.
    pub skipped_steps: Vec<usize>,
}

impl FilterOutput {
    /// Create an empty filter output
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of steps
    #[inline]
    pub fn num_steps(&self) -> usize {
        self.trajectory.len()
    }

    /// Number of accepted measurements
    #[inline]
    pub fn num_accepted(&self) -> usize {
        self.trajectory.len() - self.skipped_steps.len()
    }

    /// Serialize to pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
