//! Core traits for filters
//!
//! Callers such as [`crate::runner`] are written against [`Filter`] rather
//! than a concrete filter type.

use nalgebra::{DMatrix, DVector};

use super::errors::FilterError;
use super::kalman::Innovation;

/// Recursive state estimator with an init / predict / update cycle
///
/// Mutating methods take `&mut self`, so a single instance always has a
/// single writer. Independent streams should each own their own filter.
pub trait Filter {
    /// Start (or restart) estimation at `t0` from state `x0`
    fn init(&mut self, t0: f64, x0: DVector<f64>) -> Result<(), FilterError>;

    /// Advance one time step without a measurement
    fn predict(&mut self) -> Result<&DVector<f64>, FilterError>;

    /// Fold in one measurement vector and return the new state estimate
    fn update(&mut self, measurement: &DVector<f64>) -> Result<&DVector<f64>, FilterError>;

    /// Current state estimate (read-only)
    fn state(&self) -> Result<&DVector<f64>, FilterError>;

    /// Current estimate covariance (read-only)
    fn covariance(&self) -> Result<&DMatrix<f64>, FilterError>;

    /// Elapsed time
    fn time(&self) -> Result<f64, FilterError>;

    /// Diagnostics of the last successful update, if any
    fn innovation(&self) -> Option<&Innovation>;

    /// Return to the uninitialized state
    fn reset(&mut self);

    /// Get state dimension
    fn x_dim(&self) -> usize;

    /// Get measurement dimension
    fn z_dim(&self) -> usize;
}
