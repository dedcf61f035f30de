//! Observability for filter execution.
//!
//! This module provides the [`StepReporter`] trait: a caller-supplied sink
//! that receives each estimate as a run progresses, so the filter itself stays
//! free of I/O. The runner invokes the callbacks; the filter never does.
//!
//! - [`NoOpReporter`] - does nothing, optimized away
//! - [`DebugReporter`] - captures clones of every event
//! - [`LoggingReporter`] - emits events through the `log` crate
//! - [`CompositeReporter`] - forwards to two reporters
//!
//! # Example
//!
//! ```
//! use linear_kalman_rs::{DebugReporter, StepReporter, StateEstimate};
//! use nalgebra::{DMatrix, DVector};
//!
//! let mut reporter = DebugReporter::new();
//! let estimate = StateEstimate::new(0, 0.1, DVector::zeros(2), DMatrix::identity(2, 2));
//! reporter.on_update(&estimate, None);
//!
//! assert_eq!(reporter.update_events().len(), 1);
//! ```

use nalgebra::DVector;

use crate::filter::{FilterError, Innovation};
use crate::output::StateEstimate;

// ============================================================================
// StepReporter Trait
// ============================================================================

/// Observability trait for filter runs.
///
/// All methods have default empty implementations, so you only need
/// to override the events you care about.
///
/// Reporters use `&mut self` for callbacks, so they are NOT required
/// to be `Send + Sync`.
pub trait StepReporter {
    /// Called once the filter has been initialized.
    fn on_init(&mut self, _t0: f64, _x0: &DVector<f64>) {}

    /// Called when a step advanced by prediction only (measurement skipped).
    fn on_prediction(&mut self, _estimate: &StateEstimate) {}

    /// Called after a measurement was folded into the belief.
    fn on_update(&mut self, _estimate: &StateEstimate, _innovation: Option<&Innovation>) {}

    /// Called when a step's measurement was rejected.
    fn on_rejected(&mut self, _step: usize, _error: &FilterError) {}
}

// ============================================================================
// NoOpReporter
// ============================================================================

/// Zero-cost reporter that does nothing.
///
/// This is the default reporter used when no observability is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl NoOpReporter {
    /// Create a new no-op reporter.
    pub fn new() -> Self {
        Self
    }
}

impl StepReporter for NoOpReporter {}

// ============================================================================
// DebugReporter
// ============================================================================

/// Reporter that captures all events for debugging.
///
/// Stores clones of everything passed to the callbacks, which includes a
/// full covariance per step. Intended for tests and short runs.
#[derive(Debug, Clone, Default)]
pub struct DebugReporter {
    inits: Vec<(f64, DVector<f64>)>,
    predictions: Vec<StateEstimate>,
    updates: Vec<(StateEstimate, Option<Innovation>)>,
    rejections: Vec<(usize, FilterError)>,
}

impl DebugReporter {
    /// Create a new debug reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all captured events.
    pub fn clear(&mut self) {
        self.inits.clear();
        self.predictions.clear();
        self.updates.clear();
        self.rejections.clear();
    }

    /// Get captured init events.
    pub fn init_events(&self) -> &[(f64, DVector<f64>)] {
        &self.inits
    }

    /// Get captured prediction-only steps.
    pub fn prediction_events(&self) -> &[StateEstimate] {
        &self.predictions
    }

    /// Get captured update events.
    pub fn update_events(&self) -> &[(StateEstimate, Option<Innovation>)] {
        &self.updates
    }

    /// Get captured rejections.
    pub fn rejection_events(&self) -> &[(usize, FilterError)] {
        &self.rejections
    }

    /// Total number of captured events across all types.
    pub fn total_events(&self) -> usize {
        self.inits.len() + self.predictions.len() + self.updates.len() + self.rejections.len()
    }
}

impl StepReporter for DebugReporter {
    fn on_init(&mut self, t0: f64, x0: &DVector<f64>) {
        self.inits.push((t0, x0.clone()));
    }

    fn on_prediction(&mut self, estimate: &StateEstimate) {
        self.predictions.push(estimate.clone());
    }

    fn on_update(&mut self, estimate: &StateEstimate, innovation: Option<&Innovation>) {
        self.updates.push((estimate.clone(), innovation.cloned()));
    }

    fn on_rejected(&mut self, step: usize, error: &FilterError) {
        self.rejections.push((step, error.clone()));
    }
}

// ============================================================================
// LoggingReporter
// ============================================================================

/// Reporter that logs events using the log crate.
///
/// Levels:
/// - `on_init`, `on_update`: DEBUG (state vector at TRACE when verbose)
/// - `on_prediction`: INFO
/// - `on_rejected`: WARN
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReporter {
    /// Whether to include state vectors in log messages
    verbose: bool,
}

impl LoggingReporter {
    /// Create a new logging reporter.
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Create a verbose logging reporter that includes state details.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl StepReporter for LoggingReporter {
    fn on_init(&mut self, t0: f64, x0: &DVector<f64>) {
        log::debug!("Filter initialized at t={} with {} states", t0, x0.len());
    }

    fn on_prediction(&mut self, estimate: &StateEstimate) {
        log::info!(
            "Step {}: measurement skipped, predicted to t={:.4}",
            estimate.step,
            estimate.time
        );
    }

    fn on_update(&mut self, estimate: &StateEstimate, innovation: Option<&Innovation>) {
        match innovation {
            Some(i) => log::debug!(
                "Step {}: t={:.4}, trace(P)={:.4e}, nis={:.4}",
                estimate.step,
                estimate.time,
                estimate.uncertainty(),
                i.nis
            ),
            None => log::debug!(
                "Step {}: t={:.4}, trace(P)={:.4e}",
                estimate.step,
                estimate.time,
                estimate.uncertainty()
            ),
        }
        if self.verbose {
            log::trace!("  x = {:?}", estimate.mean.as_slice());
        }
    }

    fn on_rejected(&mut self, step: usize, error: &FilterError) {
        log::warn!("Step {}: measurement rejected: {}", step, error);
    }
}

// ============================================================================
// CompositeReporter
// ============================================================================

/// Reporter that forwards events to two child reporters.
///
/// Useful when you need both logging and capturing.
#[derive(Debug, Clone)]
pub struct CompositeReporter<A: StepReporter, B: StepReporter> {
    first: A,
    second: B,
}

impl<A: StepReporter, B: StepReporter> CompositeReporter<A, B> {
    /// Create a new composite reporter.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Get a reference to the first reporter.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// Get a reference to the second reporter.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Consume and return both reporters.
    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: StepReporter, B: StepReporter> StepReporter for CompositeReporter<A, B> {
    fn on_init(&mut self, t0: f64, x0: &DVector<f64>) {
        self.first.on_init(t0, x0);
        self.second.on_init(t0, x0);
    }

    fn on_prediction(&mut self, estimate: &StateEstimate) {
        self.first.on_prediction(estimate);
        self.second.on_prediction(estimate);
    }

    fn on_update(&mut self, estimate: &StateEstimate, innovation: Option<&Innovation>) {
        self.first.on_update(estimate, innovation);
        self.second.on_update(estimate, innovation);
    }

    fn on_rejected(&mut self, step: usize, error: &FilterError) {
        self.first.on_rejected(step, error);
        self.second.on_rejected(step, error);
    }
}

// ============================================================================
// Tests
// ============================================================================
