/*!
# linear-kalman-rs - Discrete-time linear Kalman filter

Recursive estimation of hidden state (position, velocity, ...) from noisy
linear measurements, with full covariance bookkeeping.

## Features

- Validated configuration record (`dt`, A, C, Q, R, P0) loadable from JSON
- Predict / update recursion with the gain computed by a linear solve
- All-or-nothing updates: singular innovation covariances are reported, never
  turned into NaNs
- Per-step observability through [`StepReporter`] sinks
- Caller-side runner with an optional skip-and-repredict policy

## Modules

- [`filter`] - The filter, its trait and error types
- [`config`] - Configuration record and validation
- [`output`] - Estimates and trajectories
- [`reporter`] - Observability hooks
- [`runner`] - Driving a filter over measurement sequences
- [`common`] - Linear algebra, ready-made models, simulated data

## Example

```rust
use linear_kalman_rs::{KalmanConfig, KalmanFilter};
use nalgebra::{DMatrix, DVector};

let dt = 0.1;
let config = KalmanConfig::new(
    dt,
    DMatrix::from_row_slice(2, 2, &[1.0, dt, 0.0, 1.0]),
    DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
    DMatrix::identity(2, 2) * 1e-3,
    DMatrix::from_element(1, 1, 0.25),
)
.with_initial_covariance(DMatrix::identity(2, 2) * 100.0);

let mut filter = KalmanFilter::new(config).unwrap();
filter.init(0.0, DVector::zeros(2)).unwrap();

for y in [0.11, 0.19, 0.32, 0.41] {
    filter.update(&DVector::from_vec(vec![y])).unwrap();
}
let estimate = filter.state().unwrap();
assert_eq!(estimate.len(), 2);
```
*/

// ============================================================================
// Core modules
// ============================================================================

/// Filter implementation, trait and errors
pub mod filter;

/// Configuration record
pub mod config;

/// Output records
pub mod output;

/// Observability hooks
pub mod reporter;

/// Measurement sequence driver
pub mod runner;

/// Low-level utilities (linear algebra, models, simulated data)
pub mod common;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{CovarianceUpdate, KalmanConfig};
pub use filter::{Filter, FilterError, Innovation, KalmanFilter};
pub use output::{FilterOutput, StateEstimate, Trajectory};
pub use reporter::{CompositeReporter, DebugReporter, LoggingReporter, NoOpReporter, StepReporter};
pub use runner::{run_filter, run_streams, MeasurementStream, RunOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
