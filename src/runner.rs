//! Driving a filter over measurement sequences
//!
//! [`run_filter`] feeds one measurement vector per step into any [`Filter`],
//! snapshots the estimate after each step and hands it to a
//! [`StepReporter`]. Whether a numerically rejected measurement aborts the
//! run or is skipped (the filter re-predicts instead) is chosen through
//! [`RunOptions`].
//!
//! [`run_streams`] filters independent streams with one private filter per
//! stream. With the `rayon` feature the streams run in parallel.
//!
//! # Example
//!
//! ```
//! use linear_kalman_rs::common::model::{sample_initial_state, sample_measurements, sample_tracking_config};
//! use linear_kalman_rs::{run_filter, KalmanFilter, NoOpReporter, RunOptions};
//!
//! let mut filter = KalmanFilter::new(sample_tracking_config()).unwrap();
//! let output = run_filter(
//!     &mut filter,
//!     0.0,
//!     sample_initial_state(),
//!     &sample_measurements(),
//!     &RunOptions::default(),
//!     &mut NoOpReporter,
//! )
//! .unwrap();
//!
//! assert_eq!(output.num_steps(), 20);
//! ```

use nalgebra::DVector;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::KalmanConfig;
use crate::filter::{Filter, FilterError, KalmanFilter};
use crate::output::{FilterOutput, StateEstimate};
use crate::reporter::{NoOpReporter, StepReporter};

/// Options controlling how a run reacts to rejected measurements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Skip measurements rejected with a numerical error and re-predict
    /// instead of aborting. Other errors always abort.
    pub skip_numerical_failures: bool,
}

impl RunOptions {
    /// Options that skip numerically rejected measurements
    pub fn skipping() -> Self {
        Self {
            skip_numerical_failures: true,
        }
    }
}

/// An independent measurement stream with its own starting point
#[derive(Debug, Clone)]
pub struct MeasurementStream {
    /// Start time
    pub t0: f64,
    /// Initial state estimate
    pub x0: DVector<f64>,
    /// One measurement vector per step
    pub measurements: Vec<DVector<f64>>,
}

fn snapshot<F: Filter>(filter: &F, step: usize) -> Result<StateEstimate, FilterError> {
    Ok(StateEstimate::new(
        step,
        filter.time()?,
        filter.state()?.clone(),
        filter.covariance()?.clone(),
    ))
}

/// Initialize `filter` at `(t0, x0)` and feed it every measurement in order.
///
/// # Errors
/// Any error from `init`, and any update error not skipped by `options`.
/// The filter keeps the belief it had reached when the error occurred.
pub fn run_filter<F: Filter, R: StepReporter>(
    filter: &mut F,
    t0: f64,
    x0: DVector<f64>,
    measurements: &[DVector<f64>],
    options: &RunOptions,
    reporter: &mut R,
) -> Result<FilterOutput, FilterError> {
    filter.init(t0, x0)?;
    reporter.on_init(t0, filter.state()?);

    let mut output = FilterOutput::empty();
    for (step, measurement) in measurements.iter().enumerate() {
        let result = filter.update(measurement).map(|_| ());
        match result {
            Ok(()) => {
                let estimate = snapshot(filter, step)?;
                reporter.on_update(&estimate, filter.innovation());
                output.trajectory.push(estimate);
            }
            Err(e) if options.skip_numerical_failures && e.is_numerical() => {
                reporter.on_rejected(step, &e);
                filter.predict()?;
                let estimate = snapshot(filter, step)?;
                reporter.on_prediction(&estimate);
                output.trajectory.push(estimate);
                output.skipped_steps.push(step);
            }
            Err(e) => {
                reporter.on_rejected(step, &e);
                return Err(e);
            }
        }
    }

    Ok(output)
}

fn run_stream(
    config: &KalmanConfig,
    stream: &MeasurementStream,
    options: &RunOptions,
) -> Result<FilterOutput, FilterError> {
    let mut filter = KalmanFilter::new(config.clone())?;
    run_filter(
        &mut filter,
        stream.t0,
        stream.x0.clone(),
        &stream.measurements,
        options,
        &mut NoOpReporter,
    )
}

/// Filter independent streams, each with its own filter built from `config`.
///
/// Results are returned in stream order.
pub fn run_streams(
    config: &KalmanConfig,
    streams: &[MeasurementStream],
    options: &RunOptions,
) -> Vec<Result<FilterOutput, FilterError>> {
    #[cfg(feature = "rayon")]
    {
        streams
            .par_iter()
            .map(|stream| run_stream(config, stream, options))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    {
        streams
            .iter()
            .map(|stream| run_stream(config, stream, options))
            .collect()
    }
}
