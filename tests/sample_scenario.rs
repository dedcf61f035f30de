//! Sample planar tracking scenario
//!
//! Four states ([x, y, vx, vy]) at 30 Hz, two position channels, and the
//! twenty recorded measurement pairs.

mod helpers;

use helpers::assertions::{assert_scalar_close, assert_symmetric};
use helpers::fixtures::sample_filter;
use linear_kalman_rs::common::model::{
    sample_initial_state, sample_measurements, sample_tracking_config, SAMPLE_DT,
    SAMPLE_MEASUREMENTS,
};
use linear_kalman_rs::{
    run_filter, CompositeReporter, DebugReporter, KalmanConfig, KalmanFilter, LoggingReporter,
    RunOptions, StateEstimate,
};

fn run_sample(config: KalmanConfig) -> Vec<StateEstimate> {
    let mut filter = KalmanFilter::new(config).unwrap();
    let mut reporter = DebugReporter::new();
    let output = run_filter(
        &mut filter,
        0.0,
        sample_initial_state(),
        &sample_measurements(),
        &RunOptions::default(),
        &mut reporter,
    )
    .unwrap();
    output.trajectory.estimates().to_vec()
}

#[test]
fn test_sample_run_is_bit_stable() {
    let first = run_sample(sample_tracking_config());
    let second = run_sample(sample_tracking_config());

    assert_eq!(first.len(), SAMPLE_MEASUREMENTS.len());
    assert_eq!(first, second);
}

#[test]
fn test_trace_decreases_while_velocity_is_learned() {
    let mut filter = sample_filter();
    let mut previous = filter.covariance().unwrap().trace();
    assert_scalar_close(previous, 20000.2, 1e-9, "trace(P0)");

    for (k, y) in sample_measurements().iter().take(8).enumerate() {
        filter.update(y).unwrap();
        let trace = filter.covariance().unwrap().trace();
        assert!(
            trace < previous,
            "trace(P) did not decrease at step {}: {} -> {}",
            k,
            previous,
            trace
        );
        previous = trace;
    }
}

#[test]
fn test_first_update_keeps_matching_initial_state() {
    // x0 equals the first measurement, so the first innovation is zero in position
    let mut filter = sample_filter();
    let measurements = sample_measurements();
    let x = filter.update(&measurements[0]).unwrap().clone();

    assert_scalar_close(x[0], SAMPLE_MEASUREMENTS[0][0], 1e-9, "x");
    assert_scalar_close(x[1], SAMPLE_MEASUREMENTS[0][1], 1e-9, "y");
    assert_scalar_close(x[2], 0.0, 1e-9, "vx");
    assert_scalar_close(x[3], 0.0, 1e-9, "vy");
    assert_scalar_close(filter.time().unwrap(), SAMPLE_DT, 1e-15, "time");
}

#[test]
fn test_sample_covariance_stays_symmetric_and_finite() {
    let mut filter = sample_filter();
    for (k, y) in sample_measurements().iter().enumerate() {
        filter.update(y).unwrap();
        let p = filter.covariance().unwrap();
        assert!(p.iter().all(|v| v.is_finite()));
        assert_symmetric(p, 1e-9, &format!("P[{}]", k));

        let innovation = filter.innovation().unwrap();
        assert!(innovation.nis.is_finite() && innovation.nis >= 0.0);
        assert!(innovation.log_likelihood.is_finite());
    }
}

#[test]
fn test_sample_estimate_tracks_measurements() {
    let estimates = run_sample(sample_tracking_config());
    let last = estimates.last().unwrap();
    let [y_x, y_y] = SAMPLE_MEASUREMENTS[19];

    assert!((last.mean[0] - y_x).abs() < 0.5);
    assert!((last.mean[1] - y_y).abs() < 0.5);
    assert!(last.mean[2] > 0.0, "x velocity should be positive");
    assert_scalar_close(last.time, 20.0 * SAMPLE_DT, 1e-12, "time");
}

#[test]
fn test_config_from_json_reproduces_run() {
    let json = sample_tracking_config().to_json_pretty();
    let parsed = KalmanConfig::from_json(&json).unwrap();

    assert_eq!(run_sample(parsed), run_sample(sample_tracking_config()));
}

#[test]
fn test_reporters_observe_every_step() {
    let mut filter = KalmanFilter::new(sample_tracking_config()).unwrap();
    let mut reporter = CompositeReporter::new(DebugReporter::new(), LoggingReporter::verbose());

    let output = run_filter(
        &mut filter,
        0.0,
        sample_initial_state(),
        &sample_measurements(),
        &RunOptions::skipping(),
        &mut reporter,
    )
    .unwrap();

    let (debug, _) = reporter.into_parts();
    assert_eq!(debug.init_events().len(), 1);
    assert_eq!(debug.update_events().len(), 20);
    assert!(debug.rejection_events().is_empty());
    assert!(output.skipped_steps.is_empty());

    for (estimate, (reported, innovation)) in output
        .trajectory
        .estimates()
        .iter()
        .zip(debug.update_events())
    {
        assert_eq!(estimate, reported);
        assert_eq!(innovation.as_ref().unwrap().residual.len(), 2);
    }
}
