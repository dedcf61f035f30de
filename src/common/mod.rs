//! Low-level utilities
//!
//! - [`linalg`] - Gain solve, conditioning and covariance checks
//! - [`model`] - Ready-made filter configurations
//! - [`ground_truth`] - Simulated trajectories and measurements

pub mod ground_truth;
pub mod linalg;
pub mod model;
