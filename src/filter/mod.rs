//! Filter implementations
//!
//! - [`KalmanFilter`] - Discrete-time linear Kalman filter
//! - [`Filter`] - Trait the filter implements, used by callers and the runner
//! - [`FilterError`] - Error taxonomy shared by all operations

pub mod errors;
pub mod kalman;
pub mod traits;

pub use errors::FilterError;
pub use kalman::{Innovation, KalmanFilter};
pub use traits::Filter;
