//! Error types for the filter and its helpers
//!
//! Every fallible operation returns a [`FilterError`] instead of panicking.
//! A failed update never modifies the filter's belief.

use std::fmt;

/// Errors that can occur while configuring or running a filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Matrix dimensions or options are mutually inconsistent
    Configuration {
        /// Description of the configuration issue
        description: String,
    },

    /// Operation requires `init` to have been called first
    NotInitialized {
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// Dimension mismatch between expected and actual
    DimensionMismatch {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Context (e.g., "measurement dimension")
        context: String,
    },

    /// Linear solve failed (singular or ill-conditioned matrix)
    SingularMatrix {
        /// Description of which matrix failed
        context: String,
        /// Reciprocal condition estimate at the point of failure
        rcond: f64,
    },

    /// Non-finite values appeared in the result
    NumericalInstability {
        /// Description of the issue
        description: String,
    },
}

impl FilterError {
    /// Shorthand for a configuration error
    pub(crate) fn configuration(description: impl Into<String>) -> Self {
        FilterError::Configuration {
            description: description.into(),
        }
    }

    /// Shorthand for a dimension mismatch
    pub(crate) fn dimension(expected: usize, actual: usize, context: impl Into<String>) -> Self {
        FilterError::DimensionMismatch {
            expected,
            actual,
            context: context.into(),
        }
    }

    /// True for the numerical failure kinds (singular solve, NaN/inf).
    ///
    /// These are the errors a caller may choose to recover from by skipping
    /// the measurement and re-predicting.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            FilterError::SingularMatrix { .. } | FilterError::NumericalInstability { .. }
        )
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Configuration { description } => {
                write!(f, "Configuration error: {}", description)
            }
            FilterError::NotInitialized { operation } => {
                write!(f, "Filter not initialized: call init before {}", operation)
            }
            FilterError::DimensionMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            FilterError::SingularMatrix { context, rcond } => {
                write!(
                    f,
                    "Matrix solve failed: {} (rcond: {:.2e})",
                    context, rcond
                )
            }
            FilterError::NumericalInstability { description } => {
                write!(f, "Numerical instability: {}", description)
            }
        }
    }
}

impl std::error::Error for FilterError {}
