//! Shared test helpers
//!
//! Tolerance assertions and filter setup used across integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
