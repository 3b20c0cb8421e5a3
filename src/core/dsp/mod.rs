//! Numeric utilities for signal preparation and derivative analysis

pub mod stats;

pub use stats::{gradient, moving_average, quantile};
