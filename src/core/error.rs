// src/core/error.rs
//
// Engine error taxonomy. An empty feature list is data, not an error,
// so it never appears here.

use thiserror::Error;

/// Errors that can cross the engine boundary.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The signal cannot be analyzed at all: fewer than two usable
    /// samples, or a flat trace where no peak is distinguishable.
    #[error("invalid signal: {0}")]
    InvalidSignal(String),

    /// A configuration value was rejected before detection ran.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl AnalysisError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
