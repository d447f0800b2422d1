//! Error types for BJJSim

use thiserror::Error;

/// Core error type for environment and configuration operations
#[derive(Error, Debug)]
pub enum BjjError {
    /// A configuration or space invariant was violated at construction
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The environment was driven out of order (e.g. `step` before `reset`)
    #[error("Usage error: {0}")]
    Usage(String),

    /// Malformed actions passed to `step`
    #[error("Validation error: {0}")]
    Validation(String),

    /// A vector had the wrong number of elements
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length required by the space
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BjjError {
    /// Whether this error rejected a configuration at construction time
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether this error is a lifecycle misuse, recoverable by `reset`
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Whether this error rejected a malformed action payload
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::DimensionMismatch { .. })
    }
}

/// Result type alias for BJJSim operations
pub type Result<T> = std::result::Result<T, BjjError>;
