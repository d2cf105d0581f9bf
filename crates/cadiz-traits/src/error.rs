//! Error types for the cadiz engine.
//!
//! Every pipeline stage validates its own inputs and reports failures through
//! [`CadizError`]. Solver non-convergence is deliberately absent: the optimizer
//! recovers from it locally and flags the result instead of raising.

use thiserror::Error;

/// The main error type for cadiz operations.
#[derive(Debug, Error)]
pub enum CadizError {
    /// Invalid or inconsistent configuration (factor weights, objective name,
    /// metric specifications).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A parameter is outside its permitted range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input data violates a quality requirement (missing values where none
    /// are permitted, too few observations, unknown assets).
    #[error("Data quality error: {0}")]
    DataQuality(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl CadizError {
    /// Shorthand for a [`CadizError::Configuration`] error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Shorthand for a [`CadizError::InvalidParameter`] error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Shorthand for a [`CadizError::DataQuality`] error.
    pub fn data_quality(msg: impl Into<String>) -> Self {
        Self::DataQuality(msg.into())
    }

    /// Returns whether a caller can retry the operation with the same inputs.
    ///
    /// Always false: every error in the taxonomy points at the inputs or the
    /// configuration, never at a transient condition.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

/// A specialized Result type for cadiz operations.
pub type Result<T> = std::result::Result<T, CadizError>;
