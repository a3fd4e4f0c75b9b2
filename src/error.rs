//! Error types for mecsim.
//!
//! The engine surfaces errors in exactly one place: parameter validation at
//! `start`. Every numeric edge case inside the integrators (zero mass, zero
//! target time, negative timestep) is defensively clamped instead of
//! reported, so `advance` can never fail mid-run.

use thiserror::Error;

/// Result type alias for mecsim operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all mecsim operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// Mode parameters failed validation at `start`.
    #[error("invalid parameters: {reason}")]
    InvalidParameters {
        /// Description of the failed constraint.
        reason: String,
    },

    /// No mode has been configured yet.
    #[error("no simulation mode configured")]
    NotConfigured,

    /// YAML parsing error while loading parameters.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Schema-level validation error from parameter loading.
    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// File I/O error while loading parameters.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Create an `InvalidParameters` error with a reason.
    #[must_use]
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }

    /// Check whether this error is a parameter-validation failure.
    #[must_use]
    pub const fn is_invalid_parameters(&self) -> bool {
        matches!(self, Self::InvalidParameters { .. })
    }
}
