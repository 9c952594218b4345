//! Error types for simulation runs.
//!
//! Three kinds of failure are distinguished:
//!
//! | Kind | Raised when | Caller action |
//! |------|-------------|---------------|
//! | `InvalidInput` | The process list fails boundary checks | Fix the input |
//! | `InvalidParameters` | A policy parameter is out of range | Fix the parameters |
//! | `InvariantViolation` | A produced timeline breaks a structural rule | Report a bug |
//!
//! Input and parameter errors are always raised before the first simulation
//! step, so no partial [`Timeline`](crate::models::Timeline) is ever returned.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used by every fallible operation in this crate.
pub type SchedResult<T> = Result<T, SchedError>;

/// Errors surfaced by policies and the metrics aggregator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedError {
    /// The process list was rejected at the input boundary.
    ///
    /// Carries every issue found, not just the first.
    #[error("invalid input: {}", join_messages(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A policy parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameters {
        /// Parameter name as it appears in the policy configuration.
        name: &'static str,
        /// What is wrong with the supplied value.
        reason: String,
    },

    /// An algorithm produced output that breaks a timeline or metrics invariant.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl SchedError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Whether the caller can fix this error by changing its input or parameters.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
