//! Error types for rule evaluation
//!
//! Rules never decide "deny" by failing. A failure means the rule could not
//! reach a decision, and the shield maps every failure to a deny.

use thiserror::Error;

/// Rule evaluation error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// The caller's identity could not be resolved
    #[error("Identity resolution failed: {0}")]
    Resolution(String),

    /// The host cancelled the evaluation
    #[error("Evaluation cancelled")]
    Cancelled,

    /// The evaluation exceeded the shield's time budget
    #[error("Evaluation timed out")]
    Timeout,

    /// A capability the rule needs is absent from the context
    #[error("Missing context capability: {0}")]
    MissingContext(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for rule evaluation.
pub type RuleResult<T> = Result<T, RuleError>;

impl RuleError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RuleError::Resolution(_) => "IDENTITY_RESOLUTION_FAILED",
            RuleError::Cancelled => "EVALUATION_CANCELLED",
            RuleError::Timeout => "EVALUATION_TIMEOUT",
            RuleError::MissingContext(_) => "MISSING_CONTEXT",
            RuleError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if the failure was caused by the host aborting the evaluation
    /// rather than by the rule itself.
    pub fn is_aborted(&self) -> bool {
        matches!(self, RuleError::Cancelled | RuleError::Timeout)
    }
}
