//! # Work Errors
//!
//! Error taxonomy for scheduled work. The variant decides the retry policy:
//! only `Transient` failures consume retry budget; `Structural` and
//! `Resource` faults fail the subtree immediately.

use thiserror::Error;

/// Failure reported by a work unit.
#[derive(Clone, Debug, Error)]
pub enum WorkError {
    /// Temporary condition (network timeout, archive momentarily
    /// unavailable). Retried up to the parent's budget.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Logic or data-integrity fault (misaligned range, malformed record).
    /// Never retried.
    #[error("structural fault: {0}")]
    Structural(String),

    /// Failure to acquire a local resource (staging directory). Fatal for
    /// the run.
    #[error("resource failure: {0}")]
    Resource(String),

    /// The work was cancelled; parents must not treat this as success.
    #[error("work cancelled")]
    Cancelled,

    /// A child with the given name already exists under this node.
    #[error("duplicate child work name: {0}")]
    DuplicateChild(String),
}

impl WorkError {
    /// Whether a parent may spend retry budget on this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkError::Transient(_))
    }
}

impl From<std::io::Error> for WorkError {
    fn from(e: std::io::Error) -> Self {
        WorkError::Transient(e.to_string())
    }
}
