//! # Domain Errors
//!
//! Error types for history synchronization. The mapping into
//! [`mn_work_scheduler::WorkError`] fixes the retry class of each fault:
//! network conditions are transient, range/record faults are structural,
//! staging faults are fatal for the run.

use mn_work_scheduler::WorkError;
use thiserror::Error;

/// History synchronization error types.
#[derive(Debug, Error)]
pub enum HistorySyncError {
    /// Remote archive unreachable or timed out. Retryable.
    #[error("archive network error: {0}")]
    Network(String),

    /// Requested file missing on the archive (publication lag). Retryable.
    #[error("archive file not found: {0}")]
    NotFound(String),

    /// Checkpoint range violates the boundary invariants. Caller bug.
    #[error("misaligned checkpoint range: first={first} last={last} step={step}")]
    MisalignedRange {
        /// First checkpoint sequence of the offending range.
        first: u32,
        /// Last checkpoint sequence of the offending range.
        last: u32,
        /// Checkpoint step size.
        step: u32,
    },

    /// Archive reported a checkpoint sequence off the step grid.
    #[error("checkpoint {seq} not aligned to frequency {step}")]
    MisalignedCheckpoint {
        /// Reported checkpoint sequence.
        seq: u32,
        /// Checkpoint step size.
        step: u32,
    },

    /// Downloaded checkpoint file failed the integrity check.
    #[error("empty checkpoint file for sequence {seq}")]
    EmptyFile {
        /// Checkpoint sequence whose file was empty.
        seq: u32,
    },

    /// A packed record could not be decoded; the stream ends here.
    #[error("malformed history record: {0}")]
    MalformedRecord(String),

    /// The archive-state phase completed without leaving a snapshot.
    #[error("archive state missing after fetch phase")]
    StateMissing,

    /// Staging directory could not be allocated. Fatal for the run.
    #[error("staging directory error: {0}")]
    Staging(String),

    /// Local filesystem error while staging or scanning.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The run was destroyed before its completion handler fired.
    #[error("run cancelled before completion")]
    Cancelled,
}

impl HistorySyncError {
    /// Whether the fault is a transient condition worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            HistorySyncError::Network(_)
                | HistorySyncError::NotFound(_)
                | HistorySyncError::EmptyFile { .. }
                | HistorySyncError::Io(_)
        )
    }
}

impl From<HistorySyncError> for WorkError {
    fn from(e: HistorySyncError) -> Self {
        match &e {
            HistorySyncError::Staging(_) => WorkError::Resource(e.to_string()),
            HistorySyncError::Cancelled => WorkError::Cancelled,
            _ if e.is_transient() => WorkError::Transient(e.to_string()),
            _ => WorkError::Structural(e.to_string()),
        }
    }
}
