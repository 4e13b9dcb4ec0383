//! # Work States
//!
//! The observable state machine of a scheduled work node.

use std::fmt;

/// State of a [`crate::WorkNode`].
///
/// Terminal states are `Success` and `Failure`; everything else means the
/// scheduler still has cranking to do on the node or its subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkState {
    /// Not started yet, or reset and awaiting a fresh attempt.
    Pending,
    /// Actively advancing: own phases or children still outstanding.
    Running,
    /// All declared phases and all children completed successfully.
    Success,
    /// Failed permanently; propagated to the parent.
    Failure,
    /// A child failed transiently; the subtree was reset and will re-run.
    Retrying,
}

impl WorkState {
    /// Whether the state is terminal (no further cranking possible).
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkState::Success | WorkState::Failure)
    }
}

impl fmt::Display for WorkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkState::Pending => "PENDING",
            WorkState::Running => "RUNNING",
            WorkState::Success => "SUCCESS",
            WorkState::Failure => "FAILURE",
            WorkState::Retrying => "RETRYING",
        };
        f.write_str(s)
    }
}
