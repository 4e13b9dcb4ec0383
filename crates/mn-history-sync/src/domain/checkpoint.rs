//! # Checkpoint Ranges
//!
//! A contiguous span of history checkpoints, parameterized by the fixed
//! checkpoint frequency of the network.

use serde::{Deserialize, Serialize};

use super::errors::HistorySyncError;

/// A contiguous, step-aligned span of checkpoint sequences.
///
/// Enumerates `first, first+step, ..., last`. Invariants: `step > 0`,
/// `first <= last`, and the span is a whole number of steps. An archive
/// tip that is off the step grid is a caller contract violation and is not
/// detected here.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckpointRange {
    first: u32,
    last: u32,
    step: u32,
}

impl CheckpointRange {
    /// Build a range, enforcing the span invariants.
    pub fn new(first: u32, last: u32, step: u32) -> Result<Self, HistorySyncError> {
        if step == 0 || first > last || (last - first) % step != 0 {
            return Err(HistorySyncError::MisalignedRange { first, last, step });
        }
        Ok(Self { first, last, step })
    }

    /// The most recent `num_checkpoints`-sized window ending at
    /// `remote_last`.
    ///
    /// If the archive holds less history than the window, the range is
    /// clamped to start at the first valid checkpoint boundary
    /// (`step - 1`). An archive younger than even one checkpoint yields
    /// `Ok(None)`: nothing to scan.
    pub fn recent(
        remote_last: u32,
        step: u32,
        num_checkpoints: u32,
    ) -> Result<Option<Self>, HistorySyncError> {
        if step == 0 {
            return Err(HistorySyncError::MisalignedCheckpoint {
                seq: remote_last,
                step,
            });
        }
        let window = num_checkpoints.saturating_mul(step);
        let first = if remote_last < window {
            step - 1
        } else {
            remote_last - window
        };
        if first > remote_last {
            return Ok(None);
        }
        Self::new(first, remote_last, step).map(Some)
    }

    /// First checkpoint sequence in the range.
    pub fn first(&self) -> u32 {
        self.first
    }

    /// Last checkpoint sequence in the range.
    pub fn last(&self) -> u32 {
        self.last
    }

    /// Checkpoint step size.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Number of checkpoints enumerated. A constructed range always holds
    /// at least one.
    pub fn count(&self) -> usize {
        ((self.last - self.first) / self.step + 1) as usize
    }

    /// Iterate the checkpoint sequences `first, first+step, ..., last`.
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        (self.first..=self.last).step_by(self.step as usize)
    }
}
