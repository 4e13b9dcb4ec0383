//! # History Works
//!
//! The historywork family built on `mn-work-scheduler`: archive-state
//! polling, batched checkpoint download, and the quorum-set fetch
//! orchestrator that sequences them.

mod batch_download;
mod fetch_quorum_sets;
mod get_archive_state;

pub use batch_download::BatchDownloadWork;
pub use fetch_quorum_sets::{FetchOutcome, FetchQuorumSetsWork};
pub use get_archive_state::GetArchiveStateWork;

use std::sync::{Arc, Mutex};

use crate::domain::ArchiveState;

/// Result slot the archive-state phase fills for its orchestrator.
/// Accessed only from the scheduling task; the lock is never contended.
pub type ArchiveStateSlot = Arc<Mutex<Option<ArchiveState>>>;
