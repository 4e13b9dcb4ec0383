//! # MN History Sync
//!
//! History-archive synchronization for the Meridian node: downloads
//! checkpointed consensus-history files from a remote archive and infers the
//! quorum-set topology observed in recent network traffic.
//!
//! **Architecture:** Hexagonal (domain / ports / adapters / application)
//!
//! ## Pipeline
//!
//! ```text
//! FetchQuorumSetsWork (orchestrator, 3 ordered phases)
//!   ├── GetArchiveStateWork    # remote checkpoint metadata
//!   ├── BatchDownloadWork      # one file per checkpoint, concurrent
//!   └── scan                   # HistoryRecordReader → QuorumInferenceEngine
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! mn-history-sync/
//! ├── domain/          # CheckpointRange, ArchiveState, FileCategory, errors
//! ├── quorum/          # QuorumSet, sanity/normalization, inference engine
//! ├── records/         # framed consensus-history record stream
//! ├── ports/           # HistoryArchive blob-store port + mock
//! ├── adapters/        # staging directory, local-directory archive
//! ├── works/           # the historywork family on mn-work-scheduler
//! ├── application/     # HistorySyncService facade
//! └── config.rs        # HistorySyncConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod quorum;
pub mod records;
pub mod works;

// Re-exports
pub use adapters::{LocalDirArchive, StagingDir};
pub use application::HistorySyncService;
pub use config::HistorySyncConfig;
pub use domain::{ArchiveState, CheckpointRange, FileCategory, HistorySyncError};
pub use ports::{HistoryArchive, MockArchive};
pub use quorum::{NodeId, ObservedQset, QsetHash, QuorumInferenceEngine, QuorumSet, QuorumSnapshot};
pub use records::{ConsensusStatement, HistoryRecord, HistoryRecordReader};
pub use works::{BatchDownloadWork, FetchOutcome, FetchQuorumSetsWork, GetArchiveStateWork};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
