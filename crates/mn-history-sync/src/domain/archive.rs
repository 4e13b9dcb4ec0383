//! # Archive Metadata
//!
//! Immutable snapshot of a remote archive's published state, and the
//! deterministic naming of checkpoint files by `(category, sequence)`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Snapshot of a remote archive's most recent published state.
///
/// Fetched once per run and owned by the orchestrator; never mutated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveState {
    /// Most recent published checkpoint sequence (step-aligned by the
    /// archive contract).
    pub current_checkpoint: u32,
    /// Network this archive serves.
    pub network_id: String,
    /// Hash of the archive's bucket list at the checkpoint.
    pub bucket_list_hash: [u8; 32],
    /// Archive format version.
    pub version: u32,
}

/// Category of checkpoint files published by an archive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// Consensus-history entries: the packed record stream the quorum
    /// inference pipeline scans.
    ConsensusHistory,
    /// Applied ledger headers.
    Ledger,
    /// Transaction sets per ledger.
    Transactions,
}

impl FileCategory {
    /// File-name prefix for this category.
    pub fn prefix(&self) -> &'static str {
        match self {
            FileCategory::ConsensusHistory => "consensus",
            FileCategory::Ledger => "ledger",
            FileCategory::Transactions => "transactions",
        }
    }

    /// Base file name for a checkpoint, e.g. `consensus-00000e10.bin`.
    pub fn file_name(&self, seq: u32) -> String {
        format!("{}-{:08x}.bin", self.prefix(), seq)
    }

    /// Remote blob name; archives may publish the gzipped form alongside.
    pub fn remote_name(&self, seq: u32) -> String {
        self.file_name(seq)
    }

    /// Local cache path inside a staging directory.
    pub fn local_path(&self, staging: &Path, seq: u32) -> PathBuf {
        staging.join(self.file_name(seq))
    }
}
