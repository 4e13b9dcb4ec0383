//! # Ports
//!
//! Outbound dependency traits. The remote archive is a blob store: it can
//! report its published state, serve checkpoint files, and list what it
//! holds. Transports (HTTP, S3, local mirror) live behind this boundary.

use async_trait::async_trait;

use crate::domain::{ArchiveState, FileCategory, HistorySyncError};

/// History archive - outbound port (blob store with get/list).
#[async_trait]
pub trait HistoryArchive: Send + Sync {
    /// Fetch the archive's current published state.
    async fn get_state(&self) -> Result<ArchiveState, HistorySyncError>;

    /// Fetch one checkpoint file. The blob may be gzipped; consumers
    /// detect and decompress.
    async fn get_file(&self, category: FileCategory, seq: u32)
        -> Result<Vec<u8>, HistorySyncError>;

    /// List published checkpoint sequences for a category.
    async fn list(&self, category: FileCategory) -> Result<Vec<u32>, HistorySyncError>;

    /// Identifier for logging.
    fn archive_id(&self) -> &str;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::records::{encode_records, HistoryRecord};

/// Scripted in-memory archive for tests: canned state, per-checkpoint
/// blobs, and programmable transient failures.
pub struct MockArchive {
    state: ArchiveState,
    files: Mutex<HashMap<(FileCategory, u32), Vec<u8>>>,
    state_failures: AtomicU32,
    file_failures: AtomicU32,
    state_calls: AtomicU32,
    file_calls: AtomicU32,
    file_delay_ms: AtomicU32,
}

impl MockArchive {
    /// Archive reporting the given published tip.
    pub fn new(current_checkpoint: u32) -> Self {
        Self {
            state: ArchiveState {
                current_checkpoint,
                network_id: "testnet".to_string(),
                bucket_list_hash: [0; 32],
                version: 1,
            },
            files: Mutex::new(HashMap::new()),
            state_failures: AtomicU32::new(0),
            file_failures: AtomicU32::new(0),
            state_calls: AtomicU32::new(0),
            file_calls: AtomicU32::new(0),
            file_delay_ms: AtomicU32::new(0),
        }
    }

    /// Store a raw blob for `(category, seq)`.
    pub fn put_blob(&self, category: FileCategory, seq: u32, bytes: Vec<u8>) {
        self.files.lock().unwrap().insert((category, seq), bytes);
    }

    /// Encode records into a checkpoint blob, gzipped when asked.
    pub fn put_records(
        &self,
        category: FileCategory,
        seq: u32,
        records: &[HistoryRecord],
        gzipped: bool,
    ) {
        let body = encode_records(records).expect("encodable records");
        let blob = if gzipped {
            crate::adapters::gzip_bytes(&body)
        } else {
            body
        };
        self.put_blob(category, seq, blob);
    }

    /// Fail the next `n` `get_state` calls with a network error.
    pub fn fail_next_state_fetches(&self, n: u32) {
        self.state_failures.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` `get_file` calls with a network error.
    pub fn fail_next_file_fetches(&self, n: u32) {
        self.file_failures.store(n, Ordering::SeqCst);
    }

    /// Delay every `get_file` call (simulated transfer time).
    pub fn set_file_delay_ms(&self, ms: u32) {
        self.file_delay_ms.store(ms, Ordering::SeqCst);
    }

    /// How many `get_state` calls were made.
    pub fn state_calls(&self) -> u32 {
        self.state_calls.load(Ordering::SeqCst)
    }

    /// How many `get_file` calls were made.
    pub fn file_calls(&self) -> u32 {
        self.file_calls.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl HistoryArchive for MockArchive {
    async fn get_state(&self) -> Result<ArchiveState, HistorySyncError> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.state_failures) {
            return Err(HistorySyncError::Network("simulated state timeout".into()));
        }
        Ok(self.state.clone())
    }

    async fn get_file(
        &self,
        category: FileCategory,
        seq: u32,
    ) -> Result<Vec<u8>, HistorySyncError> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.file_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay.into())).await;
        }
        if Self::take_failure(&self.file_failures) {
            return Err(HistorySyncError::Network("simulated file timeout".into()));
        }
        self.files
            .lock()
            .unwrap()
            .get(&(category, seq))
            .cloned()
            .ok_or_else(|| HistorySyncError::NotFound(category.file_name(seq)))
    }

    async fn list(&self, category: FileCategory) -> Result<Vec<u32>, HistorySyncError> {
        let mut seqs: Vec<u32> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|(c, _)| *c == category)
            .map(|(_, seq)| *seq)
            .collect();
        seqs.sort_unstable();
        Ok(seqs)
    }

    fn archive_id(&self) -> &str {
        "mock"
    }
}
