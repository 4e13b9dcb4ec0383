//! # History Sync Configuration

use serde::{Deserialize, Serialize};

/// Checkpoints covered by one quorum-inference run.
pub const DEFAULT_HISTORY_WINDOW: u32 = 100;

/// History synchronization configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistorySyncConfig {
    /// Checkpoint step size; fixed by the surrounding network, never
    /// computed here.
    pub checkpoint_frequency: u32,

    /// Size of the recent-history window, in checkpoints.
    pub num_checkpoints: u32,

    /// Concurrent per-checkpoint downloads within one batch.
    pub download_concurrency: usize,

    /// Retry budget for transient failures at each phase.
    pub max_retries: u32,

    /// Delay between a failure and the retry attempt, milliseconds.
    pub retry_backoff_ms: u64,

    /// Delay before each archive-state fetch (polling spacing),
    /// milliseconds. Zero for first use.
    pub state_fetch_delay_ms: u64,

    /// Where to allocate staging directories; system temp root when unset.
    pub staging_root: Option<std::path::PathBuf>,
}

impl Default for HistorySyncConfig {
    fn default() -> Self {
        Self {
            checkpoint_frequency: 64,
            num_checkpoints: DEFAULT_HISTORY_WINDOW,
            download_concurrency: 16,
            max_retries: 5,
            retry_backoff_ms: 500,
            state_fetch_delay_ms: 0,
            staging_root: None,
        }
    }
}

impl HistorySyncConfig {
    /// Create a config for testing (small window, no delays).
    pub fn for_testing() -> Self {
        Self {
            checkpoint_frequency: 8,
            num_checkpoints: 4,
            download_concurrency: 4,
            max_retries: 3,
            retry_backoff_ms: 0,
            state_fetch_delay_ms: 0,
            staging_root: None,
        }
    }
}
