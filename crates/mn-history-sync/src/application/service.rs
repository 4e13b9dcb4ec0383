//! # History Sync Service
//!
//! Entry point the node runtime talks to: run one quorum-set inference
//! pass against an archive and read the aggregate afterwards. All
//! scheduling happens on the calling task; the engine is only touched
//! from there.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mn_work_scheduler::{SchedulerConfig, WorkNode, WorkScheduler};
use tokio::sync::oneshot;
use tracing::info;

use crate::config::HistorySyncConfig;
use crate::domain::HistorySyncError;
use crate::ports::HistoryArchive;
use crate::quorum::{QuorumInferenceEngine, QuorumSnapshot};
use crate::works::{FetchOutcome, FetchQuorumSetsWork};

/// History synchronization service.
pub struct HistorySyncService {
    config: HistorySyncConfig,
    engine: Arc<Mutex<QuorumInferenceEngine>>,
    scheduler: WorkScheduler,
}

impl HistorySyncService {
    /// Create a service with a fresh, empty inference aggregate.
    pub fn new(config: HistorySyncConfig) -> Self {
        let scheduler = WorkScheduler::new(SchedulerConfig {
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        });
        Self {
            config,
            engine: Arc::new(Mutex::new(QuorumInferenceEngine::new())),
            scheduler,
        }
    }

    /// Run one fetch-and-infer pass against `archive`.
    ///
    /// Resolves to the run's outcome; the aggregate keeps accumulating
    /// across runs. Dropping the returned future cancels the run: children
    /// are released, staging is removed, and no outcome is delivered.
    pub async fn fetch_recent_quorum_sets(
        &self,
        archive: Arc<dyn HistoryArchive>,
    ) -> Result<FetchOutcome, HistorySyncError> {
        info!(
            "[mn-history] fetching recent quorum sets from '{}'",
            archive.archive_id()
        );
        let (tx, rx) = oneshot::channel();
        let work =
            FetchQuorumSetsWork::new(archive, self.config.clone(), self.engine.clone(), tx);
        let root = WorkNode::new(Box::new(work));
        self.scheduler.run(root).await;
        rx.await.map_err(|_| HistorySyncError::Cancelled)
    }

    /// Read-only view of everything inferred so far.
    pub fn quorum_snapshot(&self) -> QuorumSnapshot {
        self.engine.lock().unwrap().snapshot()
    }
}
