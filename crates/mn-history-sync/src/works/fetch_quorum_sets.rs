//! # Fetch-Quorum-Sets Orchestrator
//!
//! Three ordered phases, one spawned per `step` call:
//! archive-state fetch, batched checkpoint download, then a sequential
//! scan feeding every record into the inference engine. The caller learns
//! the result through a single-shot outcome channel.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mn_work_scheduler::{Work, WorkError, WorkScope, WorkState};
use tokio::sync::oneshot;
use tracing::{info, warn};

use super::{ArchiveStateSlot, BatchDownloadWork, GetArchiveStateWork};
use crate::adapters::StagingDir;
use crate::config::HistorySyncConfig;
use crate::domain::{CheckpointRange, FileCategory, HistorySyncError};
use crate::ports::HistoryArchive;
use crate::quorum::QuorumInferenceEngine;
use crate::records::HistoryRecordReader;

/// Terminal result of one orchestrator run, delivered exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Every checkpoint in the window was scanned into the engine.
    Success,
    /// The run gave up after exhausting retries on a transient fault, or
    /// hit a fault no retry can fix.
    TimedOut,
}

/// Top-level work that drives quorum-set inference from recent history.
pub struct FetchQuorumSetsWork {
    name: String,
    archive: Arc<dyn HistoryArchive>,
    config: HistorySyncConfig,
    engine: Arc<Mutex<QuorumInferenceEngine>>,
    state_slot: ArchiveStateSlot,
    staging: Option<Arc<StagingDir>>,
    range: Option<CheckpointRange>,
    outcome: Option<oneshot::Sender<FetchOutcome>>,
}

impl FetchQuorumSetsWork {
    /// Build an orchestrator reporting through `outcome`.
    pub fn new(
        archive: Arc<dyn HistoryArchive>,
        config: HistorySyncConfig,
        engine: Arc<Mutex<QuorumInferenceEngine>>,
        outcome: oneshot::Sender<FetchOutcome>,
    ) -> Self {
        Self {
            name: "fetch-recent-qsets".to_string(),
            archive,
            config,
            engine,
            state_slot: Arc::new(Mutex::new(None)),
            staging: None,
            range: None,
            outcome: Some(outcome),
        }
    }

    fn send_outcome(&mut self, outcome: FetchOutcome) {
        if let Some(tx) = self.outcome.take() {
            let _ = tx.send(outcome);
        }
    }

    async fn scan_into_engine(&self) -> Result<u64, HistorySyncError> {
        let Some(range) = self.range else {
            return Ok(0);
        };
        let staging = self
            .staging
            .as_ref()
            .ok_or_else(|| HistorySyncError::Staging("staging missing".into()))?;

        let mut scanned = 0u64;
        for seq in range.iter() {
            info!("[mn-history] scanning for quorum sets in checkpoint {seq}");
            let path = FileCategory::ConsensusHistory.local_path(staging.path(), seq);
            let mut reader = HistoryRecordReader::open(&path).await?;
            while let Some(record) = reader.next().await? {
                self.engine.lock().unwrap().observe(&record);
                scanned += 1;
            }
        }
        Ok(scanned)
    }
}

#[async_trait]
impl Work for FetchQuorumSetsWork {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    async fn reset(&mut self) -> Result<(), WorkError> {
        *self.state_slot.lock().unwrap() = None;
        self.range = None;
        // Previous staging (and its files) goes away here; a fresh
        // directory backs the new attempt.
        self.staging = Some(Arc::new(
            StagingDir::create_in(self.config.staging_root.as_deref())
                .map_err(WorkError::from)?,
        ));
        Ok(())
    }

    async fn step(&mut self, scope: &mut WorkScope<'_>) -> Result<WorkState, WorkError> {
        // Phase 1: fetch remote archive state.
        if !scope.has_child("get-archive-state") {
            scope.add_child(Box::new(GetArchiveStateWork::new(
                self.archive.clone(),
                self.state_slot.clone(),
                Duration::from_millis(self.config.state_fetch_delay_ms),
            )))?;
            return Ok(WorkState::Pending);
        }

        let current = {
            let slot = self.state_slot.lock().unwrap();
            slot.as_ref()
                .map(|s| s.current_checkpoint)
                .ok_or(HistorySyncError::StateMissing)
                .map_err(WorkError::from)?
        };

        // Phase 2: download the recent window of consensus history.
        if self.range.is_none() && !scope.has_child("batch-download-consensus") {
            match CheckpointRange::recent(
                current,
                self.config.checkpoint_frequency,
                self.config.num_checkpoints,
            )
            .map_err(WorkError::from)?
            {
                Some(range) => {
                    info!(
                        "[mn-history] downloading recent consensus history: [{}, {}]",
                        range.first(),
                        range.last()
                    );
                    self.range = Some(range);
                    let staging = self
                        .staging
                        .clone()
                        .ok_or_else(|| WorkError::Resource("staging missing".into()))?;
                    scope.add_child(Box::new(BatchDownloadWork::new(
                        self.archive.clone(),
                        range,
                        FileCategory::ConsensusHistory,
                        staging,
                        self.config.download_concurrency,
                        self.config.max_retries,
                        Duration::from_millis(self.config.retry_backoff_ms),
                    )))?;
                    return Ok(WorkState::Pending);
                }
                None => {
                    warn!(
                        "[mn-history] archive tip {} precedes the first checkpoint; \
                         nothing to scan",
                        current
                    );
                }
            }
        }

        // Phase 3: extract the quorum sets.
        let scanned = self.scan_into_engine().await.map_err(WorkError::from)?;
        info!("[mn-history] quorum-set scan complete: {scanned} records");
        self.send_outcome(FetchOutcome::Success);
        Ok(WorkState::Success)
    }

    async fn on_failure_raise(&mut self) {
        self.send_outcome(FetchOutcome::TimedOut);
    }
}
