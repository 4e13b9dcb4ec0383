//! # Batch Download Work
//!
//! Downloads one file per checkpoint in a range into the staging
//! directory, with bounded concurrency. Each file is fetched, inflated
//! when gzipped, integrity-checked, and written to its deterministic
//! local path. Per-file transient failures are retried in place; a file
//! that fails permanently fails the whole batch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mn_work_scheduler::{Work, WorkError, WorkScope, WorkState};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::adapters::{maybe_gunzip, StagingDir};
use crate::domain::{CheckpointRange, FileCategory, HistorySyncError};
use crate::ports::HistoryArchive;

/// Work that fetches every checkpoint file in a range.
pub struct BatchDownloadWork {
    name: String,
    archive: Arc<dyn HistoryArchive>,
    range: CheckpointRange,
    category: FileCategory,
    staging: Arc<StagingDir>,
    concurrency: usize,
    per_file_retries: u32,
    retry_backoff: Duration,
}

impl BatchDownloadWork {
    /// Download `category` files for `range` into `staging`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        archive: Arc<dyn HistoryArchive>,
        range: CheckpointRange,
        category: FileCategory,
        staging: Arc<StagingDir>,
        concurrency: usize,
        per_file_retries: u32,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            name: format!("batch-download-{}", category.prefix()),
            archive,
            range,
            category,
            staging,
            concurrency: concurrency.max(1),
            per_file_retries,
            retry_backoff,
        }
    }
}

/// Fetch one checkpoint file with in-place retries for transient faults.
async fn fetch_one(
    archive: Arc<dyn HistoryArchive>,
    category: FileCategory,
    seq: u32,
    local: PathBuf,
    retries: u32,
    backoff: Duration,
) -> Result<u32, HistorySyncError> {
    let mut attempt = 0;
    loop {
        match fetch_once(&*archive, category, seq, &local).await {
            Ok(()) => return Ok(seq),
            Err(e) => {
                if e.is_transient() && attempt < retries {
                    attempt += 1;
                    debug!(
                        "[mn-history] checkpoint {:08x}: {} (attempt {}/{})",
                        seq, e, attempt, retries
                    );
                    if !backoff.is_zero() {
                        tokio::time::sleep(backoff).await;
                    }
                    continue;
                }
                return Err(e);
            }
        }
    }
}

async fn fetch_once(
    archive: &dyn HistoryArchive,
    category: FileCategory,
    seq: u32,
    local: &PathBuf,
) -> Result<(), HistorySyncError> {
    let blob = archive.get_file(category, seq).await?;
    let body = maybe_gunzip(blob)?;
    if body.is_empty() {
        return Err(HistorySyncError::EmptyFile { seq });
    }
    tokio::fs::write(local, body).await?;
    Ok(())
}

#[async_trait]
impl Work for BatchDownloadWork {
    fn name(&self) -> &str {
        &self.name
    }

    async fn step(&mut self, _scope: &mut WorkScope<'_>) -> Result<WorkState, WorkError> {
        info!(
            "[mn-history] downloading {} files for checkpoints [{}, {}]",
            self.range.count(),
            self.range.first(),
            self.range.last()
        );

        let mut seqs = self.range.iter();
        let mut inflight: JoinSet<Result<u32, HistorySyncError>> = JoinSet::new();
        let mut completed = 0usize;

        loop {
            while inflight.len() < self.concurrency {
                let Some(seq) = seqs.next() else { break };
                let local = self.category.local_path(self.staging.path(), seq);
                inflight.spawn(fetch_one(
                    self.archive.clone(),
                    self.category,
                    seq,
                    local,
                    self.per_file_retries,
                    self.retry_backoff,
                ));
            }
            match inflight.join_next().await {
                None => break,
                Some(joined) => {
                    let seq = joined
                        .map_err(|e| WorkError::Transient(format!("download task: {e}")))?
                        .map_err(WorkError::from)?;
                    completed += 1;
                    debug!(
                        "[mn-history] checkpoint {:08x} staged ({}/{})",
                        seq,
                        completed,
                        self.range.count()
                    );
                }
            }
        }

        Ok(WorkState::Success)
    }
}
