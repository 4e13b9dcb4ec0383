//! # Archive-State Fetch Work
//!
//! One remote metadata fetch per attempt, with an optional per-attempt
//! delay used to space out polling. The snapshot lands in a result slot
//! owned by the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mn_work_scheduler::{Work, WorkError, WorkScope, WorkState};
use tracing::info;

use super::ArchiveStateSlot;
use crate::ports::HistoryArchive;

/// Work that retrieves a remote archive's current checkpoint metadata.
pub struct GetArchiveStateWork {
    name: String,
    archive: Arc<dyn HistoryArchive>,
    slot: ArchiveStateSlot,
    delay: Duration,
}

impl GetArchiveStateWork {
    /// Fetch into `slot`, waiting `delay` before each attempt.
    pub fn new(archive: Arc<dyn HistoryArchive>, slot: ArchiveStateSlot, delay: Duration) -> Self {
        Self {
            name: "get-archive-state".to_string(),
            archive,
            slot,
            delay,
        }
    }
}

#[async_trait]
impl Work for GetArchiveStateWork {
    fn name(&self) -> &str {
        &self.name
    }

    async fn reset(&mut self) -> Result<(), WorkError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }

    async fn step(&mut self, _scope: &mut WorkScope<'_>) -> Result<WorkState, WorkError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let state = self.archive.get_state().await.map_err(WorkError::from)?;
        info!(
            "[mn-history] archive '{}' published checkpoint {}",
            self.archive.archive_id(),
            state.current_checkpoint
        );
        *self.slot.lock().unwrap() = Some(state);
        Ok(WorkState::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockArchive;
    use std::sync::Mutex;

    fn slot() -> ArchiveStateSlot {
        Arc::new(Mutex::new(None))
    }

    #[tokio::test]
    async fn test_fetch_fills_the_slot() {
        let archive = Arc::new(MockArchive::new(127));
        let slot = slot();
        let mut work = GetArchiveStateWork::new(archive, slot.clone(), Duration::ZERO);

        let mut children = Vec::new();
        let mut scope = WorkScope::new(&mut children);
        let state = work.step(&mut scope).await.unwrap();
        assert_eq!(state, WorkState::Success);
        assert_eq!(slot.lock().unwrap().as_ref().unwrap().current_checkpoint, 127);
    }

    #[tokio::test]
    async fn test_transient_failure_propagates() {
        let archive = Arc::new(MockArchive::new(127));
        archive.fail_next_state_fetches(1);
        let slot = slot();
        let mut work = GetArchiveStateWork::new(archive, slot.clone(), Duration::ZERO);

        let mut children = Vec::new();
        let mut scope = WorkScope::new(&mut children);
        let err = work.step(&mut scope).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(slot.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_the_slot() {
        let archive = Arc::new(MockArchive::new(127));
        let slot = slot();
        *slot.lock().unwrap() = Some(archive.get_state().await.unwrap());

        let mut work = GetArchiveStateWork::new(archive, slot.clone(), Duration::ZERO);
        work.reset().await.unwrap();
        assert!(slot.lock().unwrap().is_none());
    }
}
