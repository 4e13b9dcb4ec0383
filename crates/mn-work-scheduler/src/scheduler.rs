//! # Work Scheduler
//!
//! Cooperative driver for a work tree. A single scheduling task cranks the
//! root until it reaches a terminal state, yielding between cranks so other
//! tasks on the runtime make progress.

use std::time::Duration;

use tracing::info;

use crate::node::WorkNode;
use crate::state::WorkState;

/// Scheduler tuning knobs.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Delay between a child failure and the retry attempt.
    pub retry_backoff: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl SchedulerConfig {
    /// Config for tests: no backoff between retries.
    pub fn for_testing() -> Self {
        Self {
            retry_backoff: Duration::ZERO,
        }
    }
}

/// Drives work trees to completion on the current task.
pub struct WorkScheduler {
    config: SchedulerConfig,
}

impl WorkScheduler {
    /// Create a scheduler with the given config.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Crank `root` until terminal and return the final state.
    ///
    /// The root is consumed; dropping the returned future mid-run cancels
    /// the whole tree (children, staged resources, in-flight operations).
    pub async fn run(&self, mut root: WorkNode) -> WorkState {
        info!("[mn-work] running work tree '{}'", root.name());
        let state = self.run_node(&mut root).await;
        info!("[mn-work] work tree '{}' finished: {}", root.name(), state);
        state
    }

    /// Crank a borrowed root until terminal. Useful when the caller wants to
    /// inspect the tree (or reset and re-run it) afterwards.
    pub async fn run_node(&self, root: &mut WorkNode) -> WorkState {
        loop {
            let state = root.crank(self.config.retry_backoff).await;
            if state.is_terminal() {
                // No parent exists to retry the root, so its failure is
                // final; raise it here.
                root.raise_failure().await;
                return state;
            }
            tokio::task::yield_now().await;
        }
    }
}
