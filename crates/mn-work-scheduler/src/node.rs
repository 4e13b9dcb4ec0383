//! # Work Nodes
//!
//! The ownership tree around [`Work`] implementations. A node exclusively
//! owns its children; dropping a node cancels and releases the whole
//! subtree. Cranking advances the tree by bounded units of progress.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::error::WorkError;
use crate::state::WorkState;
use crate::work::{Work, WorkScope};

/// A node in the work tree: one [`Work`] plus its children and bookkeeping.
pub struct WorkNode {
    name: String,
    state: WorkState,
    retries: u32,
    raised: bool,
    last_error: Option<WorkError>,
    work: Box<dyn Work>,
    children: Vec<WorkNode>,
}

impl WorkNode {
    /// Wrap a work unit into a schedulable node in `Pending` state.
    pub fn new(work: Box<dyn Work>) -> Self {
        Self {
            name: work.name().to_string(),
            state: WorkState::Pending,
            retries: 0,
            raised: false,
            last_error: None,
            work,
            children: Vec::new(),
        }
    }

    /// Node name (unique within the parent).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    pub fn state(&self) -> WorkState {
        self.state
    }

    /// Retries consumed so far on this node's children.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// The error that put this node into `Failure`, if any.
    pub fn last_error(&self) -> Option<&WorkError> {
        self.last_error.as_ref()
    }

    /// Reset the subtree to `Pending`: children are cancelled and dropped;
    /// the work's own `reset` hook runs at the start of the next crank.
    /// Idempotent.
    pub fn reset(&mut self) {
        self.children.clear();
        self.state = WorkState::Pending;
        self.retries = 0;
        self.raised = false;
        self.last_error = None;
    }

    /// Escalate a terminal failure through `on_failure_raise`, once.
    ///
    /// Cranking raises where retry exhaustion is decided: a parent raises
    /// when a failing child has spent the budget. A root node has nobody
    /// deciding for it, so the scheduler calls this after observing the
    /// tree fail. No-op unless the node is in `Failure`, and never fires
    /// twice for the same failure.
    pub async fn raise_failure(&mut self) {
        if self.state == WorkState::Failure && !self.raised {
            self.raised = true;
            self.work.on_failure_raise().await;
        }
    }

    fn fail(&mut self, err: WorkError) -> WorkState {
        self.last_error = Some(err);
        self.state = WorkState::Failure;
        WorkState::Failure
    }

    /// Advance this subtree by one bounded unit of progress.
    ///
    /// Children are cranked first; the node's own `step` runs only once every
    /// child has reached `Success`. Child failures are retried (subtree
    /// reset, budget permitting) or escalated through `on_failure_raise`.
    pub fn crank(
        &mut self,
        retry_backoff: Duration,
    ) -> Pin<Box<dyn Future<Output = WorkState> + Send + '_>> {
        Box::pin(async move {
            if self.state.is_terminal() {
                return self.state;
            }

            if self.state == WorkState::Pending {
                if let Err(e) = self.work.reset().await {
                    error!("[mn-work] {}: reset failed: {}", self.name, e);
                    return self.fail(e);
                }
            }
            self.state = WorkState::Running;

            // Advance outstanding children in order; siblings own their
            // concurrency internally (spawned tasks), so one crank per
            // sibling stays bounded.
            let mut failed_child: Option<usize> = None;
            let mut outstanding = false;
            for (idx, child) in self.children.iter_mut().enumerate() {
                let state = if child.state().is_terminal() {
                    child.state()
                } else {
                    child.crank(retry_backoff).await
                };
                match state {
                    WorkState::Success => {}
                    WorkState::Failure => {
                        failed_child = Some(idx);
                    }
                    _ => outstanding = true,
                }
            }

            if let Some(idx) = failed_child {
                let err = self.children[idx]
                    .last_error
                    .clone()
                    .unwrap_or_else(|| WorkError::Transient("child failed without detail".into()));
                if err.is_retryable() && self.retries < self.work.max_retries() {
                    self.retries += 1;
                    warn!(
                        "[mn-work] {}: child '{}' failed ({}), retry {}/{}",
                        self.name,
                        self.children[idx].name(),
                        err,
                        self.retries,
                        self.work.max_retries()
                    );
                    self.children[idx].reset();
                    self.state = WorkState::Retrying;
                    if !retry_backoff.is_zero() {
                        tokio::time::sleep(retry_backoff).await;
                    }
                    return WorkState::Retrying;
                }
                error!(
                    "[mn-work] {}: child '{}' failed permanently: {}",
                    self.name,
                    self.children[idx].name(),
                    err
                );
                // Exhaustion is decided here, so the raise happens here.
                self.raised = true;
                self.work.on_failure_raise().await;
                return self.fail(err);
            }

            if outstanding {
                return WorkState::Running;
            }

            // All children successful: advance our own phase.
            let before = self.children.len();
            let mut scope = WorkScope::new(&mut self.children);
            match self.work.step(&mut scope).await {
                Ok(WorkState::Success) if self.children.len() == before => {
                    debug!("[mn-work] {}: success", self.name);
                    self.state = WorkState::Success;
                    WorkState::Success
                }
                Ok(_) => {
                    // Spawned a phase child or has more of its own work.
                    self.state = WorkState::Running;
                    WorkState::Running
                }
                Err(e) => {
                    // Report upward without raising: whether this failure is
                    // final is the parent's call (or the scheduler's, for a
                    // root).
                    warn!("[mn-work] {}: step failed: {}", self.name, e);
                    self.fail(e)
                }
            }
        })
    }
}
