//! # Work Trait
//!
//! The capability interface implemented by every schedulable unit, plus the
//! [`WorkScope`] handed into [`Work::step`] for spawning phase children.

use async_trait::async_trait;

use crate::error::WorkError;
use crate::node::WorkNode;
use crate::state::WorkState;

/// Default retry budget for a work node's children.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// A single schedulable unit of asynchronous work.
///
/// Implementations describe *what* one node does; composition, retry and
/// cancellation are handled by the owning [`WorkNode`] tree. `step` must
/// perform exactly one unit of progress per call: either spawn the next
/// phase child through the scope and return `Pending`, or finish its own
/// remaining work and return `Success`.
#[async_trait]
pub trait Work: Send {
    /// Stable name, unique within the parent's children.
    fn name(&self) -> &str;

    /// Retry budget applied to this node's failing children.
    fn max_retries(&self) -> u32 {
        DEFAULT_MAX_RETRIES
    }

    /// Return to a clean state before a (re-)attempt: release scoped
    /// resources and re-acquire whatever a fresh attempt needs. Children
    /// have already been discarded by the node when this runs. Idempotent.
    async fn reset(&mut self) -> Result<(), WorkError> {
        Ok(())
    }

    /// Advance by one unit of progress. Called only when every previously
    /// spawned child has reached `Success`.
    async fn step(&mut self, scope: &mut WorkScope<'_>) -> Result<WorkState, WorkError>;

    /// Invoked once when this node's failure is final: the retry budget
    /// for a failing child was exhausted here, or the scheduler observed
    /// the root fail with nobody left to retry it. A child that fails and
    /// is then retried by its parent never has its raise fired. The
    /// default policy is to do nothing and let the failure propagate.
    async fn on_failure_raise(&mut self) {}
}

/// Capability handed into [`Work::step`]: spawn child works under the
/// calling node. At most one new phase should be added per `step` call.
pub struct WorkScope<'a> {
    children: &'a mut Vec<WorkNode>,
}

impl<'a> WorkScope<'a> {
    /// Build a scope over a node's child list. Normally done by the
    /// cranking node; public so work implementations can be unit tested
    /// in isolation.
    pub fn new(children: &'a mut Vec<WorkNode>) -> Self {
        Self { children }
    }

    /// Queue a child work. Names must be unique within this node.
    pub fn add_child(&mut self, work: Box<dyn Work>) -> Result<(), WorkError> {
        let name = work.name().to_string();
        if self.children.iter().any(|c| c.name() == name) {
            return Err(WorkError::DuplicateChild(name));
        }
        self.children.push(WorkNode::new(work));
        Ok(())
    }

    /// Whether a child with the given name exists (any state).
    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name() == name)
    }

    /// Number of children currently owned by the node.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
