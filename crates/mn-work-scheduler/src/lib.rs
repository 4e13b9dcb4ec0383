//! # MN Work Scheduler
//!
//! Hierarchical asynchronous work scheduler for the Meridian node.
//!
//! **Architecture:** cooperative work tree (single scheduling task)
//!
//! ## Purpose
//!
//! Drive multi-step, retryable, network-bound tasks (history download,
//! archive polling, catchup) as trees of [`Work`] units:
//! - A parent completes only after every child completes.
//! - Child failure is retried by the parent up to a bounded budget.
//! - Dropping a node recursively cancels its whole subtree.
//!
//! ## Module Structure
//!
//! ```text
//! mn-work-scheduler/
//! ├── state.rs       # WorkState machine
//! ├── error.rs       # WorkError taxonomy (drives retry)
//! ├── work.rs        # Work trait + WorkScope capability
//! ├── node.rs        # WorkNode ownership tree + crank loop
//! └── scheduler.rs   # WorkScheduler driver
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod node;
mod scheduler;
mod state;
mod work;

pub use error::WorkError;
pub use node::WorkNode;
pub use scheduler::{SchedulerConfig, WorkScheduler};
pub use state::WorkState;
pub use work::{Work, WorkScope, DEFAULT_MAX_RETRIES};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
