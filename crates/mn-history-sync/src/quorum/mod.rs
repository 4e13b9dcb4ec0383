//! # Quorum Sets
//!
//! Quorum-set structures observed in consensus history, plus the engine
//! that aggregates them into an inferred network topology.

mod engine;
mod qset;

pub use engine::{ObservedQset, QuorumInferenceEngine, QuorumSnapshot};
pub use qset::{NodeId, QsetHash, QuorumSet, MAX_QSET_NESTING, MAX_QSET_NODES};
