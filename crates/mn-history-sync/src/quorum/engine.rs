//! # Quorum Inference Engine
//!
//! Aggregates quorum-set declarations observed in consensus history. The
//! aggregate is keyed by content hash and commutative over the multiset of
//! observations: record order never matters, repeats only bump counters.

use std::collections::HashMap;

use tracing::warn;

use super::qset::{NodeId, QsetHash, QuorumSet};
use crate::records::HistoryRecord;

/// One aggregated quorum-set observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedQset {
    /// Content hash of the normalized structure.
    pub hash: QsetHash,
    /// The normalized structure itself.
    pub qset: QuorumSet,
    /// How many statements referenced it.
    pub count: u64,
}

/// Incremental aggregate of quorum-set structures seen in history.
#[derive(Default)]
pub struct QuorumInferenceEngine {
    qsets: HashMap<QsetHash, ObservedQset>,
    node_refs: HashMap<NodeId, HashMap<QsetHash, u64>>,
    records_seen: u64,
    insane_skipped: u64,
}

impl QuorumInferenceEngine {
    /// Fresh, empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one history record into the aggregate.
    ///
    /// Every statement carrying a quorum-set declaration is normalized,
    /// sanity-checked, and upserted by content hash. Insane declarations
    /// are counted and skipped. Idempotent up to counters: observing the
    /// same record twice doubles counts without duplicating entries.
    pub fn observe(&mut self, record: &HistoryRecord) {
        self.records_seen += 1;
        for statement in &record.statements {
            let Some(declared) = &statement.quorum_set else {
                continue;
            };
            let mut qset = declared.clone();
            qset.normalize();
            if !qset.is_sane() {
                warn!(
                    "[mn-history] skipping insane quorum set at ledger {}",
                    record.ledger_seq
                );
                self.insane_skipped += 1;
                continue;
            }
            let hash = qset.hash();
            let entry = self.qsets.entry(hash).or_insert_with(|| ObservedQset {
                hash,
                qset: qset.clone(),
                count: 0,
            });
            debug_assert_eq!(entry.qset, qset);
            entry.count += 1;

            *self
                .node_refs
                .entry(statement.node_id)
                .or_default()
                .entry(hash)
                .or_insert(0) += 1;
        }
    }

    /// Number of distinct quorum-set structures observed.
    pub fn qset_count(&self) -> usize {
        self.qsets.len()
    }

    /// Observation count for one structure, by content hash.
    pub fn observation_count(&self, hash: &QsetHash) -> u64 {
        self.qsets.get(hash).map(|o| o.count).unwrap_or(0)
    }

    /// Number of records folded in so far.
    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    /// Number of declarations rejected by the sanity check.
    pub fn insane_skipped(&self) -> u64 {
        self.insane_skipped
    }

    /// Read-only snapshot of the aggregate for downstream topology
    /// analysis.
    pub fn snapshot(&self) -> QuorumSnapshot {
        let mut qsets: Vec<ObservedQset> = self.qsets.values().cloned().collect();
        qsets.sort_by(|a, b| b.count.cmp(&a.count).then(a.hash.cmp(&b.hash)));
        QuorumSnapshot {
            qsets,
            node_refs: self.node_refs.clone(),
            records_seen: self.records_seen,
            insane_skipped: self.insane_skipped,
        }
    }
}

/// Immutable view of the aggregate at a point in time.
#[derive(Clone, Debug)]
pub struct QuorumSnapshot {
    /// Observed structures, most-referenced first.
    pub qsets: Vec<ObservedQset>,
    /// Per-validator referenced quorum-set hashes with counts.
    pub node_refs: HashMap<NodeId, HashMap<QsetHash, u64>>,
    /// Records folded into this snapshot.
    pub records_seen: u64,
    /// Declarations rejected as insane.
    pub insane_skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ConsensusStatement;

    fn node(n: u8) -> NodeId {
        [n; 32]
    }

    fn record(ledger_seq: u32, statements: Vec<ConsensusStatement>) -> HistoryRecord {
        HistoryRecord {
            ledger_seq,
            statements,
        }
    }

    fn statement(n: u8, qset: Option<QuorumSet>) -> ConsensusStatement {
        ConsensusStatement {
            node_id: node(n),
            quorum_set: qset,
        }
    }

    #[test]
    fn test_observe_is_idempotent_up_to_counts() {
        let qset = QuorumSet::flat(2, vec![node(1), node(2), node(3)]);
        let rec = record(100, vec![statement(1, Some(qset.clone()))]);

        let mut once = QuorumInferenceEngine::new();
        once.observe(&rec);
        let mut twice = QuorumInferenceEngine::new();
        twice.observe(&rec);
        twice.observe(&rec);

        assert_eq!(once.qset_count(), 1);
        assert_eq!(twice.qset_count(), 1);
        let hash = once.snapshot().qsets[0].hash;
        assert_eq!(once.observation_count(&hash), 1);
        assert_eq!(twice.observation_count(&hash), 2);
    }

    #[test]
    fn test_structurally_equal_sets_merge() {
        // Same membership declared in different orders.
        let a = QuorumSet::flat(2, vec![node(1), node(2), node(3)]);
        let b = QuorumSet::flat(2, vec![node(3), node(2), node(1)]);
        let mut engine = QuorumInferenceEngine::new();
        engine.observe(&record(1, vec![statement(1, Some(a))]));
        engine.observe(&record(2, vec![statement(2, Some(b))]));

        assert_eq!(engine.qset_count(), 1);
        assert_eq!(engine.snapshot().qsets[0].count, 2);
    }

    #[test]
    fn test_statements_without_declarations_are_ignored() {
        let mut engine = QuorumInferenceEngine::new();
        engine.observe(&record(1, vec![statement(1, None), statement(2, None)]));
        assert_eq!(engine.qset_count(), 0);
        assert_eq!(engine.records_seen(), 1);
    }

    #[test]
    fn test_insane_declarations_are_skipped() {
        let insane = QuorumSet::flat(0, vec![node(1)]);
        let sane = QuorumSet::flat(1, vec![node(2)]);
        let mut engine = QuorumInferenceEngine::new();
        engine.observe(&record(
            1,
            vec![statement(1, Some(insane)), statement(2, Some(sane))],
        ));
        assert_eq!(engine.qset_count(), 1);
        assert_eq!(engine.insane_skipped(), 1);
    }

    #[test]
    fn test_node_refs_track_who_declared_what() {
        let qset = QuorumSet::flat(1, vec![node(9)]);
        let mut engine = QuorumInferenceEngine::new();
        engine.observe(&record(1, vec![statement(5, Some(qset.clone()))]));
        engine.observe(&record(2, vec![statement(5, Some(qset))]));

        let snap = engine.snapshot();
        let refs = snap.node_refs.get(&node(5)).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(*refs.values().next().unwrap(), 2);
    }

    #[test]
    fn test_aggregate_is_order_insensitive() {
        let a = QuorumSet::flat(1, vec![node(1)]);
        let b = QuorumSet::flat(1, vec![node(2)]);
        let r1 = record(1, vec![statement(1, Some(a))]);
        let r2 = record(2, vec![statement(2, Some(b))]);

        let mut fwd = QuorumInferenceEngine::new();
        fwd.observe(&r1);
        fwd.observe(&r2);
        let mut rev = QuorumInferenceEngine::new();
        rev.observe(&r2);
        rev.observe(&r1);

        assert_eq!(fwd.snapshot().qsets, rev.snapshot().qsets);
    }
}
