//! # Quorum-Set Structures
//!
//! A quorum set describes which validators' agreement a node requires:
//! a threshold over a list of validators and nested inner sets. Content
//! hashes identify structurally identical sets regardless of declaration
//! order, which is why normalization runs before hashing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Validator identity (32-byte public key).
pub type NodeId = [u8; 32];

/// Content hash of a normalized quorum set.
pub type QsetHash = [u8; 32];

/// Maximum nesting depth accepted by the sanity check.
pub const MAX_QSET_NESTING: usize = 4;

/// Maximum total validators accepted across one quorum-set tree.
pub const MAX_QSET_NODES: usize = 1000;

/// A quorum-set structure: `threshold`-of-(`validators` + `inner_sets`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuorumSet {
    /// How many members (validators or inner sets) must agree.
    pub threshold: u32,
    /// Directly listed validators.
    pub validators: Vec<NodeId>,
    /// Nested quorum sets counted as single members.
    pub inner_sets: Vec<QuorumSet>,
}

impl QuorumSet {
    /// A flat `threshold`-of-`validators` set.
    pub fn flat(threshold: u32, validators: Vec<NodeId>) -> Self {
        Self {
            threshold,
            validators,
            inner_sets: Vec::new(),
        }
    }

    /// Content hash over the bincode encoding. Callers hash normalized
    /// sets so that structural equality implies hash equality.
    pub fn hash(&self) -> QsetHash {
        // Serialization of this self-describing structure cannot fail.
        let bytes = bincode::serialize(self).unwrap_or_default();
        let digest = Sha256::digest(&bytes);
        digest.into()
    }

    /// Structural sanity: sensible thresholds at every level, bounded
    /// nesting, bounded size, no validator listed twice anywhere in the
    /// tree.
    pub fn is_sane(&self) -> bool {
        let mut seen: Vec<NodeId> = Vec::new();
        self.sane_at_depth(0, &mut seen) && seen.len() <= MAX_QSET_NODES
    }

    fn sane_at_depth(&self, depth: usize, seen: &mut Vec<NodeId>) -> bool {
        if depth > MAX_QSET_NESTING {
            return false;
        }
        let members = self.validators.len() + self.inner_sets.len();
        if self.threshold == 0 || self.threshold as usize > members {
            return false;
        }
        for v in &self.validators {
            if seen.contains(v) {
                return false;
            }
            seen.push(*v);
        }
        self.inner_sets
            .iter()
            .all(|inner| inner.sane_at_depth(depth + 1, seen))
    }

    /// Canonicalize: sort validators and inner sets, and collapse inner
    /// sets that merely wrap a single member.
    pub fn normalize(&mut self) {
        for inner in &mut self.inner_sets {
            inner.normalize();
        }
        // Promote trivial 1-of-1 wrappers into the parent.
        let mut i = 0;
        while i < self.inner_sets.len() {
            let inner = &self.inner_sets[i];
            if inner.threshold == 1
                && inner.validators.len() == 1
                && inner.inner_sets.is_empty()
            {
                let v = inner.validators[0];
                self.inner_sets.remove(i);
                self.validators.push(v);
            } else {
                i += 1;
            }
        }
        self.validators.sort_unstable();
        self.validators.dedup();
        self.inner_sets.sort();
    }
}
