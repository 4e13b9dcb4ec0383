//! # Consensus-History Records
//!
//! Checkpoint files are streams of sequentially packed records: a `u32`
//! big-endian length prefix followed by a bincode-encoded
//! [`HistoryRecord`]. This module holds the record types, the framing
//! encoder used by archives and fixtures, and the streaming reader.

mod reader;

use serde::{Deserialize, Serialize};

use crate::domain::HistorySyncError;
use crate::quorum::{NodeId, QuorumSet};

pub use reader::{HistoryRecordReader, MAX_RECORD_LEN};

/// One consensus statement as archived: which node spoke, and the quorum
/// set it declared, if any.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsensusStatement {
    /// Validator that emitted the statement.
    pub node_id: NodeId,
    /// Quorum-set declaration carried by the statement.
    pub quorum_set: Option<QuorumSet>,
}

/// One deserialized unit from a checkpoint file: the consensus history of
/// a single ledger.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Ledger this history belongs to.
    pub ledger_seq: u32,
    /// Statements observed for that ledger.
    pub statements: Vec<ConsensusStatement>,
}

/// Append one framed record to `buf`.
pub fn encode_record(buf: &mut Vec<u8>, record: &HistoryRecord) -> Result<(), HistorySyncError> {
    let body = bincode::serialize(record)
        .map_err(|e| HistorySyncError::MalformedRecord(e.to_string()))?;
    buf.extend_from_slice(&(body.len() as u32).to_be_bytes());
    buf.extend_from_slice(&body);
    Ok(())
}

/// Encode a whole checkpoint file body from records.
pub fn encode_records(records: &[HistoryRecord]) -> Result<Vec<u8>, HistorySyncError> {
    let mut buf = Vec::new();
    for record in records {
        encode_record(&mut buf, record)?;
    }
    Ok(buf)
}
