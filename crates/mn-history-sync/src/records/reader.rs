//! # Streaming Record Reader
//!
//! Sequential reader over a local checkpoint file. Yields records one at a
//! time; a malformed frame finishes the stream with a single structural
//! error and no resync. Not restartable; reopen to rescan.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};

use super::HistoryRecord;
use crate::domain::HistorySyncError;

/// Upper bound on one framed record; larger prefixes are treated as
/// corruption rather than honored.
pub const MAX_RECORD_LEN: u32 = 4 * 1024 * 1024;

/// Sequential reader over one local checkpoint file.
pub struct HistoryRecordReader {
    file: BufReader<File>,
    finished: bool,
}

impl HistoryRecordReader {
    /// Open a checkpoint file for streaming reads.
    pub async fn open(path: &Path) -> Result<Self, HistorySyncError> {
        let file = File::open(path).await?;
        Ok(Self {
            file: BufReader::new(file),
            finished: false,
        })
    }

    /// Next record, `Ok(None)` at a clean end-of-file. After any error or
    /// end-of-file the reader stays finished.
    pub async fn next(&mut self) -> Result<Option<HistoryRecord>, HistorySyncError> {
        if self.finished {
            return Ok(None);
        }

        // Length prefix. Zero bytes here is a clean EOF; a partial prefix
        // means the file was truncated mid-record.
        let mut prefix = [0u8; 4];
        let mut filled = 0;
        while filled < prefix.len() {
            let n = match self.file.read(&mut prefix[filled..]).await {
                Ok(n) => n,
                Err(e) => {
                    self.finished = true;
                    return Err(HistorySyncError::Io(e));
                }
            };
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == 0 {
            self.finished = true;
            return Ok(None);
        }
        if filled < prefix.len() {
            self.finished = true;
            return Err(HistorySyncError::MalformedRecord(
                "truncated length prefix".into(),
            ));
        }

        let len = u32::from_be_bytes(prefix);
        if len == 0 || len > MAX_RECORD_LEN {
            self.finished = true;
            return Err(HistorySyncError::MalformedRecord(format!(
                "implausible record length {len}"
            )));
        }

        let mut body = vec![0u8; len as usize];
        if let Err(e) = self.file.read_exact(&mut body).await {
            self.finished = true;
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                return Err(HistorySyncError::MalformedRecord(
                    "truncated record body".into(),
                ));
            }
            return Err(HistorySyncError::Io(e));
        }

        match bincode::deserialize(&body) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                self.finished = true;
                Err(HistorySyncError::MalformedRecord(e.to_string()))
            }
        }
    }
}
