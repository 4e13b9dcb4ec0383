//! # Local-Directory Archive
//!
//! A [`HistoryArchive`] served from a directory on the local filesystem:
//! offline mirrors and integration fixtures. Layout is one
//! `archive-state.json` plus `{category}-{seq:08x}.bin[.gz]` blobs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::adapters::compress::gzip_bytes;
use crate::domain::{ArchiveState, FileCategory, HistorySyncError};
use crate::ports::HistoryArchive;
use crate::records::{encode_records, HistoryRecord};

const STATE_FILE: &str = "archive-state.json";

/// Archive backed by a local directory.
pub struct LocalDirArchive {
    root: PathBuf,
    id: String,
}

impl LocalDirArchive {
    /// Open (or target) an archive rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let id = format!("local:{}", root.display());
        Self { root, id }
    }

    /// Directory backing this archive.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Publish (overwrite) the archive state file.
    pub async fn publish_state(&self, state: &ArchiveState) -> Result<(), HistorySyncError> {
        fs::create_dir_all(&self.root).await?;
        let body = serde_json::to_vec_pretty(state)
            .map_err(|e| HistorySyncError::MalformedRecord(e.to_string()))?;
        fs::write(self.root.join(STATE_FILE), body).await?;
        Ok(())
    }

    /// Publish one checkpoint file, gzipped when asked.
    pub async fn publish_records(
        &self,
        category: FileCategory,
        seq: u32,
        records: &[HistoryRecord],
        gzipped: bool,
    ) -> Result<(), HistorySyncError> {
        fs::create_dir_all(&self.root).await?;
        let body = encode_records(records)?;
        let (name, blob) = if gzipped {
            (format!("{}.gz", category.file_name(seq)), gzip_bytes(&body))
        } else {
            (category.file_name(seq), body)
        };
        fs::write(self.root.join(name), blob).await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryArchive for LocalDirArchive {
    async fn get_state(&self) -> Result<ArchiveState, HistorySyncError> {
        let path = self.root.join(STATE_FILE);
        let body = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HistorySyncError::NotFound(STATE_FILE.into())
            } else {
                HistorySyncError::Io(e)
            }
        })?;
        serde_json::from_slice(&body)
            .map_err(|e| HistorySyncError::MalformedRecord(e.to_string()))
    }

    async fn get_file(
        &self,
        category: FileCategory,
        seq: u32,
    ) -> Result<Vec<u8>, HistorySyncError> {
        // Prefer the gzipped form when both exist.
        let gz = self.root.join(format!("{}.gz", category.file_name(seq)));
        match fs::read(&gz).await {
            Ok(blob) => return Ok(blob),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(HistorySyncError::Io(e)),
        }
        let plain = self.root.join(category.file_name(seq));
        fs::read(&plain).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HistorySyncError::NotFound(category.file_name(seq))
            } else {
                HistorySyncError::Io(e)
            }
        })
    }

    async fn list(&self, category: FileCategory) -> Result<Vec<u32>, HistorySyncError> {
        let mut seqs = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(seqs),
            Err(e) => return Err(HistorySyncError::Io(e)),
        };
        let prefix = format!("{}-", category.prefix());
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let hex = rest.trim_end_matches(".gz").trim_end_matches(".bin");
            if let Ok(seq) = u32::from_str_radix(hex, 16) {
                seqs.push(seq);
            }
        }
        seqs.sort_unstable();
        seqs.dedup();
        Ok(seqs)
    }

    fn archive_id(&self) -> &str {
        &self.id
    }
}
