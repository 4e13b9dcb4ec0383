//! # Staging Directories
//!
//! An ephemeral filesystem scope owning every file downloaded during one
//! orchestrator run. The directory is physically removed when the handle
//! drops, which covers reset, cancellation, and error exits alike.

use std::path::Path;

use tracing::debug;

use crate::domain::HistorySyncError;

/// Run-scoped staging directory for downloaded checkpoint files.
pub struct StagingDir {
    dir: tempfile::TempDir,
}

impl StagingDir {
    /// Allocate a fresh staging directory under the system temp root.
    /// Failure is fatal for the run.
    pub fn create() -> Result<Self, HistorySyncError> {
        Self::create_in(None)
    }

    /// Allocate a fresh staging directory, under `root` when given.
    pub fn create_in(root: Option<&Path>) -> Result<Self, HistorySyncError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("mn-history-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| HistorySyncError::Staging(e.to_string()))?;
        debug!("[mn-history] staging directory at {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path of the directory; valid until the handle drops.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
