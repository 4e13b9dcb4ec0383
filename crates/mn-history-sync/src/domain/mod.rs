//! # Domain Layer
//!
//! Core history-archive types and errors. No I/O here.

mod archive;
mod checkpoint;
mod errors;

pub use archive::{ArchiveState, FileCategory};
pub use checkpoint::CheckpointRange;
pub use errors::HistorySyncError;
