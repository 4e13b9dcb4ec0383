//! # Adapters
//!
//! Concrete implementations behind the port boundary: run-scoped staging
//! directories, gzip handling for archive blobs, and a local-directory
//! archive used for offline mirrors and integration tests.

mod compress;
mod local_dir;
mod staging;

pub use compress::{gzip_bytes, is_gzipped, maybe_gunzip};
pub use local_dir::LocalDirArchive;
pub use staging::StagingDir;
