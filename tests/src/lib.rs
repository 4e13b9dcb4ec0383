//! # Meridian Test Suite
//!
//! Unified test crate for cross-crate scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # End-to-end history sync runs
//!     ├── fetch_qsets.rs
//!     └── cancellation.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mn-tests
//! cargo test -p mn-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;

/// Initialize test logging once; safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
