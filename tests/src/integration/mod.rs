//! End-to-end history sync scenarios.

mod cancellation;
mod fetch_qsets;
