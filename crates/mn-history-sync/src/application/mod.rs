//! # Application Layer
//!
//! The service facade wiring scheduler, works, and the shared inference
//! engine together.

mod service;

pub use service::HistorySyncService;
