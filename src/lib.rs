//! chatpulse — chat analytics.
//!
//! Ingests chat events, classifies them (profanity, hashtags, membership
//! transitions), persists them in a memory or SQLite record store, and
//! serves aggregate statistics. This crate wires the workspace members
//! together so that the binary and the integration tests build the exact
//! same object graph.
//!
//! # Architecture
//!
//! ```text
//! JSON-lines feed ──► Coordinator ──► RecordStore ◄── Aggregator ──► /dashboard
//!                         │
//!                         └──► alerts / export / enrichment
//! ```

pub mod app;

pub use app::App;
pub use chatpulse_core;
pub use chatpulse_dashboard;
pub use chatpulse_feeds;
