//! chatpulse-core — chat event ingestion, classification and aggregation.
//!
//! # Architecture
//!
//! ```text
//! InboundEvent ──► Coordinator ──► Classifier
//!                      │
//!                      ├──► RecordStore (memory | sqlite) ◄── Aggregator ──► SummaryView
//!                      │
//!                      └──► AlertSink / ExportSink / Enricher
//! ```
//!
//! The ingestion path and the query path share nothing but the
//! [`RecordStore`](store::RecordStore), injected as `Arc<dyn RecordStore>`.

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod ingest;
pub mod sinks;
pub mod store;
pub mod types;

pub use aggregator::{Aggregator, SummaryView};
pub use error::{EnrichError, ExportError, IngestError, StoreError};
pub use ingest::{Coordinator, IngestOutcome, MessageOutcome, Sender};
pub use types::{
    Enrichment, EventPayload, InboundEvent, MemberStatus, MembershipEvent, MembershipKind,
    MessageRecord, PrivilegeTier,
};
