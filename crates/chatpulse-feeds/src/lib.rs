//! chatpulse-feeds — adapters between chatpulse-core and the outside world.
//!
//! Each module implements one collaborator interface from
//! [`chatpulse_core::sinks`], or (for [`jsonl`]) drives a
//! [`Coordinator`](chatpulse_core::Coordinator) from an inbound byte stream.

pub mod alerts;
pub mod enrich;
pub mod export;
pub mod jsonl;
pub mod privilege;

pub use alerts::{LogAlertSink, WebhookAlertSink};
pub use enrich::HttpEnricher;
pub use export::JsonlExportSink;
pub use jsonl::{pump, FeedError, FeedStats};
pub use privilege::StaticPrivilegeSource;
