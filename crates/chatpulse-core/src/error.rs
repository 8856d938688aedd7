//! Error types shared across chatpulse-core.

use thiserror::Error;

/// Failure reported by a [`RecordStore`](crate::store::RecordStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A writer panicked while holding the store lock.
    #[error("{0} store lock poisoned")]
    Poisoned(&'static str),
    /// A persisted row could not be mapped back to a record.
    #[error("corrupt row in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },
}

/// Failure of a single ingestion call. Only storage failures surface here;
/// alert, export and enrichment failures are recovered locally.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to persist record: {0}")]
    Store(#[from] StoreError),
    /// The blocking task running the append panicked or was cancelled.
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failure appending a row to the export sink.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("export sink unavailable: {0}")]
    Unavailable(String),
}

/// Failure of the remote enrichment call.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("enrichment request failed: {0}")]
    Transport(String),
    #[error("enrichment service returned status {0}")]
    Status(u16),
    #[error("malformed enrichment response: {0}")]
    Malformed(String),
}
