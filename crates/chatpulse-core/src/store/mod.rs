//! Store — append-only persistence of [`MessageRecord`] and [`MembershipEvent`] values.
//!
//! The store is the single shared mutable resource: the ingestion path
//! appends, the aggregator reads. Backends are interchangeable and chosen once
//! at startup with [`open`]; business logic only ever sees `dyn RecordStore`.
//!
//! # Read semantics
//!
//! Every backend returns all records in append order, with no duplication and
//! no omission. An append that has returned is visible to every read that
//! starts afterwards. A read running concurrently with an append may or may
//! not observe it, but never observes a partial record.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{BackendKind, StorageConfig};
use crate::error::StoreError;
use crate::types::{MembershipEvent, MessageRecord};
use std::sync::Arc;

/// Append-only storage for the two record kinds.
pub trait RecordStore: Send + Sync {
    /// Persist one message record. Durable backends commit before returning.
    fn append_message(&self, record: &MessageRecord) -> Result<(), StoreError>;

    /// Persist one membership event.
    fn append_membership_event(&self, event: &MembershipEvent) -> Result<(), StoreError>;

    /// All message records, in append order.
    fn list_messages(&self) -> Result<Vec<MessageRecord>, StoreError>;

    /// All membership events, in append order.
    fn list_membership_events(&self) -> Result<Vec<MembershipEvent>, StoreError>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}

/// Open the backend selected by `[storage].backend`.
pub fn open(config: &StorageConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    let store: Arc<dyn RecordStore> = match config.backend {
        BackendKind::Memory => Arc::new(MemoryStore::new()),
        BackendKind::Sqlite => Arc::new(SqliteStore::open(&config.path, config.busy_timeout())?),
    };
    tracing::info!(backend = store.backend_name(), "record store opened");
    Ok(store)
}
