//! Interfaces to the collaborators the core feeds or consults.
//!
//! Concrete adapters live in `chatpulse-feeds`; the core only depends on
//! these traits so tests can substitute in-process fakes.

use crate::error::{EnrichError, ExportError};
use crate::types::Enrichment;
use async_trait::async_trait;

/// Outbound alerts to the chat transport. Fire-and-forget: implementations
/// must not block and have no way to report failure to the core.
pub trait AlertSink: Send + Sync {
    fn send_alert(&self, chat_id: i64, text: &str);
}

/// Row-oriented export sink (spreadsheet, file). Independent of the record
/// store; the coordinator logs failures and carries on.
pub trait ExportSink: Send + Sync {
    fn append_row(&self, fields: &[String]) -> Result<(), ExportError>;
}

/// Remote text analysis. Treated as unreliable; the coordinator replaces
/// every error and timeout with [`Enrichment::neutral`].
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Enrichment, EnrichError>;
}

/// External premium-membership oracle. No caching contract is assumed.
pub trait PrivilegeSource: Send + Sync {
    fn is_premium(&self, user_id: i64) -> bool;
}
