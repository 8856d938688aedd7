//! In-process fakes for the collaborators the coordinator talks to.
//!
//! Every fake records what it was asked to do so harnesses can assert on
//! side effects without a network or a chat transport.

use async_trait::async_trait;
use chatpulse_core::sinks::{AlertSink, Enricher, ExportSink};
use chatpulse_core::store::RecordStore;
use chatpulse_core::{
    EnrichError, Enrichment, ExportError, MembershipEvent, MessageRecord, StoreError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Collects every `(chat_id, text)` alert.
#[derive(Default)]
pub struct RecordingAlerts {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingAlerts {
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl AlertSink for RecordingAlerts {
    fn send_alert(&self, chat_id: i64, text: &str) {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Collects every exported row.
#[derive(Default)]
pub struct RecordingExport {
    rows: Mutex<Vec<Vec<String>>>,
}

impl RecordingExport {
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }
}

impl ExportSink for RecordingExport {
    fn append_row(&self, fields: &[String]) -> Result<(), ExportError> {
        self.rows.lock().unwrap().push(fields.to_vec());
        Ok(())
    }
}

/// Rejects every row, counting attempts.
#[derive(Default)]
pub struct FailingExport {
    pub attempts: AtomicUsize,
}

impl ExportSink for FailingExport {
    fn append_row(&self, _fields: &[String]) -> Result<(), ExportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ExportError::Unavailable("sheet quota exceeded".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Scripted enricher.
pub enum FakeEnricher {
    /// Resolve immediately with the given result.
    Ready(Enrichment),
    /// Resolve with `result` after `delay`.
    Slow { delay: Duration, result: Enrichment },
    /// Fail immediately.
    Broken,
}

impl FakeEnricher {
    pub fn positive() -> Self {
        FakeEnricher::Ready(Enrichment {
            keywords: vec!["launch".to_string()],
            sentiment: "positive".to_string(),
        })
    }

    pub fn hanging() -> Self {
        FakeEnricher::Slow {
            delay: Duration::from_secs(3600),
            result: Enrichment {
                keywords: vec!["late".to_string()],
                sentiment: "negative".to_string(),
            },
        }
    }
}

#[async_trait]
impl Enricher for FakeEnricher {
    async fn analyze(&self, _text: &str) -> Result<Enrichment, EnrichError> {
        match self {
            FakeEnricher::Ready(result) => Ok(result.clone()),
            FakeEnricher::Slow { delay, result } => {
                tokio::time::sleep(*delay).await;
                Ok(result.clone())
            }
            FakeEnricher::Broken => Err(EnrichError::Transport("connection reset".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// A store whose writes always fail and whose reads are always empty.
#[derive(Default)]
pub struct FailingStore;

impl RecordStore for FailingStore {
    fn append_message(&self, _record: &MessageRecord) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    fn append_membership_event(&self, _event: &MembershipEvent) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    fn list_messages(&self) -> Result<Vec<MessageRecord>, StoreError> {
        Ok(Vec::new())
    }

    fn list_membership_events(&self) -> Result<Vec<MembershipEvent>, StoreError> {
        Ok(Vec::new())
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// A memory store whose appends block the calling thread for `delay`,
/// like a durable backend waiting on its lock or the disk.
pub struct BlockingStore {
    inner: chatpulse_core::store::MemoryStore,
    delay: Duration,
}

impl BlockingStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: chatpulse_core::store::MemoryStore::new(),
            delay,
        }
    }
}

impl RecordStore for BlockingStore {
    fn append_message(&self, record: &MessageRecord) -> Result<(), StoreError> {
        std::thread::sleep(self.delay);
        self.inner.append_message(record)
    }

    fn append_membership_event(&self, event: &MembershipEvent) -> Result<(), StoreError> {
        std::thread::sleep(self.delay);
        self.inner.append_membership_event(event)
    }

    fn list_messages(&self) -> Result<Vec<MessageRecord>, StoreError> {
        self.inner.list_messages()
    }

    fn list_membership_events(&self) -> Result<Vec<MembershipEvent>, StoreError> {
        self.inner.list_membership_events()
    }

    fn backend_name(&self) -> &'static str {
        "blocking"
    }
}
