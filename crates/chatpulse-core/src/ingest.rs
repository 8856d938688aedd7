//! Ingestion coordinator — turns inbound events into stored records.
//!
//! # Message path
//!
//! ```text
//! text ─► classify ─► append ─► export row ─► alert? ─► enrichment task?
//!                       │
//!                       └─ failure: IngestError, nothing else runs
//! ```
//!
//! Appends run on the blocking pool, since durable backends wait on a lock
//! and the disk; the call still returns only once the record is stored.
//! The append is the only step whose failure reaches the caller. Export and
//! alert failures are logged. Enrichment is spawned onto the runtime with a
//! timeout and never awaited here; its [`JoinHandle`] is handed back so a
//! caller can join it opportunistically.
//!
//! # Membership path
//!
//! The status pair is classified; unrecognised pairs are a silent no-op.

use crate::classifier::{classify_membership_transition, extract_hashtags, ProfanityFilter};
use crate::error::IngestError;
use crate::sinks::{AlertSink, Enricher, ExportSink, PrivilegeSource};
use crate::store::RecordStore;
use crate::types::{
    Enrichment, EventPayload, InboundEvent, MemberStatus, MembershipEvent, MessageRecord,
    PrivilegeTier,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Alert text used when `[alerts].template` is not set.
pub const DEFAULT_ALERT_TEMPLATE: &str = "Please keep it civil, {user}.";
const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Who sent an event and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
}

/// What happened to one inbound event.
#[derive(Debug)]
pub enum IngestOutcome {
    Message(MessageOutcome),
    Membership(MembershipEvent),
    /// Nothing was recorded: a message without text or an unrecognised
    /// status transition.
    Dropped,
}

#[derive(Debug)]
pub struct MessageOutcome {
    pub record: MessageRecord,
    /// An alert was handed to the alert sink.
    pub alerted: bool,
    /// Background enrichment, present only for premium senders when an
    /// enricher is configured. Always resolves; failures become
    /// [`Enrichment::neutral`].
    pub enrichment: Option<JoinHandle<Enrichment>>,
}

pub struct Coordinator {
    store: Arc<dyn RecordStore>,
    profanity: ProfanityFilter,
    privilege: Arc<dyn PrivilegeSource>,
    alerts: Arc<dyn AlertSink>,
    alert_template: String,
    export: Option<Arc<dyn ExportSink>>,
    enricher: Option<Arc<dyn Enricher>>,
    enrichment_timeout: Duration,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        profanity: ProfanityFilter,
        privilege: Arc<dyn PrivilegeSource>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            store,
            profanity,
            privilege,
            alerts,
            alert_template: DEFAULT_ALERT_TEMPLATE.to_string(),
            export: None,
            enricher: None,
            enrichment_timeout: DEFAULT_ENRICHMENT_TIMEOUT,
        }
    }

    /// Alert text; `{user}` is replaced by `@username` (or the user id).
    pub fn with_alert_template(mut self, template: impl Into<String>) -> Self {
        self.alert_template = template.into();
        self
    }

    pub fn with_export(mut self, export: Arc<dyn ExportSink>) -> Self {
        self.export = Some(export);
        self
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>, timeout: Duration) -> Self {
        self.enricher = Some(enricher);
        self.enrichment_timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Route one inbound event to the message or membership path.
    pub async fn handle(&self, event: InboundEvent) -> Result<IngestOutcome, IngestError> {
        let sender = Sender {
            chat_id: event.chat_id,
            user_id: event.user_id,
            username: event.username,
        };
        match event.payload {
            EventPayload::Message { text: Some(text) } => Ok(self
                .ingest_message(sender, text)
                .await?
                .map_or(IngestOutcome::Dropped, IngestOutcome::Message)),
            EventPayload::Message { text: None } => {
                debug!(chat_id = sender.chat_id, "dropping message without text");
                Ok(IngestOutcome::Dropped)
            }
            EventPayload::MemberUpdate {
                old_status,
                new_status,
            } => Ok(self
                .ingest_membership(sender, old_status, new_status)
                .await?
                .map_or(IngestOutcome::Dropped, IngestOutcome::Membership)),
        }
    }

    /// Classify, persist and fan out one text message.
    ///
    /// Returns `Ok(None)` for empty text. Must be called from within a tokio
    /// runtime.
    pub async fn ingest_message(
        &self,
        sender: Sender,
        text: String,
    ) -> Result<Option<MessageOutcome>, IngestError> {
        if text.is_empty() {
            debug!(chat_id = sender.chat_id, "dropping empty message");
            return Ok(None);
        }

        let chat_id = sender.chat_id;
        let record = MessageRecord {
            timestamp: Utc::now(),
            chat_id: sender.chat_id,
            user_id: sender.user_id,
            username: sender.username,
            profane: self.profanity.detect(&text),
            hashtags: extract_hashtags(&text),
            text,
        };

        let store = Arc::clone(&self.store);
        let record = tokio::task::spawn_blocking(move || {
            store.append_message(&record).map(|()| record)
        })
        .await?
        .map_err(|e| {
            error!(
                backend = self.store.backend_name(),
                chat_id,
                error = %e,
                "failed to persist message"
            );
            e
        })?;
        debug!(
            chat_id = record.chat_id,
            user_id = record.user_id,
            profane = record.profane,
            hashtags = record.hashtags.len(),
            "message recorded"
        );

        self.export_row(&record);

        let tier = PrivilegeTier::from_premium(self.privilege.is_premium(record.user_id));

        let alerted = record.profane && tier.is_premium();
        if alerted {
            let text = self.alert_text(&record);
            info!(chat_id = record.chat_id, user_id = record.user_id, "profanity alert");
            self.alerts.send_alert(record.chat_id, &text);
        }

        let enrichment = match (&self.enricher, tier) {
            (Some(enricher), PrivilegeTier::Premium) => Some(spawn_enrichment(
                Arc::clone(enricher),
                &record,
                self.enrichment_timeout,
            )),
            _ => None,
        };

        Ok(Some(MessageOutcome {
            record,
            alerted,
            enrichment,
        }))
    }

    /// Record a membership transition if `(previous, new)` is a recognised
    /// join or leave.
    pub async fn ingest_membership(
        &self,
        sender: Sender,
        previous: MemberStatus,
        new: MemberStatus,
    ) -> Result<Option<MembershipEvent>, IngestError> {
        let Some(kind) = classify_membership_transition(previous, new) else {
            debug!(
                chat_id = sender.chat_id,
                %previous,
                %new,
                "status change is not a join or leave"
            );
            return Ok(None);
        };

        let event = MembershipEvent {
            timestamp: Utc::now(),
            chat_id: sender.chat_id,
            user_id: sender.user_id,
            username: sender.username,
            kind,
        };

        let chat_id = event.chat_id;
        let store = Arc::clone(&self.store);
        let event = tokio::task::spawn_blocking(move || {
            store.append_membership_event(&event).map(|()| event)
        })
        .await?
        .map_err(|e| {
            error!(
                backend = self.store.backend_name(),
                chat_id,
                error = %e,
                "failed to persist membership event"
            );
            e
        })?;
        debug!(chat_id = event.chat_id, user_id = event.user_id, %kind, "membership recorded");

        Ok(Some(event))
    }

    fn alert_text(&self, record: &MessageRecord) -> String {
        let who = record
            .username
            .as_deref()
            .map(|u| format!("@{u}"))
            .unwrap_or_else(|| record.user_id.to_string());
        self.alert_template.replace("{user}", &who)
    }

    fn export_row(&self, record: &MessageRecord) {
        let Some(export) = &self.export else {
            return;
        };
        if let Err(e) = export.append_row(&export_fields(record)) {
            warn!(chat_id = record.chat_id, error = %e, "export row failed");
        }
    }
}

/// Export row layout: timestamp, chat, user, username, event type, text, profane.
pub fn export_fields(record: &MessageRecord) -> Vec<String> {
    vec![
        record.timestamp.to_rfc3339(),
        record.chat_id.to_string(),
        record.user_id.to_string(),
        record.username.clone().unwrap_or_default(),
        "message".to_string(),
        record.text.clone(),
        record.profane.to_string(),
    ]
}

/// The result is advisory: it is logged here and handed back through the
/// handle, but never written to the record store.
fn spawn_enrichment(
    enricher: Arc<dyn Enricher>,
    record: &MessageRecord,
    timeout: Duration,
) -> JoinHandle<Enrichment> {
    let (chat_id, user_id) = (record.chat_id, record.user_id);
    let text = record.text.clone();
    tokio::spawn(async move {
        let enrichment = match tokio::time::timeout(timeout, enricher.analyze(&text)).await {
            Ok(Ok(enrichment)) => enrichment,
            Ok(Err(e)) => {
                warn!(chat_id, user_id, error = %e, "enrichment failed, using neutral result");
                Enrichment::neutral()
            }
            Err(_) => {
                warn!(
                    chat_id,
                    user_id,
                    timeout_ms = timeout.as_millis() as u64,
                    "enrichment timed out, using neutral result"
                );
                Enrichment::neutral()
            }
        };
        info!(
            chat_id,
            user_id,
            sentiment = %enrichment.sentiment,
            keywords = ?enrichment.keywords,
            "message enriched"
        );
        enrichment
    })
}
