//! Core types for chatpulse-core.
//!
//! This module defines the records persisted by the [`RecordStore`](crate::store::RecordStore),
//! the inbound event shape delivered by the chat transport, and the small
//! value types exchanged with external collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One observed chat message, classified at ingest time.
///
/// Records are immutable once built. `hashtags` is always the result of
/// [`extract_hashtags`](crate::classifier::extract_hashtags) applied to `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Ingest time (UTC).
    pub timestamp: DateTime<Utc>,
    pub chat_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    /// Message body exactly as delivered by the transport.
    pub text: String,
    /// True when `text` contains a denylisted token.
    pub profane: bool,
    /// Lower-cased hashtags found in `text`.
    pub hashtags: BTreeSet<String>,
}

/// A recognised membership transition for one user in one chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipEvent {
    pub timestamp: DateTime<Utc>,
    pub chat_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub kind: MembershipKind,
}

/// Direction of a membership transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipKind {
    Join,
    Leave,
}

impl MembershipKind {
    /// Stable lowercase name, used as the persisted column value.
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipKind::Join => "join",
            MembershipKind::Leave => "leave",
        }
    }
}

impl std::fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MembershipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "join" => Ok(MembershipKind::Join),
            "leave" => Ok(MembershipKind::Leave),
            other => Err(format!("unknown membership kind: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Member status
// ---------------------------------------------------------------------------

/// Chat-member status as reported by the transport.
///
/// Only `Member`, `Left` and `Kicked` take part in transition
/// classification. Any status string the transport invents later maps to
/// `Unknown` instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
    Unknown,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Creator => "creator",
            MemberStatus::Administrator => "administrator",
            MemberStatus::Member => "member",
            MemberStatus::Restricted => "restricted",
            MemberStatus::Left => "left",
            MemberStatus::Kicked => "kicked",
            MemberStatus::Unknown => "unknown",
        }
    }
}

impl From<&str> for MemberStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "creator" | "owner" => MemberStatus::Creator,
            "administrator" => MemberStatus::Administrator,
            "member" => MemberStatus::Member,
            "restricted" => MemberStatus::Restricted,
            "left" => MemberStatus::Left,
            "kicked" | "banned" => MemberStatus::Kicked,
            _ => MemberStatus::Unknown,
        }
    }
}

impl From<String> for MemberStatus {
    fn from(s: String) -> Self {
        MemberStatus::from(s.as_str())
    }
}

impl From<MemberStatus> for String {
    fn from(status: MemberStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Privilege
// ---------------------------------------------------------------------------

/// Access level of the user that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrivilegeTier {
    #[default]
    Standard,
    Premium,
}

impl PrivilegeTier {
    pub fn from_premium(is_premium: bool) -> Self {
        if is_premium {
            PrivilegeTier::Premium
        } else {
            PrivilegeTier::Standard
        }
    }

    pub fn is_premium(self) -> bool {
        self == PrivilegeTier::Premium
    }
}

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// A raw event as delivered by the chat transport.
///
/// On the wire this is a flat JSON object discriminated by `kind`:
///
/// ```json
/// {"kind":"message","chat_id":-100,"user_id":7,"username":"ana","text":"hi #rust"}
/// {"kind":"member_update","chat_id":-100,"user_id":7,"old_status":"left","new_status":"member"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub chat_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

/// Payload of an [`InboundEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// A message. `text` is `None` for stickers, photos and other non-text
    /// message types.
    Message {
        #[serde(default)]
        text: Option<String>,
    },
    /// A chat-member status change.
    MemberUpdate {
        old_status: MemberStatus,
        new_status: MemberStatus,
    },
}

impl InboundEvent {
    pub fn message(
        chat_id: i64,
        user_id: i64,
        username: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            chat_id,
            user_id,
            username,
            payload: EventPayload::Message {
                text: Some(text.into()),
            },
        }
    }

    pub fn member_update(
        chat_id: i64,
        user_id: i64,
        username: Option<String>,
        old_status: MemberStatus,
        new_status: MemberStatus,
    ) -> Self {
        Self {
            chat_id,
            user_id,
            username,
            payload: EventPayload::MemberUpdate {
                old_status,
                new_status,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Result of the remote text-analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub keywords: Vec<String>,
    pub sentiment: String,
}

impl Enrichment {
    /// The local fallback used whenever the remote call fails or times out.
    pub fn neutral() -> Self {
        Self {
            keywords: Vec::new(),
            sentiment: "neutral".to_string(),
        }
    }
}

impl Default for Enrichment {
    fn default() -> Self {
        Self::neutral()
    }
}
