//! Durable backend: two SQLite tables mirroring the record types 1:1.
//!
//! Every append is a single autocommitted `INSERT`, so it is on disk before
//! the call returns. There is no batching. Hashtags are not persisted; they
//! are re-derived from `text` on read.

use super::RecordStore;
use crate::classifier::extract_hashtags;
use crate::error::StoreError;
use crate::types::{MembershipEvent, MembershipKind, MessageRecord};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS messages (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT    NOT NULL,
    chat_id   INTEGER NOT NULL,
    user_id   INTEGER NOT NULL,
    username  TEXT,
    text      TEXT    NOT NULL,
    profane   INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS membership_events (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT    NOT NULL,
    chat_id   INTEGER NOT NULL,
    user_id   INTEGER NOT NULL,
    username  TEXT,
    kind      TEXT    NOT NULL
);
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// `busy_timeout` bounds how long a write waits on a lock held by another
    /// connection before failing.
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(path = %path.display(), journal_mode = %mode, "sqlite store opened");
        Self::init(conn, busy_timeout)
    }

    /// A private in-memory database. Same semantics as a file, minus durability.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, Duration::from_secs(2))
    }

    fn init(conn: Connection, busy_timeout: Duration) -> Result<Self, StoreError> {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned("sqlite"))
    }
}

impl RecordStore for SqliteStore {
    fn append_message(&self, record: &MessageRecord) -> Result<(), StoreError> {
        self.lock()?.execute(
            "INSERT INTO messages (timestamp, chat_id, user_id, username, text, profane)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.timestamp,
                record.chat_id,
                record.user_id,
                record.username,
                record.text,
                record.profane,
            ],
        )?;
        Ok(())
    }

    fn append_membership_event(&self, event: &MembershipEvent) -> Result<(), StoreError> {
        self.lock()?.execute(
            "INSERT INTO membership_events (timestamp, chat_id, user_id, username, kind)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.timestamp,
                event.chat_id,
                event.user_id,
                event.username,
                event.kind.as_str(),
            ],
        )?;
        Ok(())
    }

    fn list_messages(&self) -> Result<Vec<MessageRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT timestamp, chat_id, user_id, username, text, profane
             FROM messages ORDER BY id",
        )?;
        let records = stmt
            .query_map([], |row| {
                let text: String = row.get(4)?;
                Ok(MessageRecord {
                    timestamp: row.get(0)?,
                    chat_id: row.get(1)?,
                    user_id: row.get(2)?,
                    username: row.get(3)?,
                    hashtags: extract_hashtags(&text),
                    text,
                    profane: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn list_membership_events(&self) -> Result<Vec<MembershipEvent>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT timestamp, chat_id, user_id, username, kind
             FROM membership_events ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, DateTime<Utc>>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(timestamp, chat_id, user_id, username, kind)| -> Result<_, StoreError> {
                let kind: MembershipKind = kind.parse().map_err(|reason| StoreError::Corrupt {
                    table: "membership_events",
                    reason,
                })?;
                Ok(MembershipEvent {
                    timestamp,
                    chat_id,
                    user_id,
                    username,
                    kind,
                })
            })
            .collect()
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
