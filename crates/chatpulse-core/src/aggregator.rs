//! Aggregator — read-side summary views over the record store.
//!
//! Every view is computed from a fresh `list_*` snapshot, so aggregation can
//! run at any time while the ingestion path is appending. Results are
//! eventually consistent, not snapshot-isolated across calls; use
//! [`Aggregator::summary`] when a single consistent view is needed.
//!
//! # Ranking and ties
//!
//! Leaderboards are sorted by count, descending. Entries with equal counts
//! keep the order in which their key was *first seen* while scanning the
//! store (which is append order). This is stable and deterministic for a
//! given store content, but it is not lexicographic; callers that need a
//! content-independent tie-break must re-sort.

use crate::classifier::extract_hashtags;
use crate::error::StoreError;
use crate::store::RecordStore;
use crate::types::{MembershipEvent, MembershipKind, MessageRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A `(key, count)` leaderboard row.
pub type Ranked = (String, usize);

/// Plain structured summary consumed by an external dashboard renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub total_messages: usize,
    pub joins: usize,
    pub leaves: usize,
    pub profanity_leaderboard: Vec<Ranked>,
    pub top_hashtags: Vec<Ranked>,
}

pub struct Aggregator {
    store: Arc<dyn RecordStore>,
    unknown_username: String,
}

impl Aggregator {
    /// `unknown_username` labels profane messages whose sender has no username.
    pub fn new(store: Arc<dyn RecordStore>, unknown_username: impl Into<String>) -> Self {
        Self {
            store,
            unknown_username: unknown_username.into(),
        }
    }

    pub fn total_message_count(&self) -> Result<usize, StoreError> {
        Ok(self.store.list_messages()?.len())
    }

    pub fn join_count(&self) -> Result<usize, StoreError> {
        Ok(count_kind(&self.store.list_membership_events()?, MembershipKind::Join))
    }

    pub fn leave_count(&self) -> Result<usize, StoreError> {
        Ok(count_kind(&self.store.list_membership_events()?, MembershipKind::Leave))
    }

    /// Top `n` senders of profane messages.
    pub fn profanity_leaderboard(&self, n: usize) -> Result<Vec<Ranked>, StoreError> {
        Ok(profanity_leaderboard(&self.store.list_messages()?, n, &self.unknown_username))
    }

    /// Top `n` hashtags across all messages.
    pub fn top_hashtags(&self, n: usize) -> Result<Vec<Ranked>, StoreError> {
        Ok(top_hashtags(&self.store.list_messages()?, n))
    }

    /// All views computed from one snapshot of each record kind.
    pub fn summary(&self, n: usize) -> Result<SummaryView, StoreError> {
        let messages = self.store.list_messages()?;
        let events = self.store.list_membership_events()?;
        Ok(SummaryView {
            total_messages: messages.len(),
            joins: count_kind(&events, MembershipKind::Join),
            leaves: count_kind(&events, MembershipKind::Leave),
            profanity_leaderboard: profanity_leaderboard(&messages, n, &self.unknown_username),
            top_hashtags: top_hashtags(&messages, n),
        })
    }
}

// ---------------------------------------------------------------------------
// Pure views over record slices
// ---------------------------------------------------------------------------

pub fn count_kind(events: &[MembershipEvent], kind: MembershipKind) -> usize {
    events.iter().filter(|e| e.kind == kind).count()
}

pub fn profanity_leaderboard(
    messages: &[MessageRecord],
    n: usize,
    unknown_username: &str,
) -> Vec<Ranked> {
    rank_first_seen(
        messages
            .iter()
            .filter(|m| m.profane)
            .map(|m| m.username.as_deref().unwrap_or(unknown_username)),
        n,
    )
}

/// Hashtags are re-derived from `text` rather than read from the record, so
/// the result does not depend on what a backend physically stores.
pub fn top_hashtags(messages: &[MessageRecord], n: usize) -> Vec<Ranked> {
    let tags: Vec<String> = messages
        .iter()
        .flat_map(|m| extract_hashtags(&m.text))
        .collect();
    rank_first_seen(tags.iter().map(String::as_str), n)
}

/// Count keys and return the `n` most frequent, ties in first-seen order.
pub fn rank_first_seen<'a>(keys: impl IntoIterator<Item = &'a str>, n: usize) -> Vec<Ranked> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for key in keys {
        match index.get(key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(key, count)| (key.to_string(), count))
        .collect()
}
