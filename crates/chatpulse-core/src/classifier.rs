//! Classifier — pure functions deriving signals from raw event input.
//!
//! Three independent rules:
//!
//! - [`ProfanityFilter::detect`]: case-insensitive substring match against an
//!   immutable denylist.
//! - [`extract_hashtags`]: `#` followed by one or more word characters,
//!   lower-cased and de-duplicated.
//! - [`classify_membership_transition`]: maps an ordered status pair to
//!   [`MembershipKind::Join`], [`MembershipKind::Leave`] or nothing.

use crate::types::{MemberStatus, MembershipKind};
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Tokens flagged when no denylist is configured.
pub const DEFAULT_DENYLIST: &[&str] = &["madarchod", "bhosdike", "chutiya", "gaand", "bc"];

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("hashtag pattern is a valid regex"));

// ---------------------------------------------------------------------------
// Profanity
// ---------------------------------------------------------------------------

/// Immutable, lower-cased denylist.
///
/// Matching is substring-based and not word-boundary aware, so short tokens
/// such as `bc` also match inside longer words. Empty tokens are discarded at
/// construction; an empty token would otherwise match every message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfanityFilter {
    tokens: Vec<String>,
}

impl ProfanityFilter {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        let mut seen = HashSet::new();
        tokens.retain(|t| seen.insert(t.clone()));
        Self { tokens }
    }

    /// True if any denylisted token occurs anywhere in the lower-cased text.
    pub fn detect(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        self.tokens.iter().any(|t| lowered.contains(t.as_str()))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}

/// Free-function form of [`ProfanityFilter::detect`] over the default denylist.
pub fn detect_profanity(text: &str) -> bool {
    static DEFAULT: LazyLock<ProfanityFilter> = LazyLock::new(ProfanityFilter::default);
    DEFAULT.detect(text)
}

// ---------------------------------------------------------------------------
// Hashtags
// ---------------------------------------------------------------------------

/// Extract the lower-cased set of hashtags in `text`.
///
/// Only the word-character run after `#` is captured, so `#tag!` yields
/// `tag`. A lone `#` or `#!` yields nothing.
pub fn extract_hashtags(text: &str) -> BTreeSet<String> {
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

// ---------------------------------------------------------------------------
// Membership transitions
// ---------------------------------------------------------------------------

/// Classify a `(previous, new)` status pair.
///
/// Join iff previous is `Left`/`Kicked` and new is `Member`; Leave iff
/// previous is `Member` and new is `Left`/`Kicked`. Every other pair,
/// including those through `Restricted` or `Administrator`, yields `None`.
pub fn classify_membership_transition(
    previous: MemberStatus,
    new: MemberStatus,
) -> Option<MembershipKind> {
    use MemberStatus::{Kicked, Left, Member};

    match (previous, new) {
        (Left | Kicked, Member) => Some(MembershipKind::Join),
        (Member, Left | Kicked) => Some(MembershipKind::Leave),
        _ => None,
    }
}
