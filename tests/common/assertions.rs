//! Domain-specific assertion macros for chatpulse harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! stored records or which leaderboard the check was looking at.

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// Assert a ranked `(key, count)` list, written as `"key" => count` pairs.
///
/// ```rust
/// assert_ranked!(aggregator.top_hashtags(3)?, ["go" => 2, "rust" => 1]);
/// ```
#[macro_export]
macro_rules! assert_ranked {
    ($ranked:expr, [$($key:expr => $count:expr),* $(,)?]) => {{
        let actual: Vec<(String, usize)> = $ranked;
        let expected: Vec<(String, usize)> = vec![$(($key.to_string(), $count)),*];
        if actual != expected {
            pretty_assertions::assert_eq!(
                actual,
                expected,
                "assert_ranked! failed: leaderboard differs"
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Stored records
// ---------------------------------------------------------------------------

/// Assert that `store.list_messages()` returns exactly these texts, in order.
#[macro_export]
macro_rules! assert_texts_in_order {
    ($store:expr, [$($text:expr),* $(,)?]) => {{
        let records = $store.list_messages().expect("list_messages failed");
        let actual: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let expected: Vec<&str> = vec![$($text),*];
        pretty_assertions::assert_eq!(
            actual,
            expected,
            "assert_texts_in_order! failed for backend {:?}",
            $store.backend_name()
        );
    }};
}

/// Assert the number of stored messages and membership events.
#[macro_export]
macro_rules! assert_stored {
    ($store:expr, messages = $messages:expr, membership = $membership:expr) => {{
        let messages = $store.list_messages().expect("list_messages failed");
        let events = $store
            .list_membership_events()
            .expect("list_membership_events failed");
        assert_eq!(
            (messages.len(), events.len()),
            ($messages, $membership),
            "assert_stored! failed for backend {:?}:\n  messages: {:?}\n  membership: {:?}",
            $store.backend_name(),
            messages.iter().map(|r| &r.text).collect::<Vec<_>>(),
            events.iter().map(|e| (e.user_id, e.kind)).collect::<Vec<_>>(),
        );
    }};
}
