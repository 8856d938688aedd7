//! JSON-lines inbound feed.
//!
//! Each non-blank line is one [`InboundEvent`]. Bytes that are not valid
//! UTF-8 are replaced with U+FFFD before parsing, so one corrupt line never
//! ends the feed. Lines that do not parse are logged and skipped; an event
//! whose ingestion fails is logged and counted, and the feed moves on to the
//! next line. The pump returns when the reader reaches EOF and every
//! background enrichment it started has resolved.

use chatpulse_core::{Coordinator, Enrichment, InboundEvent, IngestOutcome};
use std::borrow::Cow;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Non-blank lines read.
    pub lines: usize,
    /// Events that produced a stored record.
    pub recorded: usize,
    /// Well-formed events that produced no record.
    pub dropped: usize,
    /// Lines that were not a valid event.
    pub malformed: usize,
    /// Events whose record could not be persisted.
    pub failed: usize,
    /// Background enrichments that resolved, neutral fallbacks included.
    pub enriched: usize,
}

/// Parse one feed line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<InboundEvent>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Read events from `reader` until EOF and hand each to `coordinator`.
pub async fn pump<R>(reader: R, coordinator: &Coordinator) -> Result<FeedStats, FeedError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut pending: Vec<JoinHandle<Enrichment>> = Vec::new();
    let mut stats = FeedStats::default();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if let Cow::Owned(_) = line {
            tracing::debug!(line = stats.lines + 1, "replaced invalid UTF-8 in feed line");
        }

        let event = match parse_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                stats.lines += 1;
                stats.malformed += 1;
                tracing::warn!(error = %e, "skipping malformed feed line");
                continue;
            }
        };
        stats.lines += 1;

        match coordinator.handle(event).await {
            Ok(IngestOutcome::Dropped) => stats.dropped += 1,
            Ok(IngestOutcome::Message(outcome)) => {
                stats.recorded += 1;
                pending.extend(outcome.enrichment);
            }
            Ok(IngestOutcome::Membership(_)) => stats.recorded += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::error!(error = %e, "event not recorded");
            }
        }

        let (done, running): (Vec<_>, Vec<_>) =
            pending.drain(..).partition(JoinHandle::is_finished);
        pending = running;
        for handle in done {
            reap(handle, &mut stats).await;
        }
    }

    for handle in pending {
        reap(handle, &mut stats).await;
    }

    tracing::info!(
        lines = stats.lines,
        recorded = stats.recorded,
        dropped = stats.dropped,
        malformed = stats.malformed,
        failed = stats.failed,
        enriched = stats.enriched,
        "feed finished"
    );
    Ok(stats)
}

/// The coordinator logs each result; the feed only counts it.
async fn reap(handle: JoinHandle<Enrichment>, stats: &mut FeedStats) {
    match handle.await {
        Ok(_) => stats.enriched += 1,
        Err(e) => tracing::warn!(error = %e, "enrichment task did not complete"),
    }
}
