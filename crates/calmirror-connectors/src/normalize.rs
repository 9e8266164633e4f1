//! RawSourceEvent to CanonicalEvent conversion.
//!
//! The normalizer interprets the naive wall-clock components of a raw event
//! in the configured IANA timezone and converts to UTC, so the result is
//! identical on every run regardless of the process's local timezone. Times
//! are truncated to whole seconds before conversion; the diff engine then
//! compares instants exactly.

use chrono::offset::LocalResult;
use chrono::{NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::warn;

use calmirror_core::CanonicalEvent;

use crate::connector::SourceSnapshot;
use crate::raw_event::RawSourceEvent;

/// Why a single raw event could not be normalized.
///
/// These are per-item failures: the event is skipped and counted, the cycle
/// continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// Whole-day events are out of scope for reconciliation.
    #[error("whole-day events are not synced")]
    AllDay,

    /// The wall-clock time does not exist in the source timezone (it falls
    /// in a daylight-saving gap).
    #[error("local time {0} does not exist in the source timezone")]
    NonexistentLocalTime(NaiveDateTime),

    /// The event would have a zero or negative duration after conversion.
    #[error("event start is not before its end")]
    EmptyRange,
}

/// Result of normalizing a full source snapshot.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    /// Normalized events, in source order.
    pub events: Vec<CanonicalEvent>,
    /// Skips: connector-side field-read failures plus normalizer rejects.
    pub skipped: usize,
}

/// Normalizes one raw event against the source timezone.
///
/// Ambiguous wall-clock times (the repeated hour when daylight saving ends)
/// resolve to the earlier of the two instants. Times inside a
/// daylight-saving gap have no instant to map to and are rejected.
pub fn normalize_event(raw: &RawSourceEvent, tz: Tz) -> Result<CanonicalEvent, NormalizeError> {
    if raw.all_day {
        return Err(NormalizeError::AllDay);
    }

    let start = resolve_local(truncate_to_seconds(raw.start), tz)?;
    let end = resolve_local(truncate_to_seconds(raw.end), tz)?;

    if start >= end {
        return Err(NormalizeError::EmptyRange);
    }

    Ok(CanonicalEvent {
        source_id: raw.id.clone(),
        subject: raw.subject.clone(),
        location: raw.location.clone().unwrap_or_default(),
        description: raw.body.clone().unwrap_or_default(),
        start,
        end,
    })
}

/// Normalizes a source snapshot, folding connector-side skips and
/// normalizer rejects into one counter.
pub fn normalize_events(snapshot: &SourceSnapshot, tz: Tz) -> NormalizedBatch {
    let mut batch = NormalizedBatch {
        events: Vec::with_capacity(snapshot.events.len()),
        skipped: snapshot.skipped,
    };

    for raw in &snapshot.events {
        match normalize_event(raw, tz) {
            Ok(event) => batch.events.push(event),
            Err(reason) => {
                batch.skipped += 1;
                warn!(id = %raw.id, subject = %raw.subject, %reason, "skipping source event");
            }
        }
    }

    batch
}

fn truncate_to_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

fn resolve_local(
    naive: NaiveDateTime,
    tz: Tz,
) -> Result<chrono::DateTime<Utc>, NormalizeError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        // Repeated hour at the end of daylight saving: take the earlier
        // instant so the same wall-clock input maps the same way every run.
        LocalResult::Ambiguous(earliest, _latest) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(NormalizeError::NonexistentLocalTime(naive)),
    }
}
