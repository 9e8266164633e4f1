//! The bounded time interval considered by a reconciliation cycle.
//!
//! Both the source and the mirror snapshot are fetched restricted to a
//! [`SyncWindow`]; anything outside it is never considered and is left
//! untouched by the cycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A closed time interval `[start, end]` in UTC.
///
/// Unlike the usual half-open query range, the window is inclusive at both
/// ends: an event touching either boundary instant is still in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (inclusive).
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    /// Creates a new sync window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "SyncWindow start must be <= end");
        Self { start, end }
    }

    /// Creates a window of `[now - lookback, now + lookahead]`.
    pub fn around(now: DateTime<Utc>, lookback: Duration, lookahead: Duration) -> Self {
        Self::new(now - lookback, now + lookahead)
    }

    /// Returns the total length of the window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks whether an instant falls within the window (bounds included).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Checks whether an event with the given start and end instants
    /// overlaps the window.
    pub fn overlaps(&self, event_start: DateTime<Utc>, event_end: DateTime<Utc>) -> bool {
        event_start <= self.end && event_end >= self.start
    }
}
