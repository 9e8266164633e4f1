//! Canonical and mirror-side event representations.
//!
//! A [`CanonicalEvent`] is the normalizer's output: source truth with a
//! resolved absolute time range and a stable identity. A [`MirrorEvent`] is
//! what the mirror connector reports back, carrying the mirror's own id and
//! the back-reference to the source identity it was created from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized source event, ready for comparison against the mirror.
///
/// Invariants upheld by the normalizer:
/// - `start < end`
/// - `location` and `description` are never absent; a missing value is the
///   empty string so field equality stays total
/// - instants are UTC at whole-second resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// Stable identity assigned by the source system, never reused.
    pub source_id: String,
    /// Event title.
    pub subject: String,
    /// Event location, empty string when the source has none.
    pub location: String,
    /// Event body text, empty string when the source has none.
    pub description: String,
    /// Start instant in UTC.
    pub start: DateTime<Utc>,
    /// End instant in UTC.
    pub end: DateTime<Utc>,
}

impl CanonicalEvent {
    /// Compares the synced fields against a mirror event.
    ///
    /// Exact string and instant equality on subject, location, description,
    /// start and end. No fuzzy matching: the canonical representation is
    /// already truncated to whole seconds, so any remaining mismatch is a
    /// real difference.
    pub fn fields_match(&self, mirror: &MirrorEvent) -> bool {
        self.subject == mirror.subject
            && self.location == mirror.location
            && self.description == mirror.description
            && self.start == mirror.start
            && self.end == mirror.end
    }
}

/// An event as stored on the mirror calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorEvent {
    /// Identity assigned by the mirror system.
    pub mirror_id: String,
    /// Back-reference to the source identity, read from the provider's
    /// private-metadata slot. `None` marks a foreign event the engine never
    /// touches.
    pub source_ref: Option<String>,
    /// Event title.
    pub subject: String,
    /// Event location.
    pub location: String,
    /// Event body text.
    pub description: String,
    /// Start instant in UTC.
    pub start: DateTime<Utc>,
    /// End instant in UTC.
    pub end: DateTime<Utc>,
}

impl MirrorEvent {
    /// Returns true when this event was created by the reconciliation engine
    /// (i.e. it carries a back-reference).
    pub fn is_managed(&self) -> bool {
        self.source_ref.is_some()
    }
}
