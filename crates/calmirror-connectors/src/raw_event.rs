//! Raw event type from source connectors.
//!
//! A [`RawSourceEvent`] is the source-side record exactly as a connector
//! read it: the start and end are naive wall-clock components with no
//! timezone attached, because desktop calendar clients report local times.
//! The normalizer resolves them against the configured source timezone.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A calendar event as enumerated from the source system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSourceEvent {
    /// Opaque stable identity assigned by the source system.
    pub id: String,
    /// Event title.
    pub subject: String,
    /// Naive wall-clock start in the source's local timezone.
    pub start: NaiveDateTime,
    /// Naive wall-clock end in the source's local timezone.
    pub end: NaiveDateTime,
    /// Event location, if the source has one.
    pub location: Option<String>,
    /// Event body text, if the source has one.
    pub body: Option<String>,
    /// Whether the source flags this as a whole-day event. Whole-day events
    /// are out of scope and rejected by the normalizer.
    pub all_day: bool,
}

impl RawSourceEvent {
    /// Creates a new raw event with the required fields.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            start,
            end,
            location: None,
            body: None,
            all_day: false,
        }
    }

    /// Builder: set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder: set the body text.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builder: flag as a whole-day event.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }
}
