//! Connector trait definitions.
//!
//! Two capability traits split along system ownership: [`SourceConnector`]
//! reads the authoritative calendar (never written to), [`MirrorConnector`]
//! lists and mutates the mirrored one. Both are object-safe so alternate
//! providers can be swapped in without touching the diff engine.

use std::future::Future;
use std::pin::Pin;

use calmirror_core::{CanonicalEvent, MirrorEvent, SyncWindow};

use crate::error::ConnectorResult;
use crate::raw_event::RawSourceEvent;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the connector traits object-safe, which the engine
/// relies on (`Arc<dyn SourceConnector>` / `Arc<dyn MirrorConnector>`).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The result of one source fetch.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    /// Events inside the window, whole-day events already excluded.
    pub events: Vec<RawSourceEvent>,
    /// Events whose required fields the connector could not read. These are
    /// per-item skips, never a batch failure.
    pub skipped: usize,
}

impl SourceSnapshot {
    /// Creates a snapshot from a list of events with no skips.
    pub fn with_events(events: Vec<RawSourceEvent>) -> Self {
        Self { events, skipped: 0 }
    }

    /// Builder: record per-item read failures absorbed during the fetch.
    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }
}

/// Read access to the authoritative source calendar.
///
/// Implementations must:
/// - apply the window filter themselves
/// - exclude whole-day events
/// - absorb per-item field-read errors as `SourceSnapshot::skipped` rather
///   than failing the batch
///
/// A returned error means "no source snapshot available"; the orchestrator
/// then skips the cycle without mutating anything.
pub trait SourceConnector: Send + Sync {
    /// Returns the connector name (e.g. "outlook").
    fn name(&self) -> &str;

    /// Enumerates source events within the sync window.
    fn fetch_events(&self, window: SyncWindow) -> BoxFuture<'_, ConnectorResult<SourceSnapshot>>;
}

/// Read/write access to the mirror calendar.
///
/// The connector owns the provider-specific private-metadata slot: it embeds
/// the source identity on create/update and reads it back into
/// [`MirrorEvent::source_ref`] when listing. Authentication and token
/// refresh are connector concerns too.
pub trait MirrorConnector: Send + Sync {
    /// Returns the connector name (e.g. "google").
    fn name(&self) -> &str;

    /// Lists mirror events within the sync window.
    fn list_events(
        &self,
        calendar_id: &str,
        window: SyncWindow,
    ) -> BoxFuture<'_, ConnectorResult<Vec<MirrorEvent>>>;

    /// Creates a mirror event from a canonical event, embedding the
    /// back-reference. Returns the mirror-assigned id.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CanonicalEvent,
    ) -> BoxFuture<'_, ConnectorResult<String>>;

    /// Replaces all synced fields of an existing mirror event.
    fn update_event(
        &self,
        calendar_id: &str,
        mirror_id: &str,
        event: CanonicalEvent,
    ) -> BoxFuture<'_, ConnectorResult<()>>;

    /// Deletes a mirror event.
    fn delete_event(
        &self,
        calendar_id: &str,
        mirror_id: &str,
    ) -> BoxFuture<'_, ConnectorResult<()>>;
}
