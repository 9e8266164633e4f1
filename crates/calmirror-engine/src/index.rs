//! Lookup structure over the mirror snapshot.
//!
//! The index maps source identity to mirror event by scanning each mirror
//! event's back-reference. Foreign events (no back-reference) are excluded
//! and therefore invisible to the diff and the apply driver; the mirror may
//! carry unrelated events safely.

use std::collections::HashMap;

use calmirror_core::MirrorEvent;
use tracing::{debug, warn};

/// Mirror events indexed by the source identity they were created from.
#[derive(Debug, Default)]
pub struct MirrorIndex {
    by_source_id: HashMap<String, MirrorEvent>,
    foreign: usize,
    duplicates: usize,
}

impl MirrorIndex {
    /// Builds the index from a mirror snapshot.
    ///
    /// A well-formed mirror has at most one event per source identity. If a
    /// prior partially-failed cycle left duplicates, the first-seen event
    /// wins and later ones are counted and left alone for this cycle; the
    /// design trades that self-limited anomaly for not having to persist a
    /// mapping table between cycles.
    pub fn build(events: Vec<MirrorEvent>) -> Self {
        let mut index = Self::default();

        for event in events {
            let Some(source_ref) = event.source_ref.clone() else {
                index.foreign += 1;
                continue;
            };
            if index.by_source_id.contains_key(&source_ref) {
                index.duplicates += 1;
                warn!(
                    source_id = %source_ref,
                    mirror_id = %event.mirror_id,
                    "duplicate back-reference in mirror snapshot, keeping first-seen"
                );
                continue;
            }
            index.by_source_id.insert(source_ref, event);
        }

        debug!(
            managed = index.by_source_id.len(),
            foreign = index.foreign,
            duplicates = index.duplicates,
            "mirror index built"
        );
        index
    }

    /// Number of managed mirror events in the index.
    pub fn len(&self) -> usize {
        self.by_source_id.len()
    }

    /// True when no managed mirror events were found.
    pub fn is_empty(&self) -> bool {
        self.by_source_id.is_empty()
    }

    /// Looks up the mirror event created from the given source identity.
    pub fn get(&self, source_id: &str) -> Option<&MirrorEvent> {
        self.by_source_id.get(source_id)
    }

    /// Source identities referenced by the mirror within the window.
    pub fn referenced_ids(&self) -> impl Iterator<Item = &str> {
        self.by_source_id.keys().map(String::as_str)
    }

    /// Number of foreign events excluded from the index.
    pub fn foreign(&self) -> usize {
        self.foreign
    }

    /// Number of duplicate back-references dropped (first-seen wins).
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Consumes the index, yielding `(source_id, event)` pairs.
    pub fn into_entries(self) -> impl Iterator<Item = (String, MirrorEvent)> {
        self.by_source_id.into_iter()
    }
}
