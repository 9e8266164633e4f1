//! The diff engine: classify each source/mirror pairing.
//!
//! Compares the normalized source set against the mirror index and produces
//! three disjoint operation lists. Identity is the sole correlation key;
//! textual similarity never matches two events. One pass over the source
//! plus one pass over the remaining index entries, O(|source| + |mirror|).

use std::collections::HashSet;

use calmirror_core::CanonicalEvent;

use crate::index::MirrorIndex;

/// An update of an existing mirror event.
///
/// Carries the full canonical event: a single differing field forces all
/// fields to be rewritten, because no partial-field update primitive is
/// assumed safe on the mirror side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    /// Mirror-assigned id of the event to rewrite.
    pub mirror_id: String,
    /// The source truth to write.
    pub event: CanonicalEvent,
}

/// A deletion of a mirror event whose source counterpart is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDelete {
    /// Mirror-assigned id of the event to remove.
    pub mirror_id: String,
    /// Subject kept for human-readable failure logs.
    pub subject: String,
}

/// The classified operations for one cycle.
#[derive(Debug, Default)]
pub struct SyncPlan {
    /// Source events with no mirror counterpart, in source order.
    pub creates: Vec<CanonicalEvent>,
    /// Source events whose mirror counterpart differs in any compared field.
    pub updates: Vec<PlannedUpdate>,
    /// Mirror events whose source identity left the snapshot.
    pub deletes: Vec<PlannedDelete>,
}

impl SyncPlan {
    /// True when the mirror already matches the source.
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Total number of planned mutations.
    pub fn len(&self) -> usize {
        self.creates.len() + self.updates.len() + self.deletes.len()
    }
}

/// Computes the operations that make the mirror match the source.
///
/// Consumes the index: every indexed mirror event either pairs with a source
/// event (update or no-op) or becomes a delete.
pub fn diff(source: &[CanonicalEvent], index: MirrorIndex) -> SyncPlan {
    let mut plan = SyncPlan::default();
    let source_ids: HashSet<&str> = source.iter().map(|e| e.source_id.as_str()).collect();

    for event in source {
        match index.get(&event.source_id) {
            None => plan.creates.push(event.clone()),
            Some(mirror) if event.fields_match(mirror) => {}
            Some(mirror) => plan.updates.push(PlannedUpdate {
                mirror_id: mirror.mirror_id.clone(),
                event: event.clone(),
            }),
        }
    }

    for (source_id, mirror) in index.into_entries() {
        if !source_ids.contains(source_id.as_str()) {
            plan.deletes.push(PlannedDelete {
                mirror_id: mirror.mirror_id,
                subject: mirror.subject,
            });
        }
    }

    plan
}
