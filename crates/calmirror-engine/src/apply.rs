//! The apply driver: execute a sync plan against the mirror.
//!
//! Creates and updates run before deletes, so a change that frees up a slot
//! never races the removal of a different event. Calls are issued one at a
//! time; a failed call is logged with the event's subject and the batch
//! carries on. Nothing is rolled back: the next cycle's diff re-derives any
//! operation that failed here, which makes every mutation at-least-once.

use calmirror_connectors::MirrorConnector;
use tracing::{info, warn};

use crate::diff::SyncPlan;

/// Counts from one apply pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Mirror events created.
    pub created: usize,
    /// Mirror events updated.
    pub updated: usize,
    /// Mirror events deleted.
    pub deleted: usize,
    /// Operations that failed and were skipped.
    pub failed: usize,
}

/// Executes the plan against the mirror calendar, sequentially.
pub async fn apply(mirror: &dyn MirrorConnector, calendar_id: &str, plan: SyncPlan) -> ApplyStats {
    let mut stats = ApplyStats::default();

    for event in plan.creates {
        let subject = event.subject.clone();
        match mirror.create_event(calendar_id, event).await {
            Ok(mirror_id) => {
                stats.created += 1;
                info!(%subject, %mirror_id, "created mirror event");
            }
            Err(error) => {
                stats.failed += 1;
                warn!(%subject, %error, "could not create mirror event");
            }
        }
    }

    for update in plan.updates {
        let subject = update.event.subject.clone();
        match mirror
            .update_event(calendar_id, &update.mirror_id, update.event)
            .await
        {
            Ok(()) => {
                stats.updated += 1;
                info!(%subject, mirror_id = %update.mirror_id, "updated mirror event");
            }
            Err(error) => {
                stats.failed += 1;
                warn!(%subject, %error, "could not update mirror event");
            }
        }
    }

    for delete in plan.deletes {
        match mirror.delete_event(calendar_id, &delete.mirror_id).await {
            Ok(()) => {
                stats.deleted += 1;
                info!(subject = %delete.subject, mirror_id = %delete.mirror_id, "deleted mirror event");
            }
            Err(error) => {
                stats.failed += 1;
                warn!(subject = %delete.subject, %error, "could not delete mirror event");
            }
        }
    }

    stats
}
