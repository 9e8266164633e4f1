//! The cycle orchestrator: one fetch-diff-apply pass.
//!
//! A cycle walks the phases `Idle → FetchingSource → FetchingMirror →
//! Diffing → Applying → Idle`. A connector failure during either fetch
//! faults the cycle before any mutation; the fault is reported to the caller
//! and the next scheduled cycle starts from Idle again. "No source snapshot"
//! is always a skipped cycle, never a mass delete.

use calmirror_connectors::{
    normalize_events, ConnectorError, MirrorConnector, SourceConnector,
};
use calmirror_core::SyncWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::apply::apply;
use crate::config::SyncConfig;
use crate::diff::diff;
use crate::index::MirrorIndex;

/// Where a cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Between cycles.
    Idle,
    /// Enumerating source events.
    FetchingSource,
    /// Listing the mirror snapshot.
    FetchingMirror,
    /// Classifying operations.
    Diffing,
    /// Executing operations against the mirror.
    Applying,
    /// Aborted on connector failure; no mutation was performed.
    Faulted,
}

impl CyclePhase {
    /// Stable name for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FetchingSource => "fetching_source",
            Self::FetchingMirror => "fetching_mirror",
            Self::Diffing => "diffing",
            Self::Applying => "applying",
            Self::Faulted => "faulted",
        }
    }
}

/// Aggregate counts from one completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Mirror events created.
    pub created: usize,
    /// Mirror events updated.
    pub updated: usize,
    /// Mirror events deleted.
    pub deleted: usize,
    /// Source events skipped (unreadable fields or unnormalizable times).
    pub skipped: usize,
    /// Mutations that failed and will be re-derived next cycle.
    pub failed_ops: usize,
}

/// A cycle that faulted before mutating anything.
#[derive(Debug, Error)]
pub enum CycleError {
    /// The source system could not be reached; no snapshot is available.
    #[error("no source snapshot available: {0}")]
    Source(#[source] ConnectorError),

    /// The mirror system could not be listed.
    #[error("no mirror snapshot available: {0}")]
    Mirror(#[source] ConnectorError),
}

/// Runs one reconciliation cycle with the window anchored at `now`.
pub async fn run_cycle_at(
    source: &dyn SourceConnector,
    mirror: &dyn MirrorConnector,
    config: &SyncConfig,
    now: DateTime<Utc>,
) -> Result<CycleReport, CycleError> {
    let window = SyncWindow::around(now, config.lookback, config.lookahead);
    debug!(
        window_start = %window.start,
        window_end = %window.end,
        "starting sync cycle"
    );

    debug!(phase = CyclePhase::FetchingSource.as_str(), "phase change");
    let snapshot = source.fetch_events(window).await.map_err(|e| {
        error!(phase = CyclePhase::Faulted.as_str(), error = %e, "source fetch failed");
        CycleError::Source(e)
    })?;

    let mut batch = normalize_events(&snapshot, config.timezone);
    // The connector already filters by window, but normalization can move an
    // event's instants; anything no longer overlapping the window is out of
    // scope for this cycle.
    batch.events.retain(|e| window.overlaps(e.start, e.end));
    debug!(
        events = batch.events.len(),
        skipped = batch.skipped,
        "source snapshot normalized"
    );

    debug!(phase = CyclePhase::FetchingMirror.as_str(), "phase change");
    let mirror_events = mirror
        .list_events(&config.calendar_id, window)
        .await
        .map_err(|e| {
            error!(phase = CyclePhase::Faulted.as_str(), error = %e, "mirror fetch failed");
            CycleError::Mirror(e)
        })?;

    debug!(phase = CyclePhase::Diffing.as_str(), "phase change");
    let index = MirrorIndex::build(mirror_events);
    let plan = diff(&batch.events, index);

    debug!(phase = CyclePhase::Applying.as_str(), "phase change");
    let stats = apply(mirror, &config.calendar_id, plan).await;

    let report = CycleReport {
        created: stats.created,
        updated: stats.updated,
        deleted: stats.deleted,
        skipped: batch.skipped,
        failed_ops: stats.failed,
    };
    info!(
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        skipped = report.skipped,
        failed = report.failed_ops,
        "sync cycle completed"
    );
    Ok(report)
}

/// Runs one reconciliation cycle with the window anchored at the current
/// time.
pub async fn run_cycle(
    source: &dyn SourceConnector,
    mirror: &dyn MirrorConnector,
    config: &SyncConfig,
) -> Result<CycleReport, CycleError> {
    run_cycle_at(source, mirror, config, Utc::now()).await
}
