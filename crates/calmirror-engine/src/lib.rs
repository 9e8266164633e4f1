//! One-way calendar reconciliation engine.
//!
//! Given a source snapshot and a mirror snapshot, the engine computes the
//! minimal create/update/delete set that makes the mirror match the source
//! within a bounded time window, and applies it idempotently. All state is
//! re-derived from the two live snapshots every cycle; there is no persisted
//! mapping table, so every transient failure heals on the next run.

pub mod apply;
pub mod config;
pub mod cycle;
pub mod diff;
pub mod index;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use apply::{apply, ApplyStats};
pub use config::{ConfigError, SyncConfig};
pub use cycle::{run_cycle, run_cycle_at, CycleError, CyclePhase, CycleReport};
pub use diff::{diff, PlannedDelete, PlannedUpdate, SyncPlan};
pub use index::MirrorIndex;
pub use runner::{RunnerCommand, RunnerHandle, RunnerState, SyncRunner};
