//! Core types: canonical events, sync window, tracing

pub mod event;
pub mod time;
pub mod tracing;

pub use event::{CanonicalEvent, MirrorEvent};
pub use time::SyncWindow;
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
