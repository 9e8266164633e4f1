//! Connector seams and event normalization.
//!
//! The reconciliation engine never talks to a calendar system directly. It
//! consumes two capability traits: [`SourceConnector`] enumerates events
//! from the authoritative calendar, [`MirrorConnector`] lists and mutates
//! the mirrored calendar. Concrete connectors own authentication, token
//! refresh and the provider-specific metadata slot that stores the
//! back-reference; nothing in this crate does I/O.

pub mod connector;
pub mod error;
pub mod normalize;
pub mod raw_event;

pub use connector::{BoxFuture, MirrorConnector, SourceConnector, SourceSnapshot};
pub use error::{ConnectorError, ConnectorErrorCode, ConnectorResult};
pub use normalize::{normalize_event, normalize_events, NormalizeError, NormalizedBatch};
pub use raw_event::RawSourceEvent;
