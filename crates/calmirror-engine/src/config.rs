//! Engine configuration.
//!
//! Read-only after startup: the sync window size, the target mirror
//! calendar, the source timezone and the cycle interval. Validation failures
//! are fatal before the first cycle; nothing here is retried.

use std::time::Duration as StdDuration;

use chrono::Duration;
use chrono_tz::Tz;
use thiserror::Error;

/// A configuration problem that prevents the engine from starting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No target mirror calendar was given.
    #[error("target mirror calendar id is empty")]
    EmptyCalendarId,

    /// The source timezone is not a known IANA name.
    #[error("unknown source timezone: {0}")]
    UnknownTimezone(String),
}

/// Engine configuration, read-only once constructed.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Identity of the mirror calendar all mutations target.
    pub calendar_id: String,
    /// IANA timezone the source's naive wall-clock times are resolved in.
    pub timezone: Tz,
    /// How far into the past a cycle looks.
    pub lookback: Duration,
    /// How far into the future a cycle looks.
    pub lookahead: Duration,
    /// Pause between the end of one cycle and the start of the next.
    pub interval: StdDuration,
}

impl SyncConfig {
    /// Creates a configuration with the defaults of the original deployment:
    /// 30 days back, 30 days ahead, a cycle every 15 minutes.
    ///
    /// # Errors
    ///
    /// Fails when the calendar id is empty or the timezone is not a valid
    /// IANA name. Both are startup-fatal; no cycle runs until corrected.
    pub fn new(calendar_id: impl Into<String>, timezone: &str) -> Result<Self, ConfigError> {
        let calendar_id = calendar_id.into();
        if calendar_id.trim().is_empty() {
            return Err(ConfigError::EmptyCalendarId);
        }
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(timezone.to_string()))?;

        Ok(Self {
            calendar_id,
            timezone,
            lookback: Duration::days(30),
            lookahead: Duration::days(30),
            interval: StdDuration::from_secs(15 * 60),
        })
    }

    /// Builder: set the lookback length.
    #[must_use]
    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    /// Builder: set the lookahead length.
    #[must_use]
    pub fn with_lookahead(mut self, lookahead: Duration) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Builder: set the cycle interval.
    #[must_use]
    pub fn with_interval(mut self, interval: StdDuration) -> Self {
        self.interval = interval;
        self
    }
}
