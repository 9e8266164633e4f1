//! Error types for connector operations.
//!
//! A [`ConnectorError`] is a batch-level failure: the engine could not
//! reach or authenticate to a calendar system at all. Per-item trouble
//! (an unreadable source event, one failed mutation) never surfaces as a
//! `ConnectorError`; those are absorbed where they occur and counted.

use std::fmt;
use thiserror::Error;

/// High-level classification of a connector failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorErrorCode {
    /// Credentials are missing, invalid or expired.
    Authentication,
    /// Connection failed, timed out or could not resolve.
    Network,
    /// The remote side asked us to slow down.
    RateLimited,
    /// The remote side returned a server-side failure.
    Server,
    /// The response could not be parsed or had an unexpected shape.
    InvalidResponse,
    /// The calendar or event does not exist.
    NotFound,
    /// The connector is missing required setup.
    Configuration,
    /// Unexpected connector-internal state.
    Internal,
}

impl ConnectorErrorCode {
    /// True when the failure is transient and the next cycle may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::RateLimited | Self::Server)
    }

    /// Stable machine-readable name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Network => "network",
            Self::RateLimited => "rate_limited",
            Self::Server => "server",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ConnectorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure while talking to a source or mirror calendar system.
#[derive(Debug, Error)]
pub struct ConnectorError {
    code: ConnectorErrorCode,
    message: String,
    /// Which connector produced the error (e.g. "outlook", "google").
    connector: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConnectorError {
    /// Creates a new connector error with the given code and message.
    pub fn new(code: ConnectorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            connector: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorCode::Authentication, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorCode::Network, message)
    }

    /// Creates a rate-limit error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorCode::RateLimited, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorCode::Server, message)
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorCode::InvalidResponse, message)
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorCode::NotFound, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorCode::Configuration, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorCode::Internal, message)
    }

    /// Attaches the connector name.
    pub fn with_connector(mut self, connector: impl Into<String>) -> Self {
        self.connector = Some(connector.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ConnectorErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the connector name, if set.
    pub fn connector(&self) -> Option<&str> {
        self.connector.as_deref()
    }

    /// True when the failure is transient and the next cycle may succeed.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.connector {
            Some(ref connector) => {
                write!(f, "{connector} connector: {}: {}", self.code, self.message)
            }
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// A specialized Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
