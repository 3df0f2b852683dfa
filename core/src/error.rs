//! Error types for the REST connector.
//!
//! # Design
//! Each failure kind gets its own variant so callers can tell "the server
//! said no" (`Request`) apart from "we never got an answer" (`Transport`)
//! and from codec failures on either side of the wire. Nothing here is
//! retried or recovered; every variant propagates to the immediate caller.

use thiserror::Error;

/// Boxed error produced by a transport implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `RestClient` verbs and the standalone decoder.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport failed before a response was obtained (connection
    /// refused, DNS failure, I/O error, unreadable body).
    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),

    /// A response arrived but its status is outside `200..300`.
    #[error("request failed with HTTP status {status} {reason}")]
    Request { status: u16, reason: String },

    /// The request body could not be encoded as JSON. Raised before any
    /// network activity.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A successful response body does not fit the requested shape.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl ApiError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<TransportError>,
    {
        ApiError::Transport(err.into())
    }

    /// Status code of a `Request` error, `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors raised while reading `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}
