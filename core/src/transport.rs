//! The seam between the connector and an HTTP transport library.
//!
//! # Design
//! A `Transport` is a factory: each call opens one `Connection`, executes a
//! single request on it and closes it again. `Scoped` ties the close to
//! scope exit so it runs on every path, including failed decodes. Close
//! failures are logged and dropped; after a response has been read there is
//! nothing a caller could do about them.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Factory for per-call connections.
pub trait Transport {
    type Connection: Connection;

    fn open(&self) -> Result<Self::Connection, ApiError>;
}

/// A client handle that executes requests until it is closed.
pub trait Connection {
    /// Send `request` and return the response, whatever its status.
    /// Only failures to obtain a response are errors.
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;

    /// Release the connection. Called exactly once, after the last
    /// `execute`.
    fn close(&mut self) -> Result<(), ApiError>;
}

/// Closes the wrapped connection when dropped.
pub(crate) struct Scoped<C: Connection>(C);

impl<C: Connection> Scoped<C> {
    pub(crate) fn new(connection: C) -> Self {
        Self(connection)
    }

    pub(crate) fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.0.execute(request)
    }
}

impl<C: Connection> Drop for Scoped<C> {
    fn drop(&mut self) {
        if let Err(err) = self.0.close() {
            tracing::warn!(error = %err, "ignoring failure to close transport connection");
        }
    }
}
