//! `Transport` implementation backed by `ureq`.
//!
//! # Design
//! `open` builds a fresh `ureq::Agent` from `ClientConfig` for every call,
//! so no connection pool outlives a request. The agent is configured with
//! `http_status_as_error(false)` so 4xx/5xx responses come back as data and
//! status interpretation stays with the decoder.
//!
//! Only 2xx bodies are read. `ureq` does not expose the server's status
//! line, so `reason` is the canonical phrase for the code: custom phrases
//! are lost and unregistered codes get an empty string.

use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Connection, Transport};

#[derive(Debug, Clone, Default)]
pub struct UreqTransport {
    config: ClientConfig,
}

impl UreqTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Transport for UreqTransport {
    type Connection = UreqConnection;

    fn open(&self) -> Result<UreqConnection, ApiError> {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(self.config.timeout)
            .timeout_connect(self.config.connect_timeout)
            .build()
            .new_agent();
        Ok(UreqConnection {
            agent,
            max_body_bytes: self.config.max_body_bytes,
        })
    }
}

/// One `ureq::Agent`, owned for the duration of a single call.
#[derive(Debug)]
pub struct UreqConnection {
    agent: Agent,
    max_body_bytes: u64,
}

impl Connection for UreqConnection {
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Get, Some(body)) => with_headers(self.agent.get(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Head, _) => with_headers(self.agent.head(url), headers).call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(url), headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };
        let mut response = result.map_err(ApiError::transport)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        // Failure bodies are never read, so an oversized or broken error body
        // cannot mask the status.
        let body = if request.method == HttpMethod::Head || !status.is_success() {
            None
        } else {
            let bytes = response
                .body_mut()
                .with_config()
                .limit(self.max_body_bytes)
                .read_to_vec()
                .map_err(ApiError::transport)?;
            Some(bytes).filter(|b| !b.is_empty())
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }

    fn close(&mut self) -> Result<(), ApiError> {
        // Pooled sockets are released when the agent is dropped with the connection.
        tracing::trace!("closing ureq connection");
        Ok(())
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
