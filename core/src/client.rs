//! Request dispatch for the five HTTP verbs.
//!
//! # Design
//! `RestClient` holds only its `Transport` and carries no mutable state
//! between calls. Every verb goes through the same pipeline: build the URL,
//! compose headers, encode the body, open one connection, execute, decode,
//! close. `build_request` is public so hosts that run their own I/O can use
//! the construction half on its own and hand the response to `decode`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::decode::{decode, head_map, JsonObject};
use crate::error::ApiError;
use crate::headers::compose_headers;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::RequestOptions;
use crate::transport::{Scoped, Transport};
use crate::ureq_transport::UreqTransport;
use crate::url::build_url;

/// Synchronous, stateless JSON client over a pluggable transport.
#[derive(Debug, Clone, Default)]
pub struct RestClient<T = UreqTransport> {
    transport: T,
}

impl RestClient<UreqTransport> {
    /// Client over `ureq` with the given configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self::new(UreqTransport::new(config))
    }
}

impl<T: Transport> RestClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn get<R, B>(&self, url: &str, options: &RequestOptions<B>) -> Result<Option<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        let request = self.build_request(HttpMethod::Get, url, options)?;
        self.dispatch(&request, decode::<R>)
    }

    pub fn put<R, B>(&self, url: &str, options: &RequestOptions<B>) -> Result<Option<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        let request = self.build_request(HttpMethod::Put, url, options)?;
        self.dispatch(&request, decode::<R>)
    }

    pub fn post<R, B>(&self, url: &str, options: &RequestOptions<B>) -> Result<Option<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        let request = self.build_request(HttpMethod::Post, url, options)?;
        self.dispatch(&request, decode::<R>)
    }

    pub fn delete<R, B>(&self, url: &str, options: &RequestOptions<B>) -> Result<Option<R>, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        let request = self.build_request(HttpMethod::Delete, url, options)?;
        self.dispatch(&request, decode::<R>)
    }

    /// Issue a HEAD request and return the response headers plus `status`
    /// and `msg`. The body in `options` is never sent.
    pub fn head<B>(&self, url: &str, options: &RequestOptions<B>) -> Result<JsonObject, ApiError> {
        let request = HttpRequest {
            method: HttpMethod::Head,
            url: build_url(url, &options.path_segments, &options.query),
            headers: compose_headers(&options.headers),
            body: None,
        };
        self.dispatch(&request, |response| Ok(head_map(response)))
    }

    /// Build the request a verb would send, without touching the network.
    ///
    /// Fails with `ApiError::Serialization` when the body cannot be encoded.
    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        url: &str,
        options: &RequestOptions<B>,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize,
    {
        let body = match (method, options.body.as_ref()) {
            (HttpMethod::Head, _) | (_, None) => None,
            (_, Some(body)) => Some(serde_json::to_string(body).map_err(ApiError::Serialization)?),
        };
        Ok(HttpRequest {
            method,
            url: build_url(url, &options.path_segments, &options.query),
            headers: compose_headers(&options.headers),
            body,
        })
    }

    fn dispatch<O, F>(&self, request: &HttpRequest, handle: F) -> Result<O, ApiError>
    where
        F: FnOnce(HttpResponse) -> Result<O, ApiError>,
    {
        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");
        let mut connection = Scoped::new(self.transport.open()?);
        let response = connection.execute(request)?;
        tracing::debug!(status = response.status, "received response");
        handle(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::transport::Connection;

    /// In-memory transport that replays one canned response and records
    /// every request and lifecycle event.
    #[derive(Default)]
    struct StubTransport {
        response: RefCell<Option<HttpResponse>>,
        fail_execute: bool,
        fail_close: bool,
        opened: Cell<usize>,
        closed: Cell<usize>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl StubTransport {
        fn replying(status: u16, reason: &str, body: Option<&str>) -> Self {
            Self::with_response(HttpResponse {
                status,
                reason: reason.to_string(),
                headers: Vec::new(),
                body: body.map(|b| b.as_bytes().to_vec()),
            })
        }

        fn with_response(response: HttpResponse) -> Self {
            Self {
                response: RefCell::new(Some(response)),
                ..Self::default()
            }
        }

        fn last_request(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    struct StubConnection<'a> {
        transport: &'a StubTransport,
    }

    impl<'a> Transport for &'a StubTransport {
        type Connection = StubConnection<'a>;

        fn open(&self) -> Result<StubConnection<'a>, ApiError> {
            self.opened.set(self.opened.get() + 1);
            Ok(StubConnection { transport: *self })
        }
    }

    impl Connection for StubConnection<'_> {
        fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.transport.requests.borrow_mut().push(request.clone());
            if self.transport.fail_execute {
                let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
                return Err(ApiError::transport(io));
            }
            Ok(self.transport.response.borrow_mut().take().unwrap())
        }

        fn close(&mut self) -> Result<(), ApiError> {
            self.transport.closed.set(self.transport.closed.get() + 1);
            if self.transport.fail_close {
                let io = std::io::Error::other("close failed");
                return Err(ApiError::transport(io));
            }
            Ok(())
        }
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Item {
        id: u32,
        name: String,
    }

    #[test]
    fn default_client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestClient<UreqTransport>>();
    }

    #[test]
    fn get_builds_url_headers_and_decodes() {
        let stub = StubTransport::replying(200, "OK", Some(r#"{"a":1}"#));
        let client = RestClient::new(&stub);

        let opts = RequestOptions::new()
            .paths(["users", "42"])
            .query("fields", "a")
            .header("X-Trace", "t1");
        let result: Option<JsonObject> = client.get("http://h", &opts).unwrap();

        assert_eq!(result.unwrap()["a"], 1);
        let req = stub.last_request();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://h/users/42?fields=a");
        assert_eq!(
            req.headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
                ("X-Trace".to_string(), "t1".to_string()),
            ]
        );
        assert!(req.body.is_none());
        assert_eq!((stub.opened.get(), stub.closed.get()), (1, 1));
    }

    #[test]
    fn omitted_options_use_base_url_and_default_headers() {
        let stub = StubTransport::replying(204, "No Content", None);
        let client = RestClient::new(&stub);

        let result: Option<JsonObject> = client.delete("http://h/x", &RequestOptions::new()).unwrap();

        assert!(result.is_none());
        let req = stub.last_request();
        assert_eq!(req.url, "http://h/x");
        assert_eq!(req.headers.len(), 2);
        assert!(req.body.is_none());
    }

    #[test]
    fn post_encodes_body_and_decodes_typed_result() {
        let stub = StubTransport::replying(201, "Created", Some(r#"{"id":1,"name":"ada"}"#));
        let client = RestClient::new(&stub);

        let opts = RequestOptions::new().path("items").body(json!({"name": "ada"}));
        let item: Option<Item> = client.post("http://h", &opts).unwrap();

        assert_eq!(
            item,
            Some(Item {
                id: 1,
                name: "ada".to_string()
            })
        );
        let req = stub.last_request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"ada"}"#));
    }

    #[test]
    fn put_and_delete_carry_bodies() {
        let stub = StubTransport::replying(200, "OK", None);
        let client = RestClient::new(&stub);
        let item = Item {
            id: 3,
            name: "x".to_string(),
        };
        let _: Option<JsonObject> = client
            .put("http://h", &RequestOptions::new().body(&item))
            .unwrap();
        let req = stub.last_request();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.body.as_deref(), Some(r#"{"id":3,"name":"x"}"#));

        let stub = StubTransport::replying(200, "OK", None);
        let client = RestClient::new(&stub);
        let _: Option<JsonObject> = client
            .delete("http://h", &RequestOptions::new().body(vec![1, 2]))
            .unwrap();
        assert_eq!(stub.last_request().body.as_deref(), Some("[1,2]"));
    }

    #[test]
    fn custom_header_overrides_default() {
        let stub = StubTransport::replying(200, "OK", None);
        let client = RestClient::new(&stub);

        let opts = RequestOptions::new().header("Accept", "text/plain");
        let _: Option<JsonObject> = client.get("http://h", &opts).unwrap();

        let req = stub.last_request();
        assert_eq!(req.headers[0], ("Content-Type".to_string(), "application/json".to_string()));
        assert_eq!(req.headers[1], ("Accept".to_string(), "text/plain".to_string()));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn unencodable_body_never_reaches_transport() {
        let stub = StubTransport::default();
        let client = RestClient::new(&stub);

        // JSON object keys must be strings.
        let mut body = BTreeMap::new();
        body.insert((1, 2), "v");
        let err = client
            .post::<JsonObject, _>("http://h", &RequestOptions::new().body(body))
            .unwrap_err();

        assert!(matches!(err, ApiError::Serialization(_)));
        assert_eq!(stub.opened.get(), 0);
        assert!(stub.requests.borrow().is_empty());
    }

    #[test]
    fn error_status_is_request_error_and_connection_closed() {
        let stub = StubTransport::replying(404, "Not Found", Some(r#"{"error":"missing"}"#));
        let client = RestClient::new(&stub);

        let err = client
            .get::<JsonObject, _>("http://h", &RequestOptions::new())
            .unwrap_err();

        assert!(matches!(err, ApiError::Request { status: 404, .. }));
        assert_eq!(stub.closed.get(), 1);
    }

    #[test]
    fn connection_closed_when_decoding_fails() {
        let stub = StubTransport::replying(200, "OK", Some("[1,2,3]"));
        let client = RestClient::new(&stub);

        let err = client.get::<Item, _>("http://h", &RequestOptions::new()).unwrap_err();

        assert!(matches!(err, ApiError::Deserialization(_)));
        assert_eq!((stub.opened.get(), stub.closed.get()), (1, 1));
    }

    #[test]
    fn transport_failure_propagates_and_closes() {
        let stub = StubTransport {
            fail_execute: true,
            ..StubTransport::default()
        };
        let client = RestClient::new(&stub);

        let err = client
            .get::<JsonObject, _>("http://h", &RequestOptions::new())
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(stub.closed.get(), 1);
    }

    #[test]
    fn close_failure_is_swallowed() {
        let stub = StubTransport {
            fail_close: true,
            ..StubTransport::replying(200, "OK", Some(r#"{"ok":true}"#))
        };
        let client = RestClient::new(&stub);

        let result: Option<JsonObject> = client.get("http://h", &RequestOptions::new()).unwrap();

        assert_eq!(result.unwrap()["ok"], true);
        assert_eq!(stub.closed.get(), 1);
    }

    #[test]
    fn head_returns_headers_status_and_reason() {
        let stub = StubTransport::with_response(HttpResponse {
            status: 204,
            reason: "No Content".to_string(),
            headers: vec![("X-Foo".to_string(), "bar".to_string())],
            body: None,
        });
        let client = RestClient::new(&stub);

        let opts = RequestOptions::new().path("probe").query("v", "1").body("ignored");
        let map = client.head("http://h", &opts).unwrap();

        assert_eq!(map["X-Foo"], "bar");
        assert_eq!(map["status"], 204);
        assert_eq!(map["msg"], "No Content");
        let req = stub.last_request();
        assert_eq!(req.method, HttpMethod::Head);
        assert_eq!(req.url, "http://h/probe?v=1");
        assert!(req.body.is_none());
        assert_eq!(stub.closed.get(), 1);
    }

    #[test]
    fn head_reports_error_status_in_map() {
        let stub = StubTransport::replying(500, "Internal Server Error", None);
        let client = RestClient::new(&stub);

        let map = client.head("http://h", &RequestOptions::new()).unwrap();

        assert_eq!(map["status"], 500);
        assert_eq!(map["msg"], "Internal Server Error");
    }

    #[test]
    fn build_request_does_not_open_transport() {
        let stub = StubTransport::default();
        let client = RestClient::new(&stub);

        let req = client
            .build_request(HttpMethod::Put, "http://h", &RequestOptions::new().path("a").body(1))
            .unwrap();

        assert_eq!(req.url, "http://h/a");
        assert_eq!(req.body.as_deref(), Some("1"));
        assert_eq!(stub.opened.get(), 0);
    }
}
