//! Synchronous JSON-over-HTTP request helper.
//!
//! # Overview
//! `RestClient` issues GET/PUT/POST/DELETE/HEAD requests against arbitrary
//! URLs. Each call assembles the target from a base URL, ordered path
//! segments and query parameters, merges caller headers over the JSON
//! defaults, encodes an optional body, and decodes a successful response
//! into whatever type the caller asks for.
//!
//! ```no_run
//! use rest_connector::{ClientConfig, JsonObject, RequestOptions, RestClient};
//!
//! let client = RestClient::with_config(ClientConfig::default());
//! let user: Option<JsonObject> = client
//!     .get("http://localhost:3000", &RequestOptions::new().paths(["users", "42"]))
//!     .unwrap();
//! ```
//!
//! # Design
//! - `RestClient` is stateless apart from its `Transport`; each call opens
//!   and closes its own connection.
//! - Construction (`build_request`) and decoding (`decode`, `head_map`) are
//!   public on their own, so a host can run the I/O itself.
//! - Path segments and query values are appended verbatim, without
//!   percent-encoding.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod headers;
pub mod http;
pub mod options;
pub mod transport;
pub mod ureq_transport;
pub mod url;

pub use client::RestClient;
pub use config::ClientConfig;
pub use decode::{decode, head_map, JsonObject};
pub use error::{ApiError, ConfigError, TransportError};
pub use headers::compose_headers;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::RequestOptions;
pub use transport::{Connection, Transport};
pub use ureq_transport::{UreqConnection, UreqTransport};
pub use url::build_url;
