//! Response classification and JSON decoding.
//!
//! # Design
//! `decode` is the single place that turns an `HttpResponse` into a caller's
//! value. The target shape is a type parameter chosen at the call site;
//! callers without a concrete type use `JsonObject`, which keeps the key
//! order of the source document.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Generic, insertion-ordered JSON object. Default decode target.
pub type JsonObject = Map<String, Value>;

/// Decode a response into `T`.
///
/// Statuses outside `200..300` fail with `ApiError::Request` without looking
/// at the body. A success with an absent, empty or whitespace-only body is
/// `Ok(None)`.
pub fn decode<T>(response: HttpResponse) -> Result<Option<T>, ApiError>
where
    T: DeserializeOwned,
{
    check_status(&response)?;

    let body = match response.body {
        Some(body) if !body.iter().all(u8::is_ascii_whitespace) => body,
        _ => {
            tracing::trace!(status = response.status, "success response without body");
            return Ok(None);
        }
    };

    let value = serde_json::from_slice(&body).map_err(ApiError::Deserialization)?;
    tracing::trace!(status = response.status, bytes = body.len(), "decoded response body");
    Ok(Some(value))
}

/// Collect the response headers of a HEAD call into a map and add `status`
/// and `msg` (the reason phrase). Any status is accepted.
///
/// Header names are kept as the transport reports them. When a name repeats,
/// the last value wins.
pub fn head_map(response: HttpResponse) -> JsonObject {
    let mut map = JsonObject::new();
    for (name, value) in response.headers {
        map.insert(name, Value::String(value));
    }
    map.insert("status".to_string(), Value::from(response.status));
    map.insert("msg".to_string(), Value::String(response.reason));
    map
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Request {
        status: response.status,
        reason: response.reason.clone(),
    })
}
