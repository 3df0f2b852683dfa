use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get, head},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// JSON documents keyed by the last path segment.
pub type Store = Arc<RwLock<BTreeMap<String, Value>>>;

#[derive(Deserialize)]
pub struct KeyFilter {
    pub prefix: Option<String>,
}

/// Header attached to every `/probe` response.
pub const PROBE_HEADER: &str = "x-foo";

pub fn app() -> Router {
    let store: Store = Arc::default();
    Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/status/{code}", any(status))
        .route("/empty", any(|| async { StatusCode::OK }))
        .route("/probe", head(probe))
        .route("/docs", get(list_keys))
        .route(
            "/docs/{key}",
            get(get_doc).put(put_doc).post(merge_doc).delete(delete_doc),
        )
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Reflect the request back as JSON: method, path, raw query, headers and
/// the body (parsed as JSON when possible).
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let headers: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_string(), Value::String(value))
        })
        .collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": headers,
        "body": body,
    }))
}

async fn status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(json!({ "status": status.as_u16() })))
}

async fn probe() -> (StatusCode, [(&'static str, &'static str); 1]) {
    (StatusCode::NO_CONTENT, [(PROBE_HEADER, "bar")])
}

async fn list_keys(State(store): State<Store>, Query(filter): Query<KeyFilter>) -> Json<Vec<String>> {
    let docs = store.read().await;
    let prefix = filter.prefix.unwrap_or_default();
    Json(docs.keys().filter(|k| k.starts_with(&prefix)).cloned().collect())
}

async fn get_doc(State(store): State<Store>, Path(key): Path<String>) -> Result<Json<Value>, StatusCode> {
    let docs = store.read().await;
    docs.get(&key).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Store `doc` under `key`: 201 when new, 200 when replacing.
async fn put_doc(
    State(store): State<Store>,
    Path(key): Path<String>,
    Json(doc): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let replaced = store.write().await.insert(key.clone(), doc.clone()).is_some();
    tracing::debug!(%key, replaced, "stored document");
    let status = if replaced { StatusCode::OK } else { StatusCode::CREATED };
    (status, Json(doc))
}

/// Shallow-merge the fields of an object into the stored object.
async fn merge_doc(
    State(store): State<Store>,
    Path(key): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let Value::Object(patch) = patch else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let mut docs = store.write().await;
    let doc = docs.get_mut(&key).ok_or(StatusCode::NOT_FOUND)?;
    let Value::Object(fields) = &mut *doc else {
        return Err(StatusCode::CONFLICT);
    };
    fields.extend(patch);
    Ok(Json(doc.clone()))
}

async fn delete_doc(State(store): State<Store>, Path(key): Path<String>) -> StatusCode {
    match store.write().await.remove(&key) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_filter_prefix_is_optional() {
        let filter: KeyFilter = serde_json::from_value(json!({})).unwrap();
        assert!(filter.prefix.is_none());
        let filter: KeyFilter = serde_json::from_value(json!({"prefix": "user-"})).unwrap();
        assert_eq!(filter.prefix.as_deref(), Some("user-"));
    }
}
