//! Per-call request options.
//!
//! Every field is independently omittable; an omitted field behaves exactly
//! like an empty one.

use crate::headers::set_header;

/// Path segments, query parameters, extra headers and an optional JSON body
/// for a single call.
///
/// `B` is the body type. Options without a body use `()` and are created
/// with `RequestOptions::new()`; `body` switches the type parameter.
///
/// ```
/// use rest_connector::RequestOptions;
///
/// let opts = RequestOptions::new()
///     .path("users")
///     .path("42")
///     .query("fields", "name")
///     .header("X-Trace", "abc");
/// assert_eq!(opts.path_segments, vec!["users", "42"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions<B = ()> {
    pub path_segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<B>,
}

impl RequestOptions<()> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B> Default for RequestOptions<B> {
    fn default() -> Self {
        Self {
            path_segments: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }
}

impl<B> RequestOptions<B> {
    /// Append one path segment.
    pub fn path(mut self, segment: impl Into<String>) -> Self {
        self.path_segments.push(segment.into());
        self
    }

    /// Append several path segments in order.
    pub fn paths<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path_segments.extend(segments.into_iter().map(Into::into));
        self
    }

    /// Set a query parameter. Setting an existing key replaces its value and
    /// keeps its original position.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    /// Set a header, overriding the JSON defaults when the name matches.
    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        set_header(&mut self.headers, key.as_ref(), value.as_ref());
        self
    }

    /// Attach a body, to be encoded as JSON when the request is built.
    pub fn body<T>(self, body: T) -> RequestOptions<T> {
        RequestOptions {
            path_segments: self.path_segments,
            query: self.query,
            headers: self.headers,
            body: Some(body),
        }
    }
}
