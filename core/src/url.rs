//! Request target assembly.
//!
//! Segments and query values are appended verbatim; no percent-encoding is
//! applied. Callers pass tokens that are already safe for a URL.

/// Join `base`, the ordered path `segments` and the `query` pairs into one
/// request target.
///
/// Returns `base` unchanged when both `segments` and `query` are empty.
pub fn build_url<S, K, V>(base: &str, segments: &[S], query: &[(K, V)]) -> String
where
    S: AsRef<str>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = String::from(base);

    // Empty segments would produce `//` or a trailing `/`.
    for segment in segments {
        let segment: &str = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }

    for (i, (key, value)) in query.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key.as_ref());
        url.push('=');
        url.push_str(value.as_ref());
    }

    url
}
