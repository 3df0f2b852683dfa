//! Default JSON headers merged with caller-supplied ones.

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const APPLICATION_JSON: &str = "application/json";

/// Merge `custom` headers over the JSON defaults.
///
/// Keys are matched case-sensitively. A matching key replaces the existing
/// value in place, so the result never carries duplicate names.
pub fn compose_headers<K, V>(custom: &[(K, V)]) -> Vec<(String, String)>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut headers = vec![
        (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
        (ACCEPT.to_string(), APPLICATION_JSON.to_string()),
    ];
    for (key, value) in custom {
        set_header(&mut headers, key.as_ref(), value.as_ref());
    }
    headers
}

/// Set `key` to `value`, replacing an existing entry with the same name.
pub(crate) fn set_header(headers: &mut Vec<(String, String)>, key: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((key.to_string(), value.to_string())),
    }
}
