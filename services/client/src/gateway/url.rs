//! services/client/src/gateway/url.rs
//!
//! URL construction for the backend API.

/// Joins a host root and an API path with exactly one slash between them.
///
/// One trailing slash is trimmed from `host` and a leading slash is added to
/// `path` when it has none.
pub fn join_url(host: &str, path: &str) -> String {
    let host = host.strip_suffix('/').unwrap_or(host);
    if path.starts_with('/') {
        format!("{}{}", host, path)
    } else {
        format!("{}/{}", host, path)
    }
}

/// Percent-encodes one path segment, such as a backend-issued id.
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Appends `pairs` as a query string. No `?` is added when `pairs` is empty.
pub fn with_query(endpoint: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return endpoint.to_string();
    }
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", endpoint, query)
}
