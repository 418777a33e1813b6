//! crates/habit_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) the client layer depends on.
//! The gateway and session manager talk to the network and to durable storage
//! only through these traits, so adapters can be swapped (reqwest, files,
//! in-memory fakes) without touching the core logic.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The request never reached the backend, or the response never arrived.
    #[error("Network failure: {0}")]
    Network(String),
    /// Durable storage could not be read or written.
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// HTTP Exchange Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Looks up a header value, comparing names case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The raw response: status code and undecoded body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs one HTTP exchange. Any status code is a successful exchange;
    /// only transport failures are errors.
    async fn send(&self, request: HttpRequest) -> PortResult<HttpResponse>;
}

/// Durable key/value storage for the persisted session.
///
/// Batch writes and removals must land together: after `set_many` returns
/// `Ok`, every entry is visible; on `Err`, none of them is.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    fn set_many(&self, entries: &[(&str, String)]) -> PortResult<()>;

    fn remove_many(&self, keys: &[&str]) -> PortResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://h/api/v1/habits".into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: None,
        };
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn status_classification() {
        assert!(HttpResponse::new(201, "{}").is_success());
        assert!(HttpResponse::new(204, "").is_no_content());
        assert!(!HttpResponse::new(404, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
    }
}
