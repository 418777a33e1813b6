//! services/client/src/testing.rs
//!
//! A scripted `HttpTransport` for unit tests.

use async_trait::async_trait;
use habit_tracker_core::ports::{HttpRequest, HttpResponse, HttpTransport, PortError, PortResult};
use std::collections::VecDeque;
use std::sync::Mutex;

type Reply = PortResult<HttpResponse>;

/// Replies with queued responses in order and records every request it sees.
/// Once the queue is empty every request gets `200 []`.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &'static str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(PortError::Network(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub fn body_json(request: &HttpRequest) -> serde_json::Value {
        serde_json::from_slice(request.body.as_deref().expect("request had no body")).unwrap()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> PortResult<HttpResponse> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "[]")))
    }
}

pub const GRANT: &str =
    r#"{"token":"T","user":{"id":"u-1","displayName":"Ann","email":"a@b.com"}}"#;
