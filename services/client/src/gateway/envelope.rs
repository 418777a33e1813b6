//! services/client/src/gateway/envelope.rs
//!
//! Decodes raw HTTP responses into an explicit success/failure result.

use crate::error::{ClientError, ClientResult};
use habit_tracker_core::ports::HttpResponse;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A decoded backend response.
#[derive(Debug, PartialEq)]
pub enum Envelope<T> {
    /// 204: the body is never inspected.
    NoContent,
    /// 2xx with a JSON payload.
    Success(T),
    /// Non-2xx. `message` is the server's `error` field or `HTTP <status>`.
    Failure { status: u16, message: String },
}

/// The error shape the backend uses for rejections.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        match self.error? {
            serde_json::Value::String(message) if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Only a malformed body on a 2xx status is an error here; rejection
    /// bodies that cannot be read fall back to the generic message.
    pub fn decode(response: &HttpResponse) -> Result<Self, serde_json::Error> {
        if response.is_no_content() {
            return Ok(Envelope::NoContent);
        }
        if response.is_success() {
            return serde_json::from_slice(&response.body).map(Envelope::Success);
        }

        let message = serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        Ok(Envelope::Failure {
            status: response.status,
            message,
        })
    }

    pub fn into_result(self) -> ClientResult<Option<T>> {
        match self {
            Envelope::NoContent => Ok(None),
            Envelope::Success(payload) => Ok(Some(payload)),
            Envelope::Failure { status, message } => Err(ClientError::Api { status, message }),
        }
    }
}
