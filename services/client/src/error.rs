//! services/client/src/error.rs
//!
//! Defines the primary error type for the client library.

use crate::config::ConfigError;
use habit_tracker_core::ports::PortError;

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never reached the backend or the response never arrived.
    #[error(transparent)]
    Network(#[from] PortError),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A successful response carried a body that is not the expected JSON.
    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request body could not be turned into JSON before sending.
    #[error("Request could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// A successful response carried no body where a payload was required.
    #[error("Empty response from {endpoint}")]
    EmptyBody { endpoint: String },

    /// The session that issued the request ended before the response arrived.
    #[error("Response discarded: the session changed while the request was in flight")]
    StaleSession,

    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// A convenience type alias for `Result<T, ClientError>`.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// HTTP status of a server rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The human-readable message to show the user. Server rejections surface
    /// the server's own message verbatim.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
