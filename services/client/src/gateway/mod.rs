pub mod client;
pub mod credential;
pub mod envelope;
pub mod url;

pub use client::{GatewayClient, RequestOptions};
pub use envelope::Envelope;
pub use self::url::join_url;
