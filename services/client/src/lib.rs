//! services/client/src/lib.rs
//!
//! Client-side data access and session layer for the habit tracker backend.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use gateway::{GatewayClient, RequestOptions};
pub use session::{AuthOutcome, SessionManager};
pub use state::AppState;
