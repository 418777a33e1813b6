//! services/client/src/state.rs
//!
//! The application root: builds the adapters once and wires them into the
//! gateway client and session manager that the front ends share.

use crate::adapters::{FileSessionStore, ReqwestTransport};
use crate::config::Config;
use crate::gateway::GatewayClient;
use crate::session::SessionManager;
use habit_tracker_core::ports::{HttpTransport, SessionStorage};
use std::sync::Arc;

/// Shared state, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<GatewayClient>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Wires the reqwest transport and the file-backed session store.
    pub fn from_config(config: Config) -> Self {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::default());
        let storage: Arc<dyn SessionStorage> =
            Arc::new(FileSessionStore::new(config.session_path.clone()));
        Self::with_adapters(config, transport, storage)
    }

    pub fn with_adapters(
        config: Config,
        transport: Arc<dyn HttpTransport>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let gateway = Arc::new(GatewayClient::new(&config, transport));
        let sessions = Arc::new(SessionManager::new(gateway.clone(), storage));
        Self {
            config: Arc::new(config),
            gateway,
            sessions,
        }
    }
}
