//! services/client/src/session/manager.rs
//!
//! The session manager: single source of truth for who is logged in.
//!
//! Every change of identity goes through one session update that installs or
//! clears the gateway's bearer token, the in-memory session and the persisted
//! copy together. Durable storage is best-effort: its failures are logged and
//! never abort a login or logout.

use crate::error::ClientError;
use crate::gateway::GatewayClient;
use habit_tracker_core::domain::{RegisterRequest, Session};
use habit_tracker_core::ports::{PortError, PortResult, SessionStorage};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the serialized session.
pub const USER_KEY: &str = "user";

//=========================================================================================
// Auth Outcome
//=========================================================================================

/// Result of a login or registration attempt. Failures carry a message fit to
/// show the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success(Session),
    Failure { error: String },
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthOutcome::Success(session) => Some(session),
            AuthOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthOutcome::Success(_) => None,
            AuthOutcome::Failure { error } => Some(error),
        }
    }
}

impl From<ClientError> for AuthOutcome {
    fn from(err: ClientError) -> Self {
        AuthOutcome::Failure {
            error: err.user_message(),
        }
    }
}

//=========================================================================================
// Session Manager
//=========================================================================================

pub struct SessionManager {
    gateway: Arc<GatewayClient>,
    storage: Arc<dyn SessionStorage>,
    current: Mutex<Option<Session>>,
}

impl SessionManager {
    /// Starts with no active session; call [`restore`](Self::restore) to pick
    /// up a persisted one.
    pub fn new(gateway: Arc<GatewayClient>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            gateway,
            storage,
            current: Mutex::new(None),
        }
    }

    pub fn gateway(&self) -> &Arc<GatewayClient> {
        &self.gateway
    }

    fn current(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn session(&self) -> Option<Session> {
        self.current().clone()
    }

    /// Activates the persisted session, if any, without a network call. The
    /// token is trusted until a request fails.
    ///
    /// A partial or unreadable record is treated as logged out and cleared.
    pub fn restore(&self) -> Option<Session> {
        let mut current = self.current();
        match self.read_persisted() {
            Ok(Some(session)) => {
                info!(user_id = %session.user_id, "Restored persisted session");
                self.gateway.set_token(Some(session.bearer_token.clone()));
                *current = Some(session.clone());
                Some(session)
            }
            Ok(None) => {
                self.gateway.set_token(None);
                *current = None;
                None
            }
            Err(reason) => {
                warn!("Discarding persisted session: {}", reason);
                self.gateway.set_token(None);
                *current = None;
                self.clear_persisted();
                None
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        match self.gateway.login(email, password).await {
            Ok(grant) => self.establish(Session::from_grant(grant)),
            Err(err) => {
                warn!("Login failed: {}", err);
                err.into()
            }
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        timezone: &str,
    ) -> AuthOutcome {
        let registration = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
            timezone: timezone.to_string(),
        };
        match self.gateway.register(&registration).await {
            Ok(grant) => self.establish(Session::from_grant(grant)),
            Err(err) => {
                warn!("Registration failed: {}", err);
                err.into()
            }
        }
    }

    /// Ends the session everywhere. Never fails, even when nothing was stored.
    pub fn logout(&self) {
        let mut current = self.current();
        self.gateway.logout();
        if let Some(session) = current.take() {
            info!(user_id = %session.user_id, "Logged out");
        }
        self.clear_persisted();
    }

    fn establish(&self, session: Session) -> AuthOutcome {
        let mut current = self.current();
        self.gateway.set_token(Some(session.bearer_token.clone()));
        self.persist(&session);
        *current = Some(session.clone());
        AuthOutcome::Success(session)
    }

    //=====================================================================================
    // Durable Storage
    //=====================================================================================

    fn read_persisted(&self) -> Result<Option<Session>, String> {
        let token = self.storage.get(TOKEN_KEY).map_err(|e| e.to_string())?;
        let user = self.storage.get(USER_KEY).map_err(|e| e.to_string())?;
        match (token, user) {
            (None, None) => Ok(None),
            (Some(token), Some(user)) => {
                let mut session: Session =
                    serde_json::from_str(&user).map_err(|e| format!("unreadable user: {}", e))?;
                session.bearer_token = token;
                Ok(Some(session))
            }
            (Some(_), None) => Err("token without user".to_string()),
            (None, Some(_)) => Err("user without token".to_string()),
        }
    }

    fn persist(&self, session: &Session) {
        let result: PortResult<()> = serde_json::to_string(session)
            .map_err(|e| PortError::Storage(e.to_string()))
            .and_then(|user| {
                self.storage.set_many(&[
                    (TOKEN_KEY, session.bearer_token.clone()),
                    (USER_KEY, user),
                ])
            });
        if let Err(e) = result {
            warn!("Could not persist session: {}", e);
        }
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.storage.remove_many(&[TOKEN_KEY, USER_KEY]) {
            warn!("Could not clear persisted session: {}", e);
        }
    }
}
