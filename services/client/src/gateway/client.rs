//! services/client/src/gateway/client.rs
//!
//! The API gateway client: the single component that talks to the backend.
//! It owns URL construction, bearer token injection and error normalization,
//! and exposes one typed method per backend endpoint.

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::gateway::credential::CredentialSlot;
use crate::gateway::envelope::Envelope;
use crate::gateway::url::{join_url, segment, with_query};
use bytes::Bytes;
use habit_tracker_core::domain::{
    AuthGrant, CalendarMonth, Checkin, CheckinRange, Habit, HabitFilter, HabitTrends,
    HabitUpdate, LoginRequest, NewCheckin, NewHabit, RegisterRequest, TrendRange,
};
use habit_tracker_core::ports::{HttpMethod, HttpRequest, HttpTransport};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

const JSON: &str = "application/json";

//=========================================================================================
// Request Options
//=========================================================================================

/// Per-call options for [`GatewayClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
    /// Send the request without the bearer token even when one is held.
    pub skip_auth: bool,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            body: None,
            headers: Vec::new(),
            skip_auth: false,
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body).map_err(ClientError::Encode)?);
        Ok(self)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

//=========================================================================================
// The Gateway Client
//=========================================================================================

/// Performs every network call to the backend.
///
/// Each instance carries its own bearer token slot; build one per application
/// (or per test) and share it behind an `Arc`.
pub struct GatewayClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    credential: CredentialSlot,
    stale_guard: bool,
}

impl GatewayClient {
    /// Creates a client for the backend described by `config`.
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: join_url(&config.backend_url, &config.api_base_url),
            transport,
            credential: CredentialSlot::default(),
            stale_guard: config.stale_guard,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replaces the bearer token. `None` clears it.
    pub fn set_token(&self, token: Option<String>) {
        self.credential.set(token);
    }

    pub fn token(&self) -> Option<String> {
        self.credential.snapshot().token
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_set()
    }

    /// Sends one request to `base_url + endpoint`.
    ///
    /// Returns `Ok(None)` for 204 responses without looking at the body.
    /// Failures are returned unchanged in kind; nothing is retried.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<Option<T>> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, endpoint);
        let snapshot = self.credential.snapshot();

        let mut headers = options.headers;
        if !headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        {
            headers.push(("Content-Type".to_string(), JSON.to_string()));
        }
        let authorized = match (&snapshot.token, options.skip_auth) {
            (Some(token), false) => {
                headers.retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
                headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
                true
            }
            _ => false,
        };

        let body = match options.body {
            Some(value) => Some(Bytes::from(
                serde_json::to_vec(&value).map_err(ClientError::Encode)?,
            )),
            None => None,
        };

        debug!(
            %request_id,
            method = %options.method,
            %url,
            authorized,
            "Sending API request"
        );

        let response = self
            .transport
            .send(HttpRequest {
                method: options.method,
                url,
                headers,
                body,
            })
            .await
            .map_err(|e| {
                error!(%request_id, "API request failed: {}", e);
                ClientError::Network(e)
            })?;

        if self.stale_guard && authorized && self.credential.generation() != snapshot.generation {
            debug!(%request_id, "Discarding response from a previous session");
            return Err(ClientError::StaleSession);
        }

        let envelope = Envelope::<T>::decode(&response).map_err(|e| {
            error!(%request_id, status = response.status, "API response could not be parsed: {}", e);
            ClientError::Parse(e)
        })?;

        debug!(%request_id, status = response.status, "API request completed");
        envelope.into_result()
    }

    /// Like [`request`](Self::request) but a payload is required.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        self.request(endpoint, options)
            .await?
            .ok_or_else(|| ClientError::EmptyBody {
                endpoint: endpoint.to_string(),
            })
    }

    //=====================================================================================
    // Auth
    //=====================================================================================

    /// `POST /v1/auth/register`. On success the returned token is installed.
    pub async fn register(&self, registration: &RegisterRequest) -> ClientResult<AuthGrant> {
        let options = RequestOptions::new(HttpMethod::Post)
            .with_json(registration)?
            .skip_auth();
        let grant: AuthGrant = self.fetch("/v1/auth/register", options).await?;
        self.set_token(Some(grant.token.clone()));
        info!(user_id = %grant.user.id, "Registered new account");
        Ok(grant)
    }

    /// `POST /v1/auth/login`. On success the returned token is installed.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthGrant> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let options = RequestOptions::new(HttpMethod::Post)
            .with_json(&body)?
            .skip_auth();
        let grant: AuthGrant = self.fetch("/v1/auth/login", options).await?;
        self.set_token(Some(grant.token.clone()));
        info!(user_id = %grant.user.id, "Logged in");
        Ok(grant)
    }

    /// Drops the bearer token. No network call is made.
    pub fn logout(&self) {
        self.set_token(None);
    }

    //=====================================================================================
    // Habits
    //=====================================================================================

    pub async fn get_habits(&self, filter: Option<&HabitFilter>) -> ClientResult<Vec<Habit>> {
        let pairs = filter.map(HabitFilter::query_pairs).unwrap_or_default();
        let endpoint = with_query("/v1/habits", &pairs);
        Ok(self
            .request(&endpoint, RequestOptions::get())
            .await?
            .unwrap_or_default())
    }

    pub async fn create_habit(&self, habit: &NewHabit) -> ClientResult<Habit> {
        let options = RequestOptions::new(HttpMethod::Post).with_json(habit)?;
        self.fetch("/v1/habits", options).await
    }

    pub async fn update_habit(&self, id: &str, update: &HabitUpdate) -> ClientResult<Habit> {
        let endpoint = format!("/v1/habits/{}", segment(id));
        let options = RequestOptions::new(HttpMethod::Patch).with_json(update)?;
        self.fetch(&endpoint, options).await
    }

    /// Any body the backend sends back is ignored.
    pub async fn delete_habit(&self, id: &str) -> ClientResult<()> {
        let endpoint = format!("/v1/habits/{}", segment(id));
        self.request::<IgnoredAny>(&endpoint, RequestOptions::new(HttpMethod::Delete))
            .await?;
        Ok(())
    }

    //=====================================================================================
    // Check-ins
    //=====================================================================================

    pub async fn create_checkin(&self, habit_id: &str, checkin: &NewCheckin) -> ClientResult<Checkin> {
        let endpoint = format!("/v1/habits/{}/checkins", segment(habit_id));
        let options = RequestOptions::new(HttpMethod::Post).with_json(checkin)?;
        self.fetch(&endpoint, options).await
    }

    pub async fn get_checkins(&self, range: &CheckinRange) -> ClientResult<Vec<Checkin>> {
        let endpoint = with_query("/v1/checkins", &range.query_pairs());
        Ok(self
            .request(&endpoint, RequestOptions::get())
            .await?
            .unwrap_or_default())
    }

    //=====================================================================================
    // Analytics
    //=====================================================================================

    /// `month` is 1-based.
    pub async fn get_calendar(&self, year: i32, month: u32) -> ClientResult<CalendarMonth> {
        let endpoint = with_query(
            "/v1/analytics/calendar",
            &[("year", year.to_string()), ("month", month.to_string())],
        );
        Ok(self
            .request(&endpoint, RequestOptions::get())
            .await?
            .unwrap_or_default())
    }

    pub async fn get_habit_trends(
        &self,
        habit_id: &str,
        range: &TrendRange,
    ) -> ClientResult<HabitTrends> {
        let endpoint = with_query(
            &format!("/v1/analytics/habit/{}/trends", segment(habit_id)),
            &[("range", range.as_str().to_string())],
        );
        self.fetch(&endpoint, RequestOptions::get()).await
    }
}
