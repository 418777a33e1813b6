//! crates/habit_tracker_core/src/domain.rs
//!
//! Defines the core data structures shared between the session layer and the
//! gateway client. Field names follow the backend's camelCase JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//=========================================================================================
// Identity
//=========================================================================================

/// The `user` object returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UserWire")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
}

/// The id arrives as `id`, `uid` or `userId`, sometimes several at once.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl TryFrom<UserWire> for User {
    type Error = String;

    fn try_from(wire: UserWire) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .or(wire.uid)
            .or(wire.user_id)
            .ok_or_else(|| "missing field `id`".to_string())?;
        Ok(Self {
            id,
            display_name: wire.display_name.unwrap_or_default(),
            email: wire.email.unwrap_or_default(),
        })
    }
}

/// The authenticated identity and credential held for the current user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub bearer_token: String,
}

impl Session {
    /// Builds a session from a successful auth exchange.
    pub fn from_grant(grant: AuthGrant) -> Self {
        Self {
            user_id: grant.user.id,
            display_name: grant.user.display_name,
            email: grant.user.email,
            bearer_token: grant.token,
        }
    }
}

// The bearer token never ends up in logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// `POST /v1/auth/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /v1/auth/register` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub timezone: String,
}

/// `{token, user}` as returned by both auth endpoints.
#[derive(Clone, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub user: User,
}

impl fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGrant")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

//=========================================================================================
// Habits
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

/// A user-defined recurring task. The backend is authoritative for `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "HabitWire")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub emoji: String,
    pub frequency: Frequency,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Optional fields may be missing or `null`. The completion flag may be
/// spelled `isCompleted`, `is_completed` or both; the camelCase one wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HabitWire {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    emoji: Option<String>,
    #[serde(default)]
    frequency: Option<Frequency>,
    #[serde(default)]
    is_completed: Option<bool>,
    #[serde(default, rename = "is_completed")]
    is_completed_snake: Option<bool>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<HabitWire> for Habit {
    fn from(wire: HabitWire) -> Self {
        Self {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            emoji: wire.emoji.unwrap_or_default(),
            frequency: wire.frequency.unwrap_or_default(),
            is_completed: wire
                .is_completed
                .or(wire.is_completed_snake)
                .unwrap_or_default(),
            created_at: wire.created_at,
        }
    }
}

/// Body of `POST /v1/habits`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub emoji: String,
    pub frequency: Frequency,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl NewHabit {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            emoji: "✅".to_string(),
            frequency: Frequency::Daily,
            is_completed: false,
            user_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Body of `PATCH /v1/habits/{id}`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl HabitUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Optional narrowing for `GET /v1/habits`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitFilter {
    pub user_id: Option<String>,
}

impl HabitFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.user_id
            .iter()
            .map(|id| ("userId", id.clone()))
            .collect()
    }
}

//=========================================================================================
// Check-ins
//=========================================================================================

/// A recorded completion of a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub habit_id: String,
    pub checked_at: DateTime<Utc>,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

fn default_quantity() -> f64 {
    1.0
}

/// Body of `POST /v1/habits/{habitId}/checkins`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckin {
    pub checked_at: DateTime<Utc>,
    pub quantity: f64,
}

impl NewCheckin {
    /// A single completion recorded at the current instant.
    pub fn now() -> Self {
        Self {
            checked_at: Utc::now(),
            quantity: default_quantity(),
        }
    }

    pub fn at(checked_at: DateTime<Utc>, quantity: f64) -> Self {
        Self {
            checked_at,
            quantity,
        }
    }
}

/// Inclusive date bounds for `GET /v1/checkins`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckinRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl CheckinRange {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    /// `from`/`to` rendered as `YYYY-MM-DD`; unset bounds are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

//=========================================================================================
// Analytics (server-computed, read-only)
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    #[serde(default)]
    pub days: Vec<CalendarDay>,
    #[serde(default)]
    pub streaks: Streaks,
}

impl CalendarMonth {
    /// Completions recorded on `date`, zero when the server sent no entry.
    pub fn completed_on(&self, date: NaiveDate) -> u32 {
        self.days
            .iter()
            .find(|day| day.date == date)
            .map_or(0, |day| day.completed_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub completed_count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
}

/// Trend series for one habit. The shape is owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitTrends(pub serde_json::Value);

/// Window token for the trends endpoint, e.g. `30d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRange(String);

impl TrendRange {
    pub fn new(range: impl Into<String>) -> Self {
        Self(range.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TrendRange {
    fn default() -> Self {
        Self::new("30d")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_accepts_uid_alias() {
        let user: User =
            serde_json::from_value(json!({"uid": "u-1", "displayName": "Ann"})).unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.display_name, "Ann");
        assert_eq!(user.email, "");
    }

    #[test]
    fn user_tolerates_several_id_spellings() {
        let user: User = serde_json::from_value(
            json!({"uid": "u-1", "id": "u-1", "userId": "u-1", "email": "a@b.com", "displayName": null}),
        )
        .unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.display_name, "");

        let user: User = serde_json::from_value(json!({"userId": "u-2"})).unwrap();
        assert_eq!(user.id, "u-2");
    }

    #[test]
    fn user_without_any_id_is_rejected() {
        let err = serde_json::from_value::<User>(json!({"email": "a@b.com"})).unwrap_err();
        assert!(err.to_string().contains("missing field `id`"));
    }

    #[test]
    fn session_debug_hides_token() {
        let session = Session {
            user_id: "u-1".into(),
            display_name: "Ann".into(),
            email: "a@b.com".into(),
            bearer_token: "secret-token".into(),
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("a@b.com"));
    }

    #[test]
    fn habit_decodes_snake_case_completion_flag() {
        let habit: Habit = serde_json::from_value(json!({
            "id": "h1",
            "title": "Read",
            "emoji": "📚",
            "frequency": "weekly",
            "is_completed": true,
            "createdAt": "2024-03-01T08:00:00Z"
        }))
        .unwrap();
        assert!(habit.is_completed);
        assert_eq!(habit.frequency, Frequency::Weekly);
        assert!(habit.description.is_none());
        assert!(habit.created_at.is_some());
    }

    #[test]
    fn habit_tolerates_both_completion_spellings() {
        let habit: Habit = serde_json::from_value(json!({
            "id": "h1",
            "title": "Read",
            "isCompleted": true,
            "is_completed": false
        }))
        .unwrap();
        assert!(habit.is_completed);
    }

    #[test]
    fn habit_nulls_fall_back_to_defaults() {
        let habit: Habit = serde_json::from_value(json!({
            "id": "h1",
            "title": "Read",
            "description": null,
            "emoji": null,
            "frequency": null,
            "isCompleted": null,
            "createdAt": null
        }))
        .unwrap();
        assert_eq!(habit.emoji, "");
        assert_eq!(habit.frequency, Frequency::Daily);
        assert!(!habit.is_completed);
        assert!(habit.description.is_none());
        assert!(habit.created_at.is_none());
    }

    #[test]
    fn habit_serializes_camel_case() {
        let habit: Habit =
            serde_json::from_value(json!({"id": "h1", "title": "Read", "is_completed": true}))
                .unwrap();
        assert_eq!(
            serde_json::to_value(&habit).unwrap(),
            json!({"id": "h1", "title": "Read", "emoji": "", "frequency": "daily", "isCompleted": true})
        );
    }

    #[test]
    fn new_habit_omits_unset_fields() {
        let body = serde_json::to_value(NewHabit::new("Walk")).unwrap();
        assert_eq!(
            body,
            json!({"title": "Walk", "emoji": "✅", "frequency": "daily", "isCompleted": false})
        );
    }

    #[test]
    fn habit_update_serializes_only_present_fields() {
        let update = HabitUpdate {
            title: Some("Stretch".into()),
            frequency: Some(Frequency::Custom),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"title": "Stretch", "frequency": "custom"})
        );
        assert!(HabitUpdate::default().is_empty());
    }

    #[test]
    fn checkin_range_renders_iso_dates() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            CheckinRange::day(day).query_pairs(),
            vec![("from", "2024-03-09".to_string()), ("to", "2024-03-09".to_string())]
        );
        assert!(CheckinRange::default().query_pairs().is_empty());
    }

    #[test]
    fn calendar_defaults_missing_parts() {
        let month: CalendarMonth = serde_json::from_value(json!({
            "days": [{"date": "2024-03-02", "completedCount": 3}]
        }))
        .unwrap();
        assert_eq!(month.streaks, Streaks::default());
        assert_eq!(month.completed_on(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()), 3);
        assert_eq!(month.completed_on(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()), 0);
    }
}
