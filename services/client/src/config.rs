//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_API_BASE_URL: &str = "/api";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub backend_url: String,
    pub api_base_url: String,
    pub session_path: PathBuf,
    pub log_level: Level,
    /// Discard responses that finish after the session they were sent under ended.
    pub stale_guard: bool,
}

impl Config {
    /// Builds a configuration for the given host and API path, with defaults
    /// for everything else.
    pub fn new(backend_url: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            api_base_url: api_base_url.into(),
            session_path: default_session_path(),
            log_level: Level::INFO,
            stale_guard: false,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Backend Location ---
        let backend_url =
            lookup("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "BACKEND_URL".to_string(),
                format!("'{}' is not an http(s) URL", backend_url),
            ));
        }
        let api_base_url =
            lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        // --- Local State ---
        let session_path = lookup("SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_session_path);

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let stale_guard = match lookup("STALE_GUARD") {
            None => false,
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("STALE_GUARD".to_string(), raw))?,
        };

        Ok(Self {
            backend_url,
            api_base_url,
            session_path,
            log_level,
            stale_guard,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("habit-tracker").join("session.json"))
        .unwrap_or_else(|| PathBuf::from(".habit-session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert_eq!(config.api_base_url, "/api");
        assert_eq!(config.log_level, Level::INFO);
        assert!(!config.stale_guard);
        assert!(config.session_path.ends_with("session.json")
            || config.session_path.ends_with(".habit-session.json"));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("BACKEND_URL", "https://habits.example.com/"),
            ("API_BASE_URL", "v2"),
            ("SESSION_PATH", "/tmp/s.json"),
            ("RUST_LOG", "debug"),
            ("STALE_GUARD", "true"),
        ]))
        .unwrap();
        assert_eq!(config.backend_url, "https://habits.example.com/");
        assert_eq!(config.api_base_url, "v2");
        assert_eq!(config.session_path, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(config.stale_guard);
    }

    #[test]
    fn rejects_non_http_backend() {
        let err = Config::from_lookup(lookup_from(&[("BACKEND_URL", "localhost:5000")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "BACKEND_URL"));
    }

    #[test]
    fn rejects_bad_log_level_and_flag() {
        assert!(Config::from_lookup(lookup_from(&[("RUST_LOG", "loud")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("STALE_GUARD", "maybe")])).is_err());
    }
}
