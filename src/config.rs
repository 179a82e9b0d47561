//! Panel configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_USER_TYPE: &str = "jeweler";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = ".gallery-panel/session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL '{0}': expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
    #[error("invalid value for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Origin and prefix for every API request, without a trailing slash.
    pub base_url: String,
    /// `userType` sent with OTP verification.
    pub user_type: String,
    pub timeouts: Timeouts,
    /// Where the file-backed session storage lives.
    pub session_file: PathBuf,
}

impl PanelConfig {
    /// Build a config for `base_url` with every other setting at its default.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            user_type: DEFAULT_USER_TYPE.to_owned(),
            timeouts: Timeouts::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        })
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PANEL_BASE_URL`: default `http://localhost:3000/api/v1`
    /// - `PANEL_USER_TYPE`: default `jeweler`
    /// - `PANEL_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PANEL_CONNECT_TIMEOUT_SECS`: default 10
    /// - `PANEL_SESSION_FILE`: default `.gallery-panel/session.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed or a timeout is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("PANEL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let mut config = Self::new(&base_url)?;

        if let Ok(user_type) = std::env::var("PANEL_USER_TYPE") {
            if !user_type.trim().is_empty() {
                config.user_type = user_type.trim().to_owned();
            }
        }
        config.timeouts = Timeouts {
            request_secs: env_parse_u64("PANEL_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("PANEL_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        if let Ok(path) = std::env::var("PANEL_SESSION_FILE") {
            config.session_file = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Join an API path (e.g. `/products`) onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn env_parse_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
