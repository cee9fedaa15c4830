//! Process configuration parsed from environment variables.
//!
//! Required:
//! - `JWT_SECRET`: HMAC secret shared with the auth backend (min 32 chars)
//! - `API_BASE_URL`: absolute `http(s)` URL of the external auth/nutrition API
//!
//! Optional:
//! - `PORT`: listen port, default 3000

use std::fmt;

use crate::auth::token::MIN_SECRET_LEN;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing config: env var {0} not set")]
    MissingVar(&'static str),
    #[error("JWT_SECRET must be at least {MIN_SECRET_LEN} characters (got {len})")]
    SecretTooShort { len: usize },
    #[error("API_BASE_URL is not an absolute http(s) URL: {0}")]
    InvalidUrl(String),
    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),
}

/// Secret string that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub jwt_secret: Secret,
    pub api_base_url: String,
    pub port: u16,
}

impl Config {
    /// Build typed config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?;
        let len = jwt_secret.chars().count();
        if len < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort { len });
        }

        let raw_url = lookup("API_BASE_URL").ok_or(ConfigError::MissingVar("API_BASE_URL"))?;
        let api_base_url = parse_base_url(&raw_url)?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { jwt_secret: Secret(jwt_secret), api_base_url, port })
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = reqwest::Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl(raw.to_owned()))?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(ConfigError::InvalidUrl(raw.to_owned()));
    }
    Ok(url.as_str().trim_end_matches('/').to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
