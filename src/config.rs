//! Runtime configuration loaded from the environment (and `.env`).

use crate::{Error, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com";
pub const DEFAULT_CREATE_PATH: &str = "/v1/models/black-forest-labs/flux-1.1-pro/predictions";
pub const DEFAULT_OUTPUT_QUALITY: u8 = 90;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Prefix used in the `Authorization` header.
///
/// Prediction endpoints have been seen accepting both forms, so this is
/// configurable rather than fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    #[default]
    Bearer,
    Token,
}

impl AuthScheme {
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {}", token),
            AuthScheme::Token => format!("Token {}", token),
        }
    }
}

impl FromStr for AuthScheme {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(AuthScheme::Bearer),
            "token" => Ok(AuthScheme::Token),
            other => Err(Error::Configuration(format!(
                "PROVIDER_AUTH_SCHEME must be 'bearer' or 'token', got '{}'",
                other
            ))),
        }
    }
}

/// Interval and ceiling for the status poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// `None` when `PROVIDER_API_TOKEN` is unset; reported on first use.
    pub api_token: Option<String>,
    pub base_url: String,
    pub create_path: String,
    pub auth_scheme: AuthScheme,
    pub output_quality: u8,
    /// Top-level `version` sent on creation (`PROVIDER_MODEL_VERSION`).
    pub model_version: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            create_path: DEFAULT_CREATE_PATH.to_string(),
            auth_scheme: AuthScheme::default(),
            output_quality: DEFAULT_OUTPUT_QUALITY,
            model_version: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub poll: PollPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys fall back to
    /// defaults; malformed values are configuration errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("PROVIDER_API_TOKEN").filter(|t| !t.trim().is_empty());

        let model_version = lookup("PROVIDER_MODEL_VERSION")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let auth_scheme = match lookup("PROVIDER_AUTH_SCHEME") {
            Some(value) => value.parse()?,
            None => AuthScheme::default(),
        };

        let output_quality = parse_var(&lookup, "PROVIDER_OUTPUT_QUALITY")?
            .unwrap_or(DEFAULT_OUTPUT_QUALITY);
        if output_quality > 100 {
            return Err(Error::Configuration(format!(
                "PROVIDER_OUTPUT_QUALITY must be between 0 and 100, got {}",
                output_quality
            )));
        }

        let interval = parse_var::<u64, _>(&lookup, "POLL_INTERVAL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        let max_attempts =
            parse_var(&lookup, "POLL_MAX_ATTEMPTS")?.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        if max_attempts == 0 {
            return Err(Error::Configuration(
                "POLL_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            provider: ProviderConfig {
                api_token,
                base_url: lookup("PROVIDER_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                create_path: lookup("PROVIDER_CREATE_PATH")
                    .unwrap_or_else(|| DEFAULT_CREATE_PATH.to_string()),
                auth_scheme,
                output_quality,
                model_version,
            },
            poll: PollPolicy {
                interval,
                max_attempts,
            },
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| Error::Configuration(format!("Invalid {} '{}': {}", key, raw, e)))
        })
        .transpose()
}
