use std::{env, time::Duration};
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIRECT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_STRAVA_URL: &str = "https://www.strava.com";

/// Cookie signing keys shorter than this are rejected by `Key::derive_from`.
pub const MIN_SECRET_KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Host serving the authorize and token endpoints.
    pub accounts_url: String,
    /// Base of the REST API.
    pub api_url: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    /// Public origin of this service, used to build callback URIs.
    pub redirect_base_url: String,
    pub secret_key: Option<String>,
    pub session_ttl: Duration,
    pub http_timeout: Duration,
    pub spotify: ProviderConfig,
    pub strava: ProviderConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let or_default = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let seconds = |name: &'static str, default: u64| -> Result<Duration, ConfigError> {
            let value = match lookup(name).filter(|value| !value.is_empty()) {
                Some(value) => value.parse().map_err(|err: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        name,
                        reason: err.to_string(),
                    }
                })?,
                None => default,
            };
            if value == 0 {
                return Err(ConfigError::Invalid {
                    name,
                    reason: "must be greater than zero".to_string(),
                });
            }
            Ok(Duration::from_secs(value))
        };

        let secret_key = lookup("SECRET_KEY").filter(|value| !value.is_empty());
        if let Some(key) = &secret_key {
            if key.len() < MIN_SECRET_KEY_LEN {
                return Err(ConfigError::Invalid {
                    name: "SECRET_KEY",
                    reason: format!("must be at least {} bytes", MIN_SECRET_KEY_LEN),
                });
            }
        }

        let strava_url = or_default("STRAVA_URL", DEFAULT_STRAVA_URL);

        Ok(Config {
            bind_addr: or_default("BIND_ADDR", DEFAULT_BIND_ADDR),
            redirect_base_url: or_default("REDIRECT_BASE_URL", DEFAULT_REDIRECT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            secret_key,
            session_ttl: seconds("SESSION_TTL_SECS", 24 * 60 * 60)?,
            http_timeout: seconds("HTTP_TIMEOUT_SECS", 10)?,
            spotify: ProviderConfig {
                client_id: required("SPOTIFY_CLIENT_ID")?,
                client_secret: required("SPOTIFY_CLIENT_SECRET")?,
                accounts_url: or_default("SPOTIFY_ACCOUNTS_URL", DEFAULT_SPOTIFY_ACCOUNTS_URL),
                api_url: or_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            },
            strava: ProviderConfig {
                client_id: required("STRAVA_CLIENT_ID")?,
                client_secret: required("STRAVA_CLIENT_SECRET")?,
                api_url: format!("{}/api/v3", strava_url.trim_end_matches('/')),
                accounts_url: strava_url,
            },
        })
    }

    /// This host is the address the providers redirect back to after authorization.
    pub fn host(&self, path: &str) -> String {
        self.redirect_base_url.clone() + path
    }

    pub fn secure_cookies(&self) -> bool {
        self.redirect_base_url.starts_with("https://")
    }
}
