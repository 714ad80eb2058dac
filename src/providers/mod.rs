mod spotify;
mod strava;

pub use spotify::{Playlist, SpotifyClient, SpotifyUser};
pub use strava::StravaClient;

use crate::{config::ProviderConfig, error::AppError};
use serde::Deserialize;
use std::fmt;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Spotify,
    Strava,
}

impl Provider {
    pub fn login_path(self) -> &'static str {
        match self {
            Provider::Spotify => "/spotify/login",
            Provider::Strava => "/strava/login",
        }
    }

    pub fn callback_path(self) -> &'static str {
        match self {
            Provider::Spotify => "/spotify/callback",
            Provider::Strava => "/strava/callback",
        }
    }

    /// Session key holding the `state` nonce of a pending authorization.
    pub fn state_key(self) -> &'static str {
        match self {
            Provider::Spotify => "spotify_oauth_state",
            Provider::Strava => "strava_oauth_state",
        }
    }

    fn authorize_path(self) -> &'static str {
        match self {
            Provider::Spotify => "/authorize",
            Provider::Strava => "/oauth/authorize",
        }
    }

    fn token_path(self) -> &'static str {
        match self {
            Provider::Spotify => "/api/token",
            Provider::Strava => "/oauth/token",
        }
    }

    pub fn scope(self) -> &'static str {
        match self {
            Provider::Spotify => "playlist-modify-public playlist-modify-private user-top-read",
            Provider::Strava => "activity:read_all",
        }
    }

    fn extra_auth_params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Provider::Spotify => &[],
            Provider::Strava => &[("approval_prompt", "auto")],
        }
    }

    /// Strava matches the redirect against the app registration instead.
    fn sends_redirect_on_exchange(self) -> bool {
        matches!(self, Provider::Spotify)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::Spotify => "Spotify",
            Provider::Strava => "Strava",
        })
    }
}

/// Token endpoint response. Only the access token is kept in the session.
#[derive(Deserialize, Debug)]
pub struct Bearer {
    pub access_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

/// Authorization-code flow against one provider.
pub struct OAuthClient {
    provider: Provider,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    accounts_url: String,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(
        provider: Provider,
        config: &ProviderConfig,
        redirect_uri: String,
        http: reqwest::Client,
    ) -> Self {
        OAuthClient {
            provider,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri,
            accounts_url: config.accounts_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn auth_url(&self, state: &str) -> Result<Url, AppError> {
        let base = format!("{}{}", self.accounts_url, self.provider.authorize_path());
        let mut url = Url::parse(&base).map_err(|err| AppError::Endpoint {
            provider: self.provider,
            reason: err.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .extend_pairs(self.provider.extra_auth_params())
            .append_pair("scope", self.provider.scope())
            .append_pair("state", state);
        Ok(url)
    }

    pub async fn request_token(&self, code: &str) -> Result<Bearer, AppError> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        if self.provider.sends_redirect_on_exchange() {
            form.push(("redirect_uri", self.redirect_uri.as_str()));
        }

        let url = format!("{}{}", self.accounts_url, self.provider.token_path());
        tracing::debug!(provider = %self.provider, %url, "exchanging authorization code");

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|source| AppError::http(self.provider, source))?;
        let response = check_status(self.provider, response)?;
        response
            .json()
            .await
            .map_err(|source| AppError::http(self.provider, source))
    }
}

pub(crate) fn check_status(
    provider: Provider,
    response: reqwest::Response,
) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::Upstream {
            provider,
            status: status.as_u16(),
        })
    }
}

/// Appends path segments to an API base such as `https://api.spotify.com/v1`.
pub(crate) fn endpoint(
    provider: Provider,
    base: &str,
    segments: &[&str],
) -> Result<Url, AppError> {
    let mut url = Url::parse(base).map_err(|err| AppError::Endpoint {
        provider,
        reason: err.to_string(),
    })?;
    url.path_segments_mut()
        .map_err(|_| AppError::Endpoint {
            provider,
            reason: format!("{} cannot be a base", base),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
