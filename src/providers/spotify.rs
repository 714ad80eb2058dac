use super::{check_status, endpoint, OAuthClient, Provider};
use crate::{config::Config, entity::NewPlaylist, error::AppError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Deserialize, Debug)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// API address of the playlist.
    pub href: String,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl Playlist {
    /// Link for humans, falling back to the API address.
    pub fn link(&self) -> &str {
        self.external_urls
            .get("spotify")
            .map(String::as_str)
            .unwrap_or(&self.href)
    }
}

#[derive(Serialize)]
struct AddTracks<'a> {
    uris: &'a [String],
}

pub struct SpotifyClient {
    pub oauth: OAuthClient,
    api_url: String,
    http: reqwest::Client,
}

impl SpotifyClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        let provider = Provider::Spotify;
        SpotifyClient {
            oauth: OAuthClient::new(
                provider,
                &config.spotify,
                config.host(provider.callback_path()),
                http.clone(),
            ),
            api_url: config.spotify.api_url.clone(),
            http,
        }
    }

    pub async fn current_user(&self, token: &str) -> Result<SpotifyUser, AppError> {
        let url = endpoint(Provider::Spotify, &self.api_url, &["me"])?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| AppError::http(Provider::Spotify, source))?;
        check_status(Provider::Spotify, response)?
            .json()
            .await
            .map_err(|source| AppError::http(Provider::Spotify, source))
    }

    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<Playlist, AppError> {
        let url = endpoint(
            Provider::Spotify,
            &self.api_url,
            &["users", user_id, "playlists"],
        )?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(playlist)
            .send()
            .await
            .map_err(|source| AppError::http(Provider::Spotify, source))?;
        check_status(Provider::Spotify, response)?
            .json()
            .await
            .map_err(|source| AppError::http(Provider::Spotify, source))
    }

    pub async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), AppError> {
        let url = endpoint(
            Provider::Spotify,
            &self.api_url,
            &["playlists", playlist_id, "tracks"],
        )?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&AddTracks { uris })
            .send()
            .await
            .map_err(|source| AppError::http(Provider::Spotify, source))?;
        check_status(Provider::Spotify, response)?;
        Ok(())
    }
}
