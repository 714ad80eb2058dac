pub mod config;
mod entity;
pub mod error;
pub mod providers;
mod request_handlers;

pub use config::{Config, ConfigError};
pub use entity::{
    most_recent_run, playlist_uris, Activity, CallbackQuery, NewPlaylist, ProviderTokens,
    RunSummary, Sessions, SpotifyToken, StravaToken, Terrain, PLAYLIST_TRACKS,
};
pub use error::AppError;
pub use request_handlers::{
    create_playlist, dashboard, index, link_account, logout, recent_run, spotify_callback,
    spotify_login, strava_callback, strava_login,
};

use actix_identity::IdentityMiddleware;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, web};
use providers::{SpotifyClient, StravaClient};
use std::sync::RwLock;

pub const SESSION_COOKIE: &str = "runners-high";

/// Shared handles registered as app data on every worker.
#[derive(Clone)]
pub struct AppState {
    pub spotify: web::Data<SpotifyClient>,
    pub strava: web::Data<StravaClient>,
    pub sessions: web::Data<RwLock<Sessions>>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(AppState {
            spotify: web::Data::new(SpotifyClient::new(config, http.clone())),
            strava: web::Data::new(StravaClient::new(config, http)),
            sessions: web::Data::new(RwLock::new(Sessions::new(config.session_ttl))),
        })
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.spotify.clone())
            .app_data(self.strava.clone())
            .app_data(self.sessions.clone())
            .service(index)
            .service(spotify_login)
            .service(spotify_callback)
            .service(strava_login)
            .service(strava_callback)
            .service(dashboard)
            .service(recent_run)
            .service(create_playlist)
            .service(logout);
    }
}

pub fn cookie_key(config: &Config) -> Key {
    match &config.secret_key {
        Some(secret) => Key::derive_from(secret.as_bytes()),
        None => {
            tracing::warn!("SECRET_KEY is not set, sessions will not survive a restart");
            Key::generate()
        }
    }
}

pub fn session_middleware(config: &Config, key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_secure(config.secure_cookies())
        .build()
}

pub fn identity_middleware(config: &Config) -> IdentityMiddleware {
    IdentityMiddleware::builder()
        .visit_deadline(Some(config.session_ttl))
        .build()
}
