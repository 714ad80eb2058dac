use crate::{
    entity::{
        most_recent_run, playlist_uris, CallbackQuery, NewPlaylist, RunSummary, Sessions,
        SpotifyToken, StravaToken,
    },
    error::AppError,
    providers::{OAuthClient, Provider, SpotifyClient, StravaClient},
};
use actix_identity::Identity;
use actix_session::Session;
use actix_web::{get, http::header, post, web, HttpMessage, HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};

#[derive(Serialize, Debug)]
struct Failure {
    error: String,
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("index.html"))
}

fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirects to the provider, remembering a fresh `state` nonce in the session.
fn authorize(client: &OAuthClient, session: &Session) -> Result<HttpResponse, AppError> {
    let provider = client.provider();
    let state = uuid::Uuid::new_v4().to_string();
    session
        .insert(provider.state_key(), &state)
        .map_err(|err| AppError::Session(err.to_string()))?;

    let auth_url = client.auth_url(&state)?;
    tracing::info!("authorize {}: {}", provider, auth_url);
    Ok(found(auth_url.as_str()))
}

/// Takes the pending nonce out of the session so it cannot be replayed.
fn check_state(
    provider: Provider,
    query: &CallbackQuery,
    session: &Session,
) -> Result<(), AppError> {
    let pending = session
        .get::<String>(provider.state_key())
        .map_err(|err| AppError::Session(err.to_string()))?;
    session.remove(provider.state_key());

    match (pending, query.state.as_deref()) {
        (Some(pending), Some(state)) if pending == state => Ok(()),
        _ => Err(AppError::StateMismatch(provider)),
    }
}

#[get("/spotify/login")]
pub async fn spotify_login(
    spotify: web::Data<SpotifyClient>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    authorize(&spotify.oauth, &session)
}

#[get("/strava/login")]
pub async fn strava_login(
    strava: web::Data<StravaClient>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    authorize(&strava.oauth, &session)
}

/// Exchanges the callback code and stores the token under the browser's identity,
/// logging in a fresh identity when the browser has none yet.
pub async fn link_account(
    client: &OAuthClient,
    query: &CallbackQuery,
    req: &HttpRequest,
    session: &Session,
    identity: Option<Identity>,
    sessions: &RwLock<Sessions>,
) -> Result<HttpResponse, AppError> {
    let provider = client.provider();
    check_state(provider, query, session)?;
    if let Some(error) = &query.error {
        return Err(AppError::Denied(provider, error.clone()));
    }
    let code = query
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or(AppError::MissingCode(provider))?;

    let bearer = client.request_token(code).await?;
    tracing::debug!(
        "{} granted token type {:?}, scope {:?}",
        provider,
        bearer.token_type,
        bearer.scope
    );

    let id = match identity.and_then(|identity| identity.id().ok()) {
        Some(id) => id,
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            Identity::login(&req.extensions(), id.clone())
                .map_err(|err| AppError::Identity(err.to_string()))?;
            id
        }
    };

    tracing::info!("linked {} for session {}", provider, id);
    sessions
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .store(id, provider, bearer.access_token);

    Ok(found("/dashboard"))
}

#[get("/spotify/callback")]
pub async fn spotify_callback(
    req: HttpRequest,
    spotify: web::Data<SpotifyClient>,
    query: web::Query<CallbackQuery>,
    session: Session,
    sessions: web::Data<RwLock<Sessions>>,
    identity: Option<Identity>,
) -> Result<HttpResponse, AppError> {
    link_account(&spotify.oauth, &query, &req, &session, identity, &sessions).await
}

#[get("/strava/callback")]
pub async fn strava_callback(
    req: HttpRequest,
    strava: web::Data<StravaClient>,
    query: web::Query<CallbackQuery>,
    session: Session,
    sessions: web::Data<RwLock<Sessions>>,
    identity: Option<Identity>,
) -> Result<HttpResponse, AppError> {
    link_account(&strava.oauth, &query, &req, &session, identity, &sessions).await
}

#[get("/dashboard")]
pub async fn dashboard(
    sessions: web::Data<RwLock<Sessions>>,
    identity: Option<Identity>,
) -> impl Responder {
    let tokens = identity
        .and_then(|identity| identity.id().ok())
        .and_then(|id| {
            sessions
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .tokens(&id)
        })
        .unwrap_or_default();

    let status = |provider: Provider| {
        if tokens.get(provider).is_some() {
            format!("<li>{}: linked</li>", provider)
        } else {
            format!(
                r#"<li>{}: <a href="{}">connect</a></li>"#,
                provider,
                provider.login_path()
            )
        }
    };

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<p>OAuth complete! Ready to fetch run + music data.</p>\n<ul>\n{}\n{}\n</ul>",
            status(Provider::Strava),
            status(Provider::Spotify)
        ))
}

#[get("/strava/recent_run")]
pub async fn recent_run(
    strava: web::Data<StravaClient>,
    token: StravaToken,
) -> Result<HttpResponse, AppError> {
    let activities = strava.athlete_activities(&token.0).await?;
    tracing::debug!("fetched {} activities", activities.len());

    Ok(match most_recent_run(&activities) {
        Some(run) => HttpResponse::Ok().json(RunSummary::from(run)),
        None => HttpResponse::Ok().json(Failure {
            error: "No runs found.".to_string(),
        }),
    })
}

#[post("/spotify/create_playlist")]
pub async fn create_playlist(
    spotify: web::Data<SpotifyClient>,
    token: SpotifyToken,
) -> Result<HttpResponse, AppError> {
    let user = spotify.current_user(&token.0).await?;
    let playlist = spotify
        .create_playlist(&token.0, &user.id, &NewPlaylist::default())
        .await?;
    let uris = playlist_uris();
    spotify.add_tracks(&token.0, &playlist.id, &uris).await?;

    tracing::info!(
        "created playlist {} with {} tracks for {}",
        playlist.id,
        uris.len(),
        user.display_name.as_deref().unwrap_or(&user.id)
    );

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            r#"<p>Playlist created!</p><a href="{}">{}</a>"#,
            escape_html(playlist.link()),
            escape_html(&playlist.name)
        )))
}

#[post("/logout")]
pub async fn logout(
    sessions: web::Data<RwLock<Sessions>>,
    identity: Option<Identity>,
) -> impl Responder {
    if let Some(identity) = identity {
        if let Ok(id) = identity.id() {
            let removed = sessions
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
            tracing::info!("logout session {}: {:?}", id, removed.is_some());
        }
        identity.logout();
    }

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
