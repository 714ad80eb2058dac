#![allow(dead_code)]

use actix_web::{
    cookie::Cookie, dev::ServiceResponse, web, App, HttpRequest, HttpResponse, HttpServer,
};
use runners_high::{Config, SESSION_COOKIE};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, Once},
};

pub const SPOTIFY_TOKEN: &str = "spotify-token";
pub const STRAVA_TOKEN: &str = "strava-token";

/// Everything the fake provider was asked to do.
#[derive(Default, Debug)]
pub struct Recorded {
    pub token_forms: Vec<HashMap<String, String>>,
    pub activity_calls: usize,
    pub profile_calls: usize,
    pub playlist_bodies: Vec<Value>,
    pub playlist_owners: Vec<String>,
    pub added_uris: Vec<String>,
}

#[derive(Clone)]
struct FakeState {
    activities: Value,
    activities_status: u16,
    recorded: Arc<Mutex<Recorded>>,
}

/// Both providers' accounts and API hosts served from one local server.
pub struct FakeProvider {
    pub base_url: String,
    pub recorded: Arc<Mutex<Recorded>>,
}

impl FakeProvider {
    pub fn config(&self) -> Config {
        let vars: HashMap<&str, String> = [
            ("SPOTIFY_CLIENT_ID", "spotify-id".to_string()),
            ("SPOTIFY_CLIENT_SECRET", "spotify-secret".to_string()),
            ("STRAVA_CLIENT_ID", "strava-id".to_string()),
            ("STRAVA_CLIENT_SECRET", "strava-secret".to_string()),
            ("SECRET_KEY", "x".repeat(64)),
            ("SPOTIFY_ACCOUNTS_URL", self.base_url.clone()),
            ("SPOTIFY_API_URL", format!("{}/v1", self.base_url)),
            ("STRAVA_URL", self.base_url.clone()),
        ]
        .into_iter()
        .collect();
        Config::from_lookup(|name| vars.get(name).cloned()).expect("test config")
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }
}

fn bearer(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn token(
    form: web::Form<HashMap<String, String>>,
    state: web::Data<FakeState>,
    access_token: &'static str,
) -> HttpResponse {
    let form = form.into_inner();
    let code = form.get("code").cloned().unwrap_or_default();
    state.recorded.lock().unwrap().token_forms.push(form);

    if code == "bad" {
        return HttpResponse::BadRequest().json(json!({ "error": "invalid_grant" }));
    }
    HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
        "refresh_token": "refresh",
        "athlete": { "id": 134815 }
    }))
}

async fn spotify_token(
    form: web::Form<HashMap<String, String>>,
    state: web::Data<FakeState>,
) -> HttpResponse {
    token(form, state, SPOTIFY_TOKEN).await
}

async fn strava_token(
    form: web::Form<HashMap<String, String>>,
    state: web::Data<FakeState>,
) -> HttpResponse {
    token(form, state, STRAVA_TOKEN).await
}

async fn activities(req: HttpRequest, state: web::Data<FakeState>) -> HttpResponse {
    state.recorded.lock().unwrap().activity_calls += 1;
    if bearer(&req) != Some(STRAVA_TOKEN) {
        return HttpResponse::Unauthorized().json(json!({ "message": "Authorization Error" }));
    }
    let status = actix_web::http::StatusCode::from_u16(state.activities_status)
        .unwrap_or(actix_web::http::StatusCode::OK);
    HttpResponse::build(status).json(state.activities.clone())
}

async fn me(req: HttpRequest, state: web::Data<FakeState>) -> HttpResponse {
    state.recorded.lock().unwrap().profile_calls += 1;
    if bearer(&req) != Some(SPOTIFY_TOKEN) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(json!({ "id": "runner 1", "display_name": "Runner" }))
}

async fn create_playlist(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<Value>,
    state: web::Data<FakeState>,
) -> HttpResponse {
    if bearer(&req) != Some(SPOTIFY_TOKEN) {
        return HttpResponse::Unauthorized().finish();
    }
    let body = body.into_inner();
    let name = body["name"].clone();
    {
        let mut recorded = state.recorded.lock().unwrap();
        recorded.playlist_owners.push(path.into_inner());
        recorded.playlist_bodies.push(body);
    }
    HttpResponse::Created().json(json!({
        "id": "pl1",
        "name": name,
        "href": "https://api.spotify.com/v1/playlists/pl1",
        "external_urls": { "spotify": "https://open.spotify.com/playlist/pl1" }
    }))
}

async fn add_tracks(
    req: HttpRequest,
    body: web::Json<Value>,
    state: web::Data<FakeState>,
) -> HttpResponse {
    if bearer(&req) != Some(SPOTIFY_TOKEN) {
        return HttpResponse::Unauthorized().finish();
    }
    let uris = body["uris"]
        .as_array()
        .map(|uris| {
            uris.iter()
                .filter_map(|uri| uri.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    state.recorded.lock().unwrap().added_uris.extend(uris);
    HttpResponse::Created().json(json!({ "snapshot_id": "snap1" }))
}

/// Starts the fake provider. Must be called from inside an actix runtime.
pub fn spawn_provider(activities_body: Value, activities_status: u16) -> FakeProvider {
    // reqwest picks up proxy settings from the environment when a client is built.
    static NO_PROXY: Once = Once::new();
    NO_PROXY.call_once(|| std::env::set_var("NO_PROXY", "127.0.0.1,localhost"));

    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let state = FakeState {
        activities: activities_body,
        activities_status,
        recorded: recorded.clone(),
    };

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .route("/api/token", web::post().to(spotify_token))
            .route("/oauth/token", web::post().to(strava_token))
            .route("/api/v3/athlete/activities", web::get().to(activities))
            .route("/v1/me", web::get().to(me))
            .route("/v1/users/{user_id}/playlists", web::post().to(create_playlist))
            .route("/v1/playlists/{playlist_id}/tracks", web::post().to(add_tracks))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind fake provider");

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());

    FakeProvider {
        base_url: format!("http://{}", addr),
        recorded,
    }
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
}

/// `state` query parameter of an authorize redirect.
pub fn state_param<B>(resp: &ServiceResponse<B>) -> String {
    let location = resp
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .expect("authorize redirect");
    url::Url::parse(location)
        .expect("absolute authorize url")
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .expect("state parameter")
}

/// Visits `/{provider}/login`, evaluating to the issued state and the session cookie.
macro_rules! login {
    ($app:expr, $provider:expr, $cookie:expr) => {{
        let cookie: Option<actix_web::cookie::Cookie<'static>> = $cookie;
        let mut req = actix_web::test::TestRequest::get().uri(&format!("/{}/login", $provider));
        if let Some(cookie) = cookie.clone() {
            req = req.cookie(cookie);
        }
        let resp = actix_web::test::call_service($app, req.to_request()).await;
        let state = $crate::common::state_param(&resp);
        let cookie = $crate::common::session_cookie(&resp)
            .or(cookie)
            .expect("session cookie");
        (state, cookie)
    }};
}

/// Walks `/{provider}/login` then `/{provider}/callback` with the issued state.
///
/// Evaluates to the callback response and the latest session cookie.
macro_rules! link_account {
    ($app:expr, $provider:expr, $code:expr, $cookie:expr) => {{
        let (state, cookie) = $crate::common::login!($app, $provider, $cookie);
        let req = actix_web::test::TestRequest::get()
            .uri(&format!(
                "/{}/callback?code={}&state={}",
                $provider, $code, state
            ))
            .cookie(cookie.clone())
            .to_request();
        let resp = actix_web::test::call_service($app, req).await;
        let cookie = $crate::common::session_cookie(&resp).unwrap_or(cookie);
        (resp, cookie)
    }};
}

pub(crate) use link_account as link;
pub(crate) use login;

macro_rules! init_app {
    ($config:expr) => {{
        let config: &runners_high::Config = $config;
        let state = runners_high::AppState::new(config).expect("http client");
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(runners_high::identity_middleware(config))
                .wrap(runners_high::session_middleware(
                    config,
                    runners_high::cookie_key(config),
                ))
                .configure(move |cfg| state.configure(cfg)),
        )
        .await
    }};
}

pub(crate) use init_app;
