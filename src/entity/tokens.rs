use crate::{entity::Sessions, error::AppError, providers::Provider};
use actix_identity::Identity;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::{
    future::Future,
    pin::Pin,
    sync::{PoisonError, RwLock},
};

type TokenFuture<T> = Pin<Box<dyn Future<Output = Result<T, AppError>>>>;

/// Spotify bearer token linked to the requesting browser.
#[derive(Debug)]
pub struct SpotifyToken(pub String);

/// Strava bearer token linked to the requesting browser.
#[derive(Debug)]
pub struct StravaToken(pub String);

fn linked_token(req: &HttpRequest, pl: &mut Payload, provider: Provider) -> TokenFuture<String> {
    let fut = Identity::from_request(req, pl);
    let sessions = req.app_data::<web::Data<RwLock<Sessions>>>().cloned();

    Box::pin(async move {
        let sessions = sessions
            .ok_or_else(|| AppError::Identity("session store is not configured".to_string()))?;
        let id = fut
            .await
            .ok()
            .and_then(|identity| identity.id().ok())
            .ok_or(AppError::NotLinked(provider))?;

        let token = sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .token(&id, provider);
        token.ok_or(AppError::NotLinked(provider))
    })
}

impl FromRequest for SpotifyToken {
    type Error = AppError;
    type Future = TokenFuture<Self>;

    fn from_request(req: &HttpRequest, pl: &mut Payload) -> Self::Future {
        let fut = linked_token(req, pl, Provider::Spotify);
        Box::pin(async move { fut.await.map(SpotifyToken) })
    }
}

impl FromRequest for StravaToken {
    type Error = AppError;
    type Future = TokenFuture<Self>;

    fn from_request(req: &HttpRequest, pl: &mut Payload) -> Self::Future {
        let fut = linked_token(req, pl, Provider::Strava);
        Box::pin(async move { fut.await.map(StravaToken) })
    }
}
