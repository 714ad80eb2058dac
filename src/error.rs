use crate::providers::Provider;
use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} account is not linked")]
    NotLinked(Provider),
    #[error("{0} callback state does not match a pending authorization")]
    StateMismatch(Provider),
    #[error("{0} callback is missing the authorization code")]
    MissingCode(Provider),
    #[error("{0} authorization was denied: {1}")]
    Denied(Provider, String),
    #[error("{provider} request failed: {source}")]
    Http {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} responded with status {status}")]
    Upstream { provider: Provider, status: u16 },
    #[error("{provider} endpoint is invalid: {reason}")]
    Endpoint { provider: Provider, reason: String },
    #[error("identity error: {0}")]
    Identity(String),
    #[error("session error: {0}")]
    Session(String),
}

impl AppError {
    pub fn http(provider: Provider, source: reqwest::Error) -> Self {
        AppError::Http { provider, source }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotLinked(_) => StatusCode::FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotLinked(provider) => {
                tracing::info!("{} token missing, redirecting to login", provider);
                HttpResponse::Found()
                    .insert_header((header::LOCATION, provider.login_path()))
                    .finish()
            }
            err => {
                tracing::warn!("request failed: {}", err);
                HttpResponse::BadRequest()
                    .content_type("text/plain; charset=utf-8")
                    .body(format!("Error: {}", err))
            }
        }
    }
}
