use super::{check_status, endpoint, OAuthClient, Provider};
use crate::{config::Config, entity::Activity, error::AppError};

pub struct StravaClient {
    pub oauth: OAuthClient,
    api_url: String,
    http: reqwest::Client,
}

impl StravaClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        let provider = Provider::Strava;
        StravaClient {
            oauth: OAuthClient::new(
                provider,
                &config.strava,
                config.host(provider.callback_path()),
                http.clone(),
            ),
            api_url: config.strava.api_url.clone(),
            http,
        }
    }

    /// First page of the athlete's activities, newest first.
    pub async fn athlete_activities(&self, token: &str) -> Result<Vec<Activity>, AppError> {
        let url = endpoint(Provider::Strava, &self.api_url, &["athlete", "activities"])?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| AppError::http(Provider::Strava, source))?;
        check_status(Provider::Strava, response)?
            .json()
            .await
            .map_err(|source| AppError::http(Provider::Strava, source))
    }
}
