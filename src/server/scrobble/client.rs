//! HTTP client for the scrobble service's weekly chart endpoints.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::server::error::{scrobble::ScrobbleError, Error};
use crate::server::scrobble::limiter::RateLimiter;
use crate::server::scrobble::model::{
    ApiErrorBody, TopListItem, WeeklyAlbumChartResponse, WeeklyArtistChartResponse,
    WeeklyTrackChartResponse,
};

/// Connection settings for the scrobble service.
#[derive(Debug, Clone)]
pub struct ScrobbleConfig {
    /// Base URL of the scrobble API, without a trailing slash.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// User agent identifying this application to the upstream service.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Client for collecting members' weekly listening charts.
///
/// Every request first acquires a token from the shared rate limiter, so concurrent
/// member fetches collectively stay inside the upstream request allowance. Cloning the
/// client shares the underlying connection pool and limiter.
#[derive(Clone)]
pub struct ScrobbleClient {
    http: reqwest::Client,
    config: ScrobbleConfig,
    limiter: RateLimiter,
}

impl ScrobbleClient {
    /// Builds a client from connection settings and a shared rate limiter.
    pub fn new(config: ScrobbleConfig, limiter: RateLimiter) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            limiter,
        })
    }

    /// Fetches a member's weekly artist chart for the interval `[from, to)`.
    pub async fn weekly_artist_chart(
        &self,
        username: &str,
        session_key: Option<&str>,
        from: i64,
        to: i64,
    ) -> Result<Vec<TopListItem>, Error> {
        let response: WeeklyArtistChartResponse = self
            .get_chart("user.getweeklyartistchart", username, session_key, from, to)
            .await?;

        Ok(response.weeklyartistchart.into_items())
    }

    /// Fetches a member's weekly track chart for the interval `[from, to)`.
    pub async fn weekly_track_chart(
        &self,
        username: &str,
        session_key: Option<&str>,
        from: i64,
        to: i64,
    ) -> Result<Vec<TopListItem>, Error> {
        let response: WeeklyTrackChartResponse = self
            .get_chart("user.getweeklytrackchart", username, session_key, from, to)
            .await?;

        Ok(response.weeklytrackchart.into_items())
    }

    /// Fetches a member's weekly album chart for the interval `[from, to)`.
    pub async fn weekly_album_chart(
        &self,
        username: &str,
        session_key: Option<&str>,
        from: i64,
        to: i64,
    ) -> Result<Vec<TopListItem>, Error> {
        let response: WeeklyAlbumChartResponse = self
            .get_chart("user.getweeklyalbumchart", username, session_key, from, to)
            .await?;

        Ok(response.weeklyalbumchart.into_items())
    }

    /// Performs a rate-limited chart request and classifies failures.
    async fn get_chart<T: DeserializeOwned>(
        &self,
        method: &str,
        username: &str,
        session_key: Option<&str>,
        from: i64,
        to: i64,
    ) -> Result<T, Error> {
        self.limiter.acquire(1).await;

        let url = format!("{}/2.0/", self.config.base_url);

        let mut query = vec![
            ("method", method.to_string()),
            ("user", username.to_string()),
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("api_key", self.config.api_key.clone()),
            ("format", "json".to_string()),
        ];

        if let Some(sk) = session_key {
            query.push(("sk", sk.to_string()));
        }

        let response = self.http.get(url).query(&query).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::classify_status(status, username, &body));
        }

        // Some upstream failures arrive as a 200 with an error payload instead of a
        // chart envelope.
        if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(&body) {
            return Err(Self::classify_api_error(api_error, username));
        }

        serde_json::from_str::<T>(&body)
            .map_err(|e| Error::ScrobbleError(ScrobbleError::Decode(e.to_string())))
    }

    fn classify_status(
        status: reqwest::StatusCode,
        username: &str,
        body: &str,
    ) -> Error {
        let scrobble_error = match status {
            reqwest::StatusCode::TOO_MANY_REQUESTS => ScrobbleError::RateLimited,
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ScrobbleError::InvalidCredential {
                    username: username.to_string(),
                }
            }
            s if s.is_server_error() => ScrobbleError::Unavailable {
                reason: format!("status {s}"),
            },
            s => ScrobbleError::InvalidRequest {
                reason: format!("status {s}: {}", body.chars().take(200).collect::<String>()),
            },
        };

        Error::ScrobbleError(scrobble_error)
    }

    fn classify_api_error(api_error: ApiErrorBody, username: &str) -> Error {
        let scrobble_error = match api_error.error {
            // Rate limit exceeded
            29 => ScrobbleError::RateLimited,
            // Authentication failures: bad session, invalid or suspended API key
            4 | 9 | 10 | 13 | 26 => ScrobbleError::InvalidCredential {
                username: username.to_string(),
            },
            // Operation failed or service offline
            8 | 11 | 16 => ScrobbleError::Unavailable {
                reason: api_error.message,
            },
            _ => ScrobbleError::InvalidRequest {
                reason: api_error.message,
            },
        };

        Error::ScrobbleError(scrobble_error)
    }
}
