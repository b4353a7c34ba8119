//! Scrobble API error types.
//!
//! This module defines errors raised while collecting weekly listening charts from the
//! upstream scrobble service. Variants distinguish the failure classes the retry layer
//! cares about: invalid credentials and malformed requests fail permanently, while rate
//! limiting and upstream outages are retried with backoff.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

/// Scrobble API error type.
#[derive(Error, Debug)]
pub enum ScrobbleError {
    /// The member's stored session key was rejected by the scrobble service.
    #[error("Scrobble service rejected the credentials for user {username:?}")]
    InvalidCredential {
        /// Scrobble service username the request was made for.
        username: String,
    },
    /// The scrobble service rejected the request as malformed.
    ///
    /// This indicates a programming error in how Chorus builds chart requests rather
    /// than a transient upstream condition.
    #[error("Scrobble service rejected the request: {reason}")]
    InvalidRequest {
        /// Upstream description of the rejection.
        reason: String,
    },
    /// The scrobble service reported that the client exceeded its rate limit.
    #[error("Scrobble service rate limit exceeded")]
    RateLimited,
    /// The scrobble service is temporarily unavailable.
    #[error("Scrobble service unavailable: {reason}")]
    Unavailable {
        /// Upstream status or failure description.
        reason: String,
    },
    /// A response body could not be decoded into the expected chart format.
    #[error("Failed to decode scrobble service response: {0}")]
    Decode(String),
}

impl IntoResponse for ScrobbleError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
