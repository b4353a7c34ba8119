//! Error types for the Chorus server application.
//!
//! This module provides a comprehensive error handling system with specialized error types
//! for different domains (chart generation, configuration, scrobble API integration, task
//! queue). All errors implement `IntoResponse` for Axum HTTP responses and use `thiserror`
//! for ergonomic error definitions with automatic `Display` and `Error` trait implementations.

pub mod chart;
pub mod config;
pub mod retry;
pub mod scrobble;
pub mod task;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        chart::ChartError, config::ConfigError, scrobble::ScrobbleError, task::TaskError,
    },
};

/// Main error type for the Chorus server application.
///
/// This enum aggregates all domain-specific error types and external library errors into a
/// single unified error type. It uses `thiserror`'s `#[from]` attribute to enable automatic
/// conversion from underlying error types via the `?` operator. The `IntoResponse` implementation
/// maps errors to appropriate HTTP responses for API consumers.
///
/// # Error Categories
/// - Chart errors (generation lifecycle, validation, missing groups)
/// - Configuration errors (missing/invalid environment variables)
/// - Scrobble API errors (credentials, rate limiting, upstream failures)
/// - Task queue errors (enqueue after shutdown)
/// - External library errors (database, HTTP client, scheduler)
#[derive(Error, Debug)]
pub enum Error {
    /// Chart generation error (lifecycle, validation, missing groups).
    #[error(transparent)]
    ChartError(#[from] ChartError),
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Scrobble API error (credentials, rate limiting, upstream failures).
    #[error(transparent)]
    ScrobbleError(#[from] ScrobbleError),
    /// Task queue error (enqueue after shutdown).
    #[error(transparent)]
    TaskError(#[from] TaskError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in Chorus's code.
    ///
    /// This error should never occur in normal operation and indicates a programming error
    /// that needs to be reported as a GitHub issue.
    #[error("Internal error with Chorus's code, please open a GitHub issue as this indicates a bug: {0:?}")]
    InternalError(String),
    /// HTTP client error (request construction, connection failures).
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Converts application errors into HTTP responses.
///
/// Maps domain-specific errors to appropriate HTTP status codes and JSON error responses.
/// Most errors are treated as internal server errors (500) with logging, while `ChartError`
/// carries its own mapping for client-facing generation endpoints.
///
/// # Returns
/// - 400 Bad Request - For invalid group chart settings
/// - 404 Not Found - For missing groups or charts
/// - 409 Conflict - For generation requests while a run is already in progress
/// - 500 Internal Server Error - For all other errors (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ChartError(err) => err.into_response(),
            Self::ConfigError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Fallback wrapper that turns any displayable error into a 500 response.
///
/// The wrapped error is logged in full; the client only ever sees a generic
/// "Internal server error" body so internal details never leak through the API.
pub struct InternalServerError<E>(pub E);

/// Logs the wrapped error and responds with a generic 500 JSON body.
///
/// # Arguments
/// - `E` - Any type implementing `Display`, typically one of the error enums above
///
/// # Returns
/// A 500 Internal Server Error response with a generic JSON error message
impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
