//! Retry classification for application errors.
//!
//! This module maps every application error onto a retry strategy used by the retry
//! context when collecting member listening data. Rate limiting is separated from other
//! transient failures so it can back off on a longer schedule.

use sea_orm::DbErr;

use super::{scrobble::ScrobbleError, Error};

/// Backoff schedule applied to a retryable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffClass {
    /// Ordinary transient failure (upstream outage, dropped connection).
    Transient,
    /// Upstream rate limiting, retried on a longer schedule.
    RateLimited,
}

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff on the given schedule
    Retry(BackoffClass),
    /// Failed permanently (bad request)
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::ScrobbleError(scrobble_err) => match scrobble_err {
                // Upstream asked us to slow down, retry on the long schedule
                ScrobbleError::RateLimited => ErrorRetryStrategy::Retry(BackoffClass::RateLimited),

                // Upstream outage, retry after backoff
                ScrobbleError::Unavailable { .. } => {
                    ErrorRetryStrategy::Retry(BackoffClass::Transient)
                }

                // Rejected credentials won't become valid by retrying
                ScrobbleError::InvalidCredential { .. } => ErrorRetryStrategy::Fail,

                // We're making invalid requests to the scrobble service, this is a flaw
                // in the code that needs to be fixed
                ScrobbleError::InvalidRequest { .. } => ErrorRetryStrategy::Fail,

                // Response format mismatch, retrying returns the same body
                ScrobbleError::Decode(_) => ErrorRetryStrategy::Fail,
            },

            Self::ReqwestError(reqwest_error) => {
                if let Some(status) = reqwest_error.status() {
                    match status {
                        // Upstream is temporarily unavailable, backoff and retry later
                        s if s.is_server_error() => {
                            ErrorRetryStrategy::Retry(BackoffClass::Transient)
                        }

                        // Client errors indicate a flaw in how we build requests
                        s if s.is_client_error() => ErrorRetryStrategy::Fail,

                        // Unexpected response
                        _ => ErrorRetryStrategy::Fail,
                    }
                } else {
                    // Network error or connection issue - should retry
                    ErrorRetryStrategy::Retry(BackoffClass::Transient)
                }
            }

            Self::DbErr(db_err) => {
                match db_err {
                    // Connection acquisition errors - transient, should retry
                    DbErr::ConnectionAcquire(_) => {
                        ErrorRetryStrategy::Retry(BackoffClass::Transient)
                    }
                    // Connection errors - transient, should retry
                    DbErr::Conn(_) => ErrorRetryStrategy::Retry(BackoffClass::Transient),

                    // All other database errors are permanent failures:
                    // - Query errors (constraint violations, syntax errors, etc.)
                    // - Type conversion errors
                    // - Schema/migration errors
                    // - Record not found/inserted/updated
                    // These indicate programming bugs or data issues that won't resolve with retry
                    _ => ErrorRetryStrategy::Fail,
                }
            }

            // Chart errors - permanent failures (lifecycle and validation)
            Self::ChartError(_) => ErrorRetryStrategy::Fail,

            // Configuration errors - permanent failures, won't resolve with retry
            Self::ConfigError(_) => ErrorRetryStrategy::Fail,

            // Task queue errors - permanent failures (queue already shut down)
            Self::TaskError(_) => ErrorRetryStrategy::Fail,

            // Parse errors - permanent failures (bad data format)
            Self::ParseError(_) => ErrorRetryStrategy::Fail,

            // InternalError - permanent failures (internal error within Chorus's code)
            Self::InternalError(_) => ErrorRetryStrategy::Fail,

            // Job scheduler errors - permanent failures (configuration issue)
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
