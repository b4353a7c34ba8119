//! Chart generation error types.
//!
//! This module defines errors raised by the chart generation pipeline and its HTTP
//! endpoints, covering group validation, generation lifecycle conflicts, and failures
//! collecting a member's listening data.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::InternalServerError};

/// Chart generation error type.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Group ID does not exist in the database.
    #[error("Group ID {0:?} not found")]
    GroupNotFound(i32),
    /// A generation run already holds the group's generation lease.
    #[error("Chart generation for group ID {0:?} is already in progress")]
    GenerationInProgress(i32),
    /// Stored tracking day is outside the 0 (Sunday) to 6 (Saturday) range.
    #[error("Invalid chart tracking day {0:?}, expected 0 (Sunday) through 6 (Saturday)")]
    InvalidTrackingDay(i32),
    /// Requested chart size is not a positive entry count.
    #[error("Invalid chart size {0:?}, expected a positive number of entries")]
    InvalidChartSize(i32),
    /// Requested chart mode is not one of the supported aggregation modes.
    #[error("Invalid chart mode {0:?}, expected vs, vs_weighted, or plays_only")]
    InvalidChartMode(String),
    /// A member's weekly listening data could not be collected after retries.
    #[error("Failed to collect listening data for member {username:?}")]
    MemberFetchFailed {
        /// Scrobble service username of the affected member.
        username: String,
    },
    /// Too many members failed during a run and the run stopped early.
    #[error("Chart generation aborted after {failed_count} member failures")]
    GenerationAborted {
        /// Number of members that failed before the run gave up.
        failed_count: usize,
    },
    /// The generation lease was reclaimed while the run was still executing.
    ///
    /// Another runner may hold the group by now, so the run stops writing immediately.
    #[error("Generation lease for group ID {group_id:?} was reclaimed before the run finished")]
    LeaseLost {
        /// Group whose lease the run lost.
        group_id: i32,
    },
}

impl ChartError {
    fn client_error(status: StatusCode, message: String) -> Response {
        (status, Json(ErrorDto { error: message })).into_response()
    }
}

/// Converts chart errors into HTTP responses.
///
/// Validation and lifecycle errors map to client-facing status codes with descriptive
/// messages. Fetch and abort errors surface during background runs rather than request
/// handling, so they fall back to generic internal server errors when they do reach HTTP.
///
/// # Returns
/// - 400 Bad Request - Invalid tracking day or chart size on the group
/// - 404 Not Found - Unknown group ID
/// - 409 Conflict - Generation already in progress for the group
/// - 500 Internal Server Error - Member fetch failures and aborted runs
impl IntoResponse for ChartError {
    fn into_response(self) -> Response {
        match self {
            Self::GroupNotFound(group_id) => {
                tracing::debug!(group_id = %group_id, "{}", Self::GroupNotFound(group_id));

                Self::client_error(StatusCode::NOT_FOUND, "Group not found".to_string())
            }
            Self::GenerationInProgress(group_id) => {
                tracing::debug!(
                    group_id = %group_id,
                    "{}",
                    Self::GenerationInProgress(group_id)
                );

                Self::client_error(
                    StatusCode::CONFLICT,
                    "Chart generation is already in progress for this group".to_string(),
                )
            }
            Self::InvalidTrackingDay(day) => Self::client_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid tracking day {day}, expected 0 (Sunday) through 6 (Saturday)"),
            ),
            Self::InvalidChartSize(size) => Self::client_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid chart size {size}, expected a positive number of entries"),
            ),
            Self::InvalidChartMode(mode) => Self::client_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid chart mode {mode:?}, expected vs, vs_weighted, or plays_only"),
            ),
            err => InternalServerError(err).into_response(),
        }
    }
}
