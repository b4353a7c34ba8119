//! Background task error types.
//!
//! This module defines errors related to the in-process task queue used for deferred
//! statistics work. Task errors indicate lifecycle issues (enqueueing after shutdown)
//! rather than failures of the tasks themselves, which are logged by the task pool.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

/// Background task queue error type.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A task was submitted after the queue began shutting down.
    ///
    /// Deferred statistics tasks are best-effort, so callers log and drop the task
    /// rather than failing the operation that produced it.
    #[error("Task queue is shut down, rejected task: {0}")]
    QueueClosed(String),
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
