//! Tests for the rebuild_stats endpoint.
//!
//! This module verifies that a rebuild request is accepted and queued as a
//! background job, and that unknown groups are rejected without queuing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chorus::server::{controller::chart::rebuild_stats, model::task::TaskJob};

use super::*;

/// Tests 202 response and that a rebuild job lands on the task queue.
///
/// Expected: Ok with 202 ACCEPTED response and one queued job
#[tokio::test]
async fn accepted_and_queues_rebuild_job() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    let state = test.into_app_state();

    let result = rebuild_stats(State(state.clone()), Path(group.id)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    assert_eq!(
        state.tasks.pop().await,
        Some(TaskJob::RebuildStats { group_id: group.id })
    );
    assert_eq!(state.tasks.pop().await, None);

    Ok(())
}

/// Tests 404 response for a group that does not exist.
///
/// Expected: Err with 404 NOT_FOUND response and an empty task queue
#[tokio::test]
async fn not_found_when_group_unknown() -> Result<(), TestError> {
    let test = test_setup_with_chart_tables!()?;

    let state = test.into_app_state();

    let result = rebuild_stats(State(state.clone()), Path(999)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert!(state.tasks.is_empty().await);

    Ok(())
}
