//! Tests for the get_generation_status endpoint.
//!
//! This module verifies the get_generation_status endpoint's behavior for
//! groups without any recorded runs, groups carrying the outcome of a finished
//! run, and unknown groups.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chorus::server::controller::chart::get_generation_status;
use chrono::Utc;
use sea_orm::{EntityTrait, Set};

use super::*;

/// Tests 200 response for a group that never generated.
///
/// Verifies that a group without a generation state row reports an idle status
/// rather than an error.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn ok_idle_for_group_without_runs() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let result = get_generation_status(State(test.into_app_state()), Path(group.id)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Tests 200 response for a group with a recorded aborted run.
///
/// Verifies that a stored generation state row with failed members and an
/// aborted outcome still renders as a normal status response.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn ok_after_recorded_failures() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let now = Utc::now().naive_utc();
    entity::prelude::GroupGenerationState::insert(entity::group_generation_state::ActiveModel {
        group_id: Set(group.id),
        in_progress: Set(false),
        owner_token: Set(None),
        lease_expires_at: Set(None),
        started_at: Set(Some(now)),
        current_week: Set(2),
        total_weeks: Set(4),
        stage: Set(None),
        failed_members: Set(serde_json::json!(["bar"])),
        last_run_aborted: Set(true),
        updated_at: Set(now),
        ..Default::default()
    })
    .exec(&test.state.db)
    .await?;

    let result = get_generation_status(State(test.into_app_state()), Path(group.id)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Tests 404 response for a group that does not exist.
///
/// Expected: Err with 404 NOT_FOUND response
#[tokio::test]
async fn not_found_when_group_unknown() -> Result<(), TestError> {
    let test = test_setup_with_chart_tables!()?;

    let result = get_generation_status(State(test.into_app_state()), Path(999)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
