//! Tests for the generate_charts endpoint.
//!
//! This module verifies the generate_charts endpoint's behavior, including
//! accepting a run that then generates in the background, rejecting invalid
//! chart settings, and refusing to start while another run holds the group's
//! generation lease.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chorus::{model::api::GenerateChartsDto, server::controller::chart::generate_charts};
use chrono::{Duration, Utc};
use entity::types::GenerationStage;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use super::*;

fn settings(
    chart_mode: Option<&str>,
    chart_size: Option<i32>,
    tracking_day: Option<i32>,
) -> GenerateChartsDto {
    GenerateChartsDto {
        chart_mode: chart_mode.map(str::to_string),
        chart_size,
        tracking_day,
    }
}

/// Tests that a valid request is accepted and generates in the background.
///
/// Verifies that the generate_charts endpoint returns a 202 ACCEPTED response
/// and that the spawned run produces the group's latest chart week from the
/// mocked member data.
///
/// Expected: Ok with 202 ACCEPTED response and a stored chart week
#[tokio::test]
async fn accepted_and_generates_in_background() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    test.group().insert_member(group.id, "foo").await?;

    test.scrobble()
        .mock_weekly_artist_chart("foo", &[("Radiohead", 7)], 1)
        .await;
    test.scrobble().mock_weekly_track_chart("foo", &[], 1).await;
    test.scrobble().mock_weekly_album_chart("foo", &[], 1).await;

    let state = test.into_app_state();

    let result = generate_charts(
        State(state.clone()),
        Path(group.id),
        Json(settings(Some("vs"), None, None)),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let service = generation_service(&state);
    let status = wait_until_idle(&service, group.id).await;
    assert!(!status.last_run_aborted);

    let charts = entity::prelude::GroupWeekChart::find()
        .filter(entity::group_week_chart::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(charts.len(), 1);

    test.assert_mocks().await;

    Ok(())
}

/// Tests 409 response while another run holds the generation lease.
///
/// Verifies that the generate_charts endpoint refuses to start a run when the
/// group's generation state carries a live lease owned by another runner.
///
/// Expected: Err with 409 CONFLICT response
#[tokio::test]
async fn conflict_while_generation_in_progress() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let now = Utc::now().naive_utc();
    entity::prelude::GroupGenerationState::insert(entity::group_generation_state::ActiveModel {
        group_id: Set(group.id),
        in_progress: Set(true),
        owner_token: Set(Some("11111111222222223333333344444444".to_string())),
        lease_expires_at: Set(Some(now + Duration::minutes(10))),
        started_at: Set(Some(now)),
        current_week: Set(1),
        total_weeks: Set(3),
        stage: Set(Some(GenerationStage::Fetching)),
        failed_members: Set(serde_json::json!([])),
        last_run_aborted: Set(false),
        updated_at: Set(now),
        ..Default::default()
    })
    .exec(&test.state.db)
    .await?;

    let result = generate_charts(
        State(test.into_app_state()),
        Path(group.id),
        Json(settings(None, None, None)),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}

/// Tests 404 response for a group that does not exist.
///
/// Expected: Err with 404 NOT_FOUND response
#[tokio::test]
async fn not_found_when_group_unknown() -> Result<(), TestError> {
    let test = test_setup_with_chart_tables!()?;

    let result = generate_charts(
        State(test.into_app_state()),
        Path(999),
        Json(settings(None, None, None)),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Tests 400 response for an unknown chart mode.
///
/// Expected: Err with 400 BAD_REQUEST response
#[tokio::test]
async fn bad_request_for_unknown_chart_mode() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let result = generate_charts(
        State(test.into_app_state()),
        Path(group.id),
        Json(settings(Some("leaderboard"), None, None)),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Tests 400 response for a chart size below one.
///
/// Expected: Err with 400 BAD_REQUEST response
#[tokio::test]
async fn bad_request_for_zero_chart_size() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let result = generate_charts(
        State(test.into_app_state()),
        Path(group.id),
        Json(settings(None, Some(0), None)),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Tests 400 response for a tracking day outside the weekday range.
///
/// Expected: Err with 400 BAD_REQUEST response
#[tokio::test]
async fn bad_request_for_out_of_range_tracking_day() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let result = generate_charts(
        State(test.into_app_state()),
        Path(group.id),
        Json(settings(None, None, Some(7))),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
