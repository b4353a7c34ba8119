//! Tests for the get_latest_charts endpoint.
//!
//! This module verifies the get_latest_charts endpoint's behavior for groups
//! with stored charts, groups that never generated, and unknown groups.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chorus::server::controller::chart::get_latest_charts;
use chorus_test_utils::constant::test_week_range;

use super::*;

/// Tests 200 response with the most recent stored chart.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn ok_with_latest_stored_chart() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    let week = test_week_range(0);
    test.listening()
        .insert_chart_with_entry(group.id, week.0, week.1, "radiohead")
        .await?;

    let result = get_latest_charts(State(test.into_app_state()), Path(group.id)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Tests 404 response for a group that never generated a chart.
///
/// Expected: Ok with 404 NOT_FOUND response
#[tokio::test]
async fn not_found_when_group_has_no_charts() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let result = get_latest_charts(State(test.into_app_state()), Path(group.id)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Tests 404 response for a group that does not exist.
///
/// Expected: Err with 404 NOT_FOUND response
#[tokio::test]
async fn not_found_when_group_unknown() -> Result<(), TestError> {
    let test = test_setup_with_chart_tables!()?;

    let result = get_latest_charts(State(test.into_app_state()), Path(999)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
