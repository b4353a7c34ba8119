//! Tests for the get_week_charts endpoint.
//!
//! This module verifies the get_week_charts endpoint's behavior for stored
//! weeks, weeks with no stored chart, and unknown groups.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chorus::server::controller::chart::{get_week_charts, ChartWeekQuery};
use chorus_test_utils::constant::{test_week_range, test_week_start};

use super::*;

/// Tests 200 response for a week with a stored chart.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn ok_for_stored_week() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    let week = test_week_range(0);
    test.listening()
        .insert_chart_with_entry(group.id, week.0, week.1, "radiohead")
        .await?;

    let result = get_week_charts(
        State(test.into_app_state()),
        Path(group.id),
        Query(ChartWeekQuery { week_start: week.0 }),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Tests 404 response for a week with no stored chart.
///
/// Expected: Ok with 404 NOT_FOUND response
#[tokio::test]
async fn not_found_for_unstored_week() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    let week = test_week_range(0);
    test.listening()
        .insert_chart_with_entry(group.id, week.0, week.1, "radiohead")
        .await?;

    let result = get_week_charts(
        State(test.into_app_state()),
        Path(group.id),
        Query(ChartWeekQuery {
            week_start: test_week_start(1),
        }),
    )
    .await;

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

    let result = get_week_charts(
        State(test.into_app_state()),
        Path(999),
        Query(ChartWeekQuery {
            week_start: test_week_start(0),
        }),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
