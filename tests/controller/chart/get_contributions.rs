//! Tests for the get_contributions endpoint.
//!
//! This module verifies the get_contributions endpoint's behavior for groups
//! with stored contribution totals, groups without any statistics yet, and
//! unknown groups.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chorus::server::controller::chart::get_contributions;
use chrono::Utc;
use sea_orm::{EntityTrait, Set};

use super::*;

/// Tests 200 response with stored member totals.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn ok_with_member_totals() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    let member = test.group().insert_member(group.id, "foo").await?;

    entity::prelude::GroupMemberContribution::insert(
        entity::group_member_contribution::ActiveModel {
            group_id: Set(group.id),
            member_id: Set(member.id),
            total_score: Set(296.5),
            total_playcount: Set(21),
            artist_debuts: Set(2),
            track_debuts: Set(1),
            album_debuts: Set(0),
            artist_number_ones: Set(1),
            track_number_ones: Set(1),
            album_number_ones: Set(0),
            mvp_weeks: Set(1),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        },
    )
    .exec(&test.state.db)
    .await?;

    let result = get_contributions(State(test.into_app_state()), Path(group.id)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Tests 200 response for a group without any statistics yet.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn ok_empty_for_group_without_statistics() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let result = get_contributions(State(test.into_app_state()), Path(group.id)).await;

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

    let result = get_contributions(State(test.into_app_state()), Path(999)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
