//! Tests for the get_records endpoint.
//!
//! This module verifies the get_records endpoint's behavior for groups with
//! stored records, groups without any records yet, and unknown groups.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chorus::server::controller::chart::get_records;
use chorus_test_utils::constant::test_week_start;
use chrono::Utc;
use entity::types::{ChartCategory, RecordKind};
use sea_orm::{EntityTrait, Set};

use super::*;

/// Tests 200 response with stored records.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn ok_with_stored_records() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    entity::prelude::GroupRecord::insert(entity::group_record::ActiveModel {
        group_id: Set(group.id),
        category: Set(ChartCategory::Artist),
        record_kind: Set(RecordKind::WeeksOnChart),
        entry_key: Set("radiohead".to_string()),
        name: Set("Radiohead".to_string()),
        artist: Set(None),
        value: Set(5),
        week_start: Set(None),
        updated_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    })
    .exec(&test.state.db)
    .await?;

    entity::prelude::GroupRecord::insert(entity::group_record::ActiveModel {
        group_id: Set(group.id),
        category: Set(ChartCategory::Artist),
        record_kind: Set(RecordKind::WeekPlaycount),
        entry_key: Set("radiohead".to_string()),
        name: Set("Radiohead".to_string()),
        artist: Set(None),
        value: Set(113),
        week_start: Set(Some(test_week_start(0))),
        updated_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    })
    .exec(&test.state.db)
    .await?;

    let result = get_records(State(test.into_app_state()), Path(group.id)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Tests 200 response for a group without any records yet.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn ok_empty_for_group_without_records() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let result = get_records(State(test.into_app_state()), Path(group.id)).await;

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

    let result = get_records(State(test.into_app_state()), Path(999)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
