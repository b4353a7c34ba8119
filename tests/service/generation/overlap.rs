//! Tests for replacement of overlapping chart weeks.
//!
//! This module verifies that regenerating after a tracking day change deletes
//! stored charts whose boundaries overlap the new week grid, and that a group
//! whose charts are already up to date is left untouched.

use chorus::{
    model::api::GenerateChartsDto,
    server::util::week::{latest_finished_week_start, tracking_weekday, WeekRange},
};
use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::*;

fn no_settings() -> GenerateChartsDto {
    GenerateChartsDto {
        chart_mode: None,
        chart_size: None,
        tracking_day: None,
    }
}

/// Tests that a stored chart overlapping the regenerated week is replaced.
///
/// A chart is seeded three days off the group's current week grid, as a
/// tracking day change leaves behind. Regenerating produces the latest
/// grid-aligned week, which overlaps the stale chart; the stale chart and its
/// entries must be deleted in the same transaction that stores the new week.
///
/// Expected: Ok with the misaligned chart and its entries gone
#[tokio::test]
async fn replaces_overlapping_chart_when_regenerating() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let expected_start =
        latest_finished_week_start(Utc::now(), tracking_weekday(0).unwrap()).unwrap();
    let expected = WeekRange::starting_at(expected_start).unwrap();

    let stale = test
        .listening()
        .insert_chart_with_entry(
            group.id,
            expected.start - Duration::days(3),
            expected.end - Duration::days(3),
            "radiohead",
        )
        .await?;

    let state = test.into_app_state();
    let service = generation_service(&state);

    let result = service.start(group.id, &no_settings()).await;
    assert!(result.is_ok());

    let status = wait_until_idle(&service, group.id).await;
    assert!(!status.last_run_aborted);

    let charts = entity::prelude::GroupWeekChart::find()
        .filter(entity::group_week_chart::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(charts.len(), 1);
    assert_ne!(charts[0].id, stale.id);
    assert_eq!(charts[0].week_start, expected.start);
    assert_eq!(charts[0].week_end, expected.end);

    let stale_entries = entity::prelude::GroupWeekEntry::find()
        .filter(entity::group_week_entry::Column::ChartId.eq(stale.id))
        .all(&test.state.db)
        .await?;
    assert!(stale_entries.is_empty());

    Ok(())
}

/// Tests that a group whose charts are current generates nothing.
///
/// The latest finished week is already stored on the group's grid, so the run
/// finds no weeks to produce. Verifies that the stored chart and its entry
/// survive untouched and that no follow-up jobs are queued for an empty run.
///
/// Expected: Ok with the stored chart intact and an empty task queue
#[tokio::test]
async fn leaves_up_to_date_group_untouched() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;

    let expected_start =
        latest_finished_week_start(Utc::now(), tracking_weekday(0).unwrap()).unwrap();
    let expected = WeekRange::starting_at(expected_start).unwrap();

    let stored = test
        .listening()
        .insert_chart_with_entry(group.id, expected.start, expected.end, "radiohead")
        .await?;

    let state = test.into_app_state();
    let service = generation_service(&state);

    let result = service.start(group.id, &no_settings()).await;
    assert!(result.is_ok());

    let status = wait_until_idle(&service, group.id).await;
    assert!(!status.last_run_aborted);
    assert_eq!(status.total_weeks, 0);

    let charts = entity::prelude::GroupWeekChart::find()
        .filter(entity::group_week_chart::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0].id, stored.id);

    let entries = entity::prelude::GroupWeekEntry::find()
        .filter(entity::group_week_entry::Column::ChartId.eq(stored.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(entries.len(), 1);

    assert!(state.tasks.is_empty().await);

    Ok(())
}
