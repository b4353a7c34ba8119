//! Tests for failed member handling during generation runs.
//!
//! This module verifies that a member whose fetches fail is skipped for the
//! remainder of the run while the others' charts still generate, and that the
//! run aborts without persisting anything once too many members have failed.

use chorus::{
    model::api::GenerateChartsDto,
    server::{model::app::AppState, service::generation::PipelinePolicy},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::*;

fn no_settings() -> GenerateChartsDto {
    GenerateChartsDto {
        chart_mode: None,
        chart_size: None,
        tracking_day: None,
    }
}

/// Tests that a run completes when one member's fetches fail.
///
/// foo's listening data is served normally while bar's requests are rejected
/// with a 403, a permanent credential error that is not retried. Verifies that
/// the week's chart is still generated from foo's data alone and that bar is
/// reported in the run's failed members.
///
/// Expected: Ok with a chart built from foo's data and bar reported as failed
#[tokio::test]
async fn skips_failed_member_and_completes_run() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    let foo = test.group().insert_member(group.id, "foo").await?;
    test.group().insert_member(group.id, "bar").await?;

    test.scrobble()
        .mock_weekly_artist_chart("foo", &[("Radiohead", 9)], 1)
        .await;
    test.scrobble().mock_weekly_track_chart("foo", &[], 1).await;
    test.scrobble().mock_weekly_album_chart("foo", &[], 1).await;
    test.scrobble().mock_chart_error("bar", 403, 1).await;

    let state = test.into_app_state();
    let service = generation_service(&state);

    let result = service.start(group.id, &no_settings()).await;
    assert!(result.is_ok());

    let status = wait_until_idle(&service, group.id).await;
    assert!(!status.last_run_aborted);
    assert_eq!(status.failed_members, vec!["bar".to_string()]);

    let charts = entity::prelude::GroupWeekChart::find()
        .filter(entity::group_week_chart::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(charts.len(), 1);

    let entries = entity::prelude::GroupWeekEntry::find()
        .filter(entity::group_week_entry::Column::ChartId.eq(charts[0].id))
        .all(&test.state.db)
        .await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_key, "radiohead");

    let contributions = entity::prelude::GroupMemberContribution::find()
        .filter(entity::group_member_contribution::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(contributions.len(), 1);
    assert_eq!(contributions[0].member_id, foo.id);

    // bar's fetch never succeeded, so no snapshot was stored for bar.
    let snapshots = entity::prelude::MemberWeekSnapshot::find()
        .all(&test.state.db)
        .await?;
    assert_eq!(snapshots.len(), 1);

    test.assert_mocks().await;

    Ok(())
}

/// Tests that a run aborts once the failed member threshold is exceeded.
///
/// With a failure threshold of zero, bar's 403 aborts the run right after the
/// collection phase. Verifies that no chart week is persisted and that no
/// follow-up jobs are queued for the aborted run.
///
/// Expected: Aborted status with no chart rows and an empty task queue
#[tokio::test]
async fn aborts_run_when_failures_exceed_threshold() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    test.group().insert_member(group.id, "foo").await?;
    test.group().insert_member(group.id, "bar").await?;

    test.scrobble()
        .mock_weekly_artist_chart("foo", &[("Radiohead", 9)], 1)
        .await;
    test.scrobble().mock_weekly_track_chart("foo", &[], 1).await;
    test.scrobble().mock_weekly_album_chart("foo", &[], 1).await;
    test.scrobble().mock_chart_error("bar", 403, 1).await;

    let policy = PipelinePolicy {
        max_member_failures: 0,
        ..fast_policy()
    };
    let state = AppState {
        policy,
        ..test.into_app_state()
    };
    let service = generation_service(&state);

    let result = service.start(group.id, &no_settings()).await;
    assert!(result.is_ok());

    let status = wait_until_idle(&service, group.id).await;
    assert!(status.last_run_aborted);
    assert_eq!(status.failed_members, vec!["bar".to_string()]);

    let charts = entity::prelude::GroupWeekChart::find()
        .filter(entity::group_week_chart::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert!(charts.is_empty());

    assert!(state.tasks.is_empty().await);

    test.assert_mocks().await;

    Ok(())
}

/// Tests that a member who failed is not fetched again on later weeks.
///
/// A two-week run hits bar's permanent error during the first week. Verifies
/// that bar is skipped for the second week, that both weeks still chart from
/// foo's data, and that foo's streak statistics accumulate across the weeks.
/// Every bar mock expects exactly one request, so a second fetch attempt would
/// fail the mock assertions.
///
/// Expected: Ok with two chart weeks and a single request for bar overall
#[tokio::test]
async fn does_not_refetch_skipped_member_on_later_weeks() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    let foo = test.group().insert_member(group.id, "foo").await?;
    test.group().insert_member(group.id, "bar").await?;

    test.scrobble()
        .mock_weekly_artist_chart("foo", &[("Radiohead", 9)], 2)
        .await;
    test.scrobble().mock_weekly_track_chart("foo", &[], 2).await;
    test.scrobble().mock_weekly_album_chart("foo", &[], 2).await;
    test.scrobble().mock_chart_error("bar", 403, 1).await;

    let policy = PipelinePolicy {
        weeks_per_run: 2,
        week_pause_ms: 0,
        ..PipelinePolicy::default()
    };
    let state = AppState {
        policy,
        ..test.into_app_state()
    };
    let service = generation_service(&state);

    let result = service.start(group.id, &no_settings()).await;
    assert!(result.is_ok());

    let status = wait_until_idle(&service, group.id).await;
    assert!(!status.last_run_aborted);
    assert_eq!(status.failed_members, vec!["bar".to_string()]);
    assert_eq!(status.total_weeks, 2);
    assert_eq!(status.current_week, 2);

    let charts = entity::prelude::GroupWeekChart::find()
        .filter(entity::group_week_chart::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(charts.len(), 2);

    // Two consecutive charted weeks roll up into the entry's streak.
    let history = entity::prelude::GroupEntryHistory::find()
        .filter(entity::group_entry_history::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].entry_key, "radiohead");
    assert_eq!(history[0].weeks_on_chart, 2);
    assert_eq!(history[0].weeks_at_top, 2);
    assert_eq!(history[0].current_streak, 2);

    let contributions = entity::prelude::GroupMemberContribution::find()
        .filter(entity::group_member_contribution::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(contributions.len(), 1);
    assert_eq!(contributions[0].member_id, foo.id);
    assert_eq!(contributions[0].total_playcount, 18);
    assert_eq!(contributions[0].artist_debuts, 1);
    assert_eq!(contributions[0].artist_number_ones, 2);
    assert_eq!(contributions[0].mvp_weeks, 2);

    test.assert_mocks().await;

    Ok(())
}
