//! Tests for complete generation runs.
//!
//! This module verifies a full pipeline pass over a mock scrobble server: member
//! top lists are fetched and scored, the weekly charts are aggregated and
//! persisted with their incremental statistics, and follow-up work is queued
//! once the generation lease has been released.

use std::time::Duration;

use chorus::{
    model::api::GenerateChartsDto,
    server::{
        model::task::TaskJob,
        util::week::{latest_finished_week_start, tracking_weekday, WeekRange},
    },
};
use chrono::Utc;
use entity::types::ChartCategory;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::*;

fn plays_only(chart_size: i32) -> GenerateChartsDto {
    GenerateChartsDto {
        chart_mode: Some("plays_only".to_string()),
        chart_size: Some(chart_size),
        tracking_day: None,
    }
}

fn no_settings() -> GenerateChartsDto {
    GenerateChartsDto {
        chart_mode: None,
        chart_size: None,
        tracking_day: None,
    }
}

/// Tests a full single-week generation run across two members.
///
/// Both members listen to an overlapping set of artists and the chart is built
/// in plays-only mode with a chart size of three, so the fourth artist is
/// truncated. Verifies the stored week boundaries, the aggregated positions,
/// playcounts and display names, the per-member contribution totals, the
/// all-time ranking, the entry history, and the follow-up jobs queued after
/// the lease was released.
///
/// Expected: Ok with the aggregated chart persisted and follow-up jobs queued
#[tokio::test]
async fn generates_latest_week_from_member_scrobbles() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("indieheads", 0).await?;
    let foo = test.group().insert_member(group.id, "foo").await?;
    let bar = test.group().insert_member(group.id, "bar").await?;

    test.scrobble()
        .mock_weekly_artist_chart("foo", &[("Radiohead", 10), ("Björk", 5), ("Elbow", 1)], 1)
        .await;
    test.scrobble()
        .mock_weekly_track_chart("foo", &[("Creep", "Radiohead", 6)], 1)
        .await;
    test.scrobble().mock_weekly_album_chart("foo", &[], 1).await;
    test.scrobble()
        .mock_weekly_artist_chart("bar", &[("Björk", 8), ("Portishead", 3)], 1)
        .await;
    test.scrobble().mock_weekly_track_chart("bar", &[], 1).await;
    test.scrobble().mock_weekly_album_chart("bar", &[], 1).await;

    let state = test.into_app_state();
    let service = generation_service(&state);

    let result = service.start(group.id, &plays_only(3)).await;
    assert!(result.is_ok());

    let status = wait_until_idle(&service, group.id).await;
    assert!(!status.last_run_aborted);
    assert!(status.failed_members.is_empty());
    assert_eq!(status.total_weeks, 1);
    assert_eq!(status.current_week, 1);

    let expected_start =
        latest_finished_week_start(Utc::now(), tracking_weekday(0).unwrap()).unwrap();
    let expected = WeekRange::starting_at(expected_start).unwrap();

    let charts = entity::prelude::GroupWeekChart::find()
        .filter(entity::group_week_chart::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(charts.len(), 1);
    let chart = &charts[0];
    assert_eq!(chart.week_start, expected.start);
    assert_eq!(chart.week_end, expected.end);

    let artists = entity::prelude::GroupWeekEntry::find()
        .filter(entity::group_week_entry::Column::ChartId.eq(chart.id))
        .filter(entity::group_week_entry::Column::Category.eq(ChartCategory::Artist))
        .order_by_asc(entity::group_week_entry::Column::Position)
        .all(&test.state.db)
        .await?;

    // Björk's 5 + 8 plays beat Radiohead's 10; Elbow falls off the three-entry
    // chart. In plays-only mode the stored score is the summed playcount.
    assert_eq!(artists.len(), 3);
    assert_eq!(artists[0].position, 1);
    assert_eq!(artists[0].entry_key, "björk");
    assert_eq!(artists[0].name, "Björk");
    assert_eq!(artists[0].playcount, 13);
    assert_eq!(artists[0].score, 13.0);
    assert!(artists[0].artist.is_none());
    assert!(artists[0].movement.is_none());
    assert_eq!(artists[1].position, 2);
    assert_eq!(artists[1].entry_key, "radiohead");
    assert_eq!(artists[1].playcount, 10);
    assert_eq!(artists[2].position, 3);
    assert_eq!(artists[2].entry_key, "portishead");
    assert_eq!(artists[2].playcount, 3);

    let tracks = entity::prelude::GroupWeekEntry::find()
        .filter(entity::group_week_entry::Column::ChartId.eq(chart.id))
        .filter(entity::group_week_entry::Column::Category.eq(ChartCategory::Track))
        .order_by_asc(entity::group_week_entry::Column::Position)
        .all(&test.state.db)
        .await?;
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].entry_key, "creep|radiohead");
    assert_eq!(tracks[0].name, "Creep");
    assert_eq!(tracks[0].artist.as_deref(), Some("Radiohead"));
    assert_eq!(tracks[0].playcount, 6);

    let albums = entity::prelude::GroupWeekEntry::find()
        .filter(entity::group_week_entry::Column::ChartId.eq(chart.id))
        .filter(entity::group_week_entry::Column::Category.eq(ChartCategory::Album))
        .all(&test.state.db)
        .await?;
    assert!(albums.is_empty());

    let snapshots = entity::prelude::MemberWeekSnapshot::find()
        .all(&test.state.db)
        .await?;
    assert_eq!(snapshots.len(), 2);

    let contributions = entity::prelude::GroupMemberContribution::find()
        .filter(entity::group_member_contribution::Column::GroupId.eq(group.id))
        .order_by_asc(entity::group_member_contribution::Column::MemberId)
        .all(&test.state.db)
        .await?;
    assert_eq!(contributions.len(), 2);

    // foo drove two of the three charted artists plus the only track, so foo
    // takes the MVP credit for the week.
    let foo_totals = &contributions[0];
    assert_eq!(foo_totals.member_id, foo.id);
    assert_eq!(foo_totals.total_playcount, 21);
    assert_eq!(foo_totals.artist_debuts, 2);
    assert_eq!(foo_totals.track_debuts, 1);
    assert_eq!(foo_totals.artist_number_ones, 1);
    assert_eq!(foo_totals.track_number_ones, 1);
    assert_eq!(foo_totals.mvp_weeks, 1);

    let bar_totals = &contributions[1];
    assert_eq!(bar_totals.member_id, bar.id);
    assert_eq!(bar_totals.total_playcount, 11);
    assert_eq!(bar_totals.artist_debuts, 2);
    assert_eq!(bar_totals.track_debuts, 0);
    assert_eq!(bar_totals.artist_number_ones, 1);
    assert_eq!(bar_totals.mvp_weeks, 0);
    assert!(foo_totals.total_score > bar_totals.total_score);

    let alltime = entity::prelude::GroupAlltimeEntry::find()
        .filter(entity::group_alltime_entry::Column::GroupId.eq(group.id))
        .filter(entity::group_alltime_entry::Column::Category.eq(ChartCategory::Artist))
        .order_by_asc(entity::group_alltime_entry::Column::Position)
        .all(&test.state.db)
        .await?;
    assert_eq!(alltime.len(), 3);
    assert_eq!(alltime[0].entry_key, "björk");
    assert_eq!(alltime[0].total_playcount, 13);
    assert_eq!(alltime[0].weeks_on_chart, 1);

    let history = entity::prelude::GroupEntryHistory::find()
        .filter(entity::group_entry_history::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(history.len(), 4);
    let top = history.iter().find(|row| row.entry_key == "björk").unwrap();
    assert_eq!(top.weeks_on_chart, 1);
    assert_eq!(top.weeks_at_top, 1);
    assert_eq!(top.current_streak, 1);
    assert_eq!(top.first_week_start, expected.start);

    // Follow-up jobs are queued after the lease is released, so give the
    // spawned run a moment to push them.
    let mut attempts = 0;
    while state.tasks.len().await < 2 {
        attempts += 1;
        if attempts > 200 {
            panic!("Follow-up jobs were not queued within timeout");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(
        state.tasks.pop().await,
        Some(TaskJob::RecalculateRecords { group_id: group.id })
    );
    assert_eq!(
        state.tasks.pop().await,
        Some(TaskJob::RefreshGroupIcon { group_id: group.id })
    );
    assert_eq!(state.tasks.pop().await, None);

    test.assert_mocks().await;

    Ok(())
}

/// Tests that regenerating a week reuses the stored member snapshots.
///
/// The member's week is fetched once during the first run. After the stored
/// chart is deleted, a second run regenerates the same week entirely from the
/// persisted snapshot; every mock expects exactly one request, so any second
/// fetch fails the mock assertions.
///
/// Expected: Ok with the chart rebuilt and no further scrobble requests
#[tokio::test]
async fn reuses_cached_snapshots_without_refetching() -> Result<(), TestError> {
    let mut test = test_setup_with_chart_tables!()?;

    let group = test.group().insert_group("postrockers", 0).await?;
    test.group().insert_member(group.id, "foo").await?;

    test.scrobble()
        .mock_weekly_artist_chart("foo", &[("Radiohead", 12)], 1)
        .await;
    test.scrobble().mock_weekly_track_chart("foo", &[], 1).await;
    test.scrobble().mock_weekly_album_chart("foo", &[], 1).await;

    let state = test.into_app_state();
    let service = generation_service(&state);

    let result = service.start(group.id, &no_settings()).await;
    assert!(result.is_ok());
    wait_until_idle(&service, group.id).await;

    let chart = entity::prelude::GroupWeekChart::find()
        .filter(entity::group_week_chart::Column::GroupId.eq(group.id))
        .one(&test.state.db)
        .await?
        .unwrap();

    entity::prelude::GroupWeekEntry::delete_many()
        .filter(entity::group_week_entry::Column::ChartId.eq(chart.id))
        .exec(&test.state.db)
        .await?;
    entity::prelude::GroupWeekChart::delete_many()
        .filter(entity::group_week_chart::Column::Id.eq(chart.id))
        .exec(&test.state.db)
        .await?;

    let result = service.start(group.id, &no_settings()).await;
    assert!(result.is_ok());
    let status = wait_until_idle(&service, group.id).await;
    assert!(!status.last_run_aborted);

    let charts = entity::prelude::GroupWeekChart::find()
        .filter(entity::group_week_chart::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await?;
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0].week_start, chart.week_start);

    let entries = entity::prelude::GroupWeekEntry::find()
        .filter(entity::group_week_entry::Column::ChartId.eq(charts[0].id))
        .all(&test.state.db)
        .await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_key, "radiohead");
    assert_eq!(entries[0].playcount, 12);

    let snapshots = entity::prelude::MemberWeekSnapshot::find()
        .all(&test.state.db)
        .await?;
    assert_eq!(snapshots.len(), 1);

    test.assert_mocks().await;

    Ok(())
}
