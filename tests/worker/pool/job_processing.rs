//! Tests for TaskPool job processing functionality.
//!
//! This module verifies job execution within the task pool, including the
//! stats rebuild and icon refresh job types and graceful handling of an
//! empty queue.

use std::time::Duration;

use chorus::server::model::task::TaskJob;
use chorus_test_utils::constant::test_week_range;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::*;

/// Tests successful processing of a stats rebuild job.
///
/// Verifies that a queued rebuild job replays the group's stored charts into
/// entry history, the all-time ranking, and chart records.
///
/// Expected: Derived stats exist for the stored entry after processing
#[tokio::test]
async fn processes_rebuild_stats_job() {
    let mut test = test_setup_with_chart_tables!().expect("Failed to create test setup");

    let group = test
        .group()
        .insert_group("indieheads", 0)
        .await
        .expect("Failed to insert group");
    let week = test_week_range(0);
    test.listening()
        .insert_chart_with_entry(group.id, week.0, week.1, "radiohead")
        .await
        .expect("Failed to insert chart");

    let queue = TaskQueue::new();
    queue
        .push(TaskJob::RebuildStats { group_id: group.id })
        .await
        .expect("Failed to push job to queue");

    let pool = create_test_pool(&test, &queue);

    pool.start().await.expect("Failed to start pool");

    // Records are recalculated last, so poll for them until timeout
    let mut attempts = 0;
    let max_attempts = 200; // 200 attempts * 25ms = 5 seconds max
    loop {
        tokio::time::sleep(Duration::from_millis(25)).await;
        let records = entity::prelude::GroupRecord::find()
            .filter(entity::group_record::Column::GroupId.eq(group.id))
            .all(&test.state.db)
            .await
            .expect("Failed to query records");
        if !records.is_empty() {
            break;
        }
        attempts += 1;
        if attempts >= max_attempts {
            panic!("Rebuild job was not processed within timeout");
        }
    }

    assert!(
        queue.is_empty().await,
        "Queue should be empty after processing"
    );

    let history = entity::prelude::GroupEntryHistory::find()
        .filter(entity::group_entry_history::Column::GroupId.eq(group.id))
        .filter(entity::group_entry_history::Column::EntryKey.eq("radiohead"))
        .one(&test.state.db)
        .await
        .expect("Failed to query entry history");
    assert!(
        history.is_some(),
        "Entry history should exist for the stored entry"
    );

    let alltime = entity::prelude::GroupAlltimeEntry::find()
        .filter(entity::group_alltime_entry::Column::GroupId.eq(group.id))
        .all(&test.state.db)
        .await
        .expect("Failed to query all-time entries");
    assert_eq!(alltime.len(), 1, "All-time ranking should hold the entry");

    pool.stop().await.expect("Failed to stop pool");
}

/// Tests successful processing of an icon refresh job.
///
/// Verifies that a queued icon refresh job derives the group's icon source
/// from the top artist entry of its latest stored chart.
///
/// Expected: Group icon source matches the top artist after processing
#[tokio::test]
async fn processes_icon_refresh_job() {
    let mut test = test_setup_with_chart_tables!().expect("Failed to create test setup");

    let group = test
        .group()
        .insert_group("indieheads", 0)
        .await
        .expect("Failed to insert group");
    let week = test_week_range(0);
    test.listening()
        .insert_chart_with_entry(group.id, week.0, week.1, "radiohead")
        .await
        .expect("Failed to insert chart");

    let queue = TaskQueue::new();
    queue
        .push(TaskJob::RefreshGroupIcon { group_id: group.id })
        .await
        .expect("Failed to push job to queue");

    let pool = create_test_pool(&test, &queue);

    pool.start().await.expect("Failed to start pool");

    // Poll for the refreshed icon source until timeout
    let mut attempts = 0;
    let max_attempts = 200; // 200 attempts * 25ms = 5 seconds max
    loop {
        tokio::time::sleep(Duration::from_millis(25)).await;
        let refreshed = entity::prelude::ChorusGroup::find_by_id(group.id)
            .one(&test.state.db)
            .await
            .expect("Failed to query group")
            .expect("Group should exist");
        if refreshed.icon_source.is_some() {
            assert_eq!(
                refreshed.icon_source,
                Some("radiohead".to_string()),
                "Icon source should follow the top artist entry"
            );
            break;
        }
        attempts += 1;
        if attempts >= max_attempts {
            panic!("Icon refresh job was not processed within timeout");
        }
    }

    assert!(
        queue.is_empty().await,
        "Queue should be empty after processing"
    );

    pool.stop().await.expect("Failed to stop pool");
}

/// Tests graceful handling of empty queue.
///
/// Verifies that the pool handles an empty queue gracefully without errors or
/// crashes, continuing to poll for jobs and remaining in a running state.
///
/// Expected: Pool remains running when queue is empty
#[tokio::test]
async fn handles_empty_queue_gracefully() {
    let test = test_setup_with_tables!().expect("Failed to create test setup");
    let queue = TaskQueue::new();

    let pool = create_test_pool(&test, &queue);

    pool.start().await.expect("Failed to start pool");

    // Pool should handle empty queue gracefully
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Pool should still be running
    assert!(pool.is_running().await, "Pool should still be running");

    pool.stop().await.expect("Failed to stop pool");
}
