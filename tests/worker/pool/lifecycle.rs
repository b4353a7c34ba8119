//! Tests for TaskPool lifecycle management.
//!
//! This module verifies the behavior of the task pool's lifecycle operations,
//! including starting and stopping the pool, checking running state, dispatcher
//! count tracking, idempotent operations, and queue shutdown coordination.

use chorus::server::{
    error::{task::TaskError, Error},
    model::task::TaskJob,
};

use super::*;

/// Tests initial pool state is not running.
///
/// Verifies that a newly created pool is not in a running state and has
/// zero dispatchers before start() is called.
///
/// Expected: is_running() returns false, dispatcher_count() returns 0
#[tokio::test]
async fn not_running_initially() {
    let test = test_setup_with_tables!().expect("Failed to create test setup");
    let queue = TaskQueue::new();
    let pool = create_test_pool(&test, &queue);

    assert!(
        !pool.is_running().await,
        "Pool should not be running initially"
    );
    assert_eq!(
        pool.dispatcher_count().await,
        0,
        "Dispatcher count should be 0 initially"
    );
}

/// Tests successful pool startup.
///
/// Verifies that a task pool can be started successfully and transitions
/// to a running state, ready to process jobs from the queue.
///
/// Expected: start() returns Ok and is_running() returns true
#[tokio::test]
async fn starts_successfully() {
    let test = test_setup_with_tables!().expect("Failed to create test setup");
    let queue = TaskQueue::new();
    let pool = create_test_pool(&test, &queue);

    let result = pool.start().await;
    assert!(result.is_ok(), "Pool should start successfully");

    assert!(
        pool.is_running().await,
        "Pool should be running after start"
    );
    assert_eq!(
        pool.dispatcher_count().await,
        1,
        "Dispatcher count should be 1 after start"
    );

    pool.stop().await.expect("Failed to stop pool");
}

/// Tests successful pool shutdown.
///
/// Verifies that a running task pool can be stopped successfully and
/// transitions to a non-running state, gracefully shutting down dispatchers.
///
/// Expected: stop() returns Ok and is_running() returns false
#[tokio::test]
async fn stops_successfully() {
    let test = test_setup_with_tables!().expect("Failed to create test setup");
    let queue = TaskQueue::new();
    let pool = create_test_pool(&test, &queue);

    pool.start().await.expect("Failed to start pool");
    assert!(pool.is_running().await, "Pool should be running");

    let result = pool.stop().await;
    assert!(result.is_ok(), "Pool should stop successfully");

    assert!(
        !pool.is_running().await,
        "Pool should not be running after stop"
    );
}

/// Tests that start operation is idempotent.
///
/// Verifies that calling start() multiple times on a pool does not create
/// additional dispatchers or cause errors, maintaining consistent state.
///
/// Expected: Multiple starts succeed without changing dispatcher count
#[tokio::test]
async fn start_is_idempotent() {
    let test = test_setup_with_tables!().expect("Failed to create test setup");
    let queue = TaskQueue::new();
    let pool = create_test_pool(&test, &queue);

    // Start once
    let result1 = pool.start().await;
    assert!(result1.is_ok(), "First start should succeed");

    let dispatcher_count_1 = pool.dispatcher_count().await;

    // Start again (should be idempotent)
    let result2 = pool.start().await;
    assert!(result2.is_ok(), "Second start should also succeed");

    let dispatcher_count_2 = pool.dispatcher_count().await;

    // Should not create additional dispatchers
    assert_eq!(
        dispatcher_count_1, dispatcher_count_2,
        "Dispatcher count should remain the same"
    );

    pool.stop().await.expect("Failed to stop pool");
}

/// Tests that stopping the pool closes the queue to new pushes.
///
/// Verifies that after stop() the shared queue rejects further pushes, so
/// jobs can no longer be enqueued against a shut-down pool.
///
/// Expected: push() after stop returns a QueueClosed error
#[tokio::test]
async fn stop_closes_queue() {
    let test = test_setup_with_tables!().expect("Failed to create test setup");
    let queue = TaskQueue::new();
    let pool = create_test_pool(&test, &queue);

    pool.start().await.expect("Failed to start pool");
    pool.stop().await.expect("Failed to stop pool");

    assert!(queue.is_closed().await, "Queue should be closed after stop");

    let rejected = queue.push(TaskJob::RebuildStats { group_id: 1 }).await;
    assert!(
        matches!(rejected, Err(Error::TaskError(TaskError::QueueClosed(_)))),
        "Push after stop should be rejected"
    );
}

/// Tests stopping pool that was never started.
///
/// Verifies that calling stop() on a pool that hasn't been started is
/// safe and doesn't cause errors, handling the edge case gracefully.
///
/// Expected: stop() succeeds without errors
#[tokio::test]
async fn stop_without_start_is_safe() {
    let test = test_setup_with_tables!().expect("Failed to create test setup");
    let queue = TaskQueue::new();
    let pool = create_test_pool(&test, &queue);

    // Stopping without starting should be safe (idempotent)
    let result = pool.stop().await;
    assert!(result.is_ok(), "Stop without start should succeed");
}
