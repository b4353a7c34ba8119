//! Tests for the background task pool.
//!
//! This module verifies the behavior of the task pool, including lifecycle
//! state transitions and processing of the deferred statistics job types.

mod job_processing;
mod lifecycle;

use chorus::server::{
    service::analytics::EntryAnalyticsCache,
    worker::{handler::TaskJobHandler, pool::TaskPoolConfig, TaskPool, TaskQueue},
};
use chorus_test_utils::prelude::*;

/// Create a test-optimized config with fast timeouts for testing
fn test_config() -> TaskPoolConfig {
    let mut config = TaskPoolConfig::new(1);
    config.poll_interval_ms = 10;
    config.job_timeout_seconds = 5;
    config.shutdown_timeout_seconds = 1;
    config
}

/// Create a test task pool draining the given queue against the test database
fn create_test_pool(test: &TestSetup, queue: &TaskQueue) -> TaskPool {
    let handler = TaskJobHandler::new(test.state.db.clone(), EntryAnalyticsCache::new());

    TaskPool::new(test_config(), queue.clone(), handler)
}
