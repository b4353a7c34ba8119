//! Test utilities for building AppState and generation services against mock servers

use std::time::Duration;

use chorus::{
    model::api::GenerationStatusDto,
    server::{
        model::app::AppState,
        scrobble::{RateLimitConfig, RateLimiter, ScrobbleClient, ScrobbleConfig},
        service::{
            analytics::EntryAnalyticsCache,
            generation::{GenerationService, PipelinePolicy},
        },
        worker::queue::TaskQueue,
    },
};
use chorus_test_utils::{
    constant::{TEST_API_KEY, TEST_USER_AGENT},
    TestSetup,
};

/// Creates a scrobble client pointed at a mockito server.
///
/// The rate limiter is configured far above what any test issues so request
/// pacing never influences test timing.
pub fn test_scrobble_client(base_url: String) -> ScrobbleClient {
    ScrobbleClient::new(
        ScrobbleConfig {
            base_url,
            api_key: TEST_API_KEY.to_string(),
            user_agent: TEST_USER_AGENT.to_string(),
            request_timeout_secs: 5,
        },
        RateLimiter::new(RateLimitConfig::new(100.0, 100.0)),
    )
    .expect("Failed to build scrobble client")
}

/// Pipeline policy covering a single week per run with no pause between weeks.
pub fn fast_policy() -> PipelinePolicy {
    PipelinePolicy {
        weeks_per_run: 1,
        week_pause_ms: 0,
        ..PipelinePolicy::default()
    }
}

/// Borrows a generation service from the pieces held by an [`AppState`].
pub fn generation_service(state: &AppState) -> GenerationService<'_> {
    GenerationService::new(
        &state.db,
        &state.scrobble_client,
        &state.analytics,
        &state.tasks,
        &state.policy,
    )
}

/// Polls a group's generation status until the spawned run has released its lease.
///
/// Panics when the run is still in progress after ten seconds.
pub async fn wait_until_idle(
    service: &GenerationService<'_>,
    group_id: i32,
) -> GenerationStatusDto {
    for _ in 0..400 {
        let status = service
            .status(group_id)
            .await
            .expect("Failed to read generation status");
        if !status.in_progress {
            return status;
        }

        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    panic!("Generation run did not finish within timeout");
}

/// Extension trait for TestSetup to create AppState backed by the mock server
pub trait TestSetupExt {
    fn into_app_state(&self) -> AppState;
}

impl TestSetupExt for TestSetup {
    fn into_app_state(&self) -> AppState {
        AppState {
            db: self.state.db.clone(),
            scrobble_client: test_scrobble_client(self.server.url()),
            analytics: EntryAnalyticsCache::new(),
            tasks: TaskQueue::new(),
            policy: fast_policy(),
        }
    }
}
