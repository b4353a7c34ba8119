use std::time::Duration;

use crate::server::service::{retry::RetryPolicy, scoring::ScoringPolicy};

/// Tunables of the chart generation pipeline.
///
/// One instance is built from the environment at startup and shared across runs; a
/// run reads its policy once so mid-run configuration changes never apply partially.
#[derive(Debug, Clone)]
pub struct PipelinePolicy {
    /// Maximum chart weeks a single run may generate.
    ///
    /// A longer backlog is worked off oldest-first across successive runs.
    pub weeks_per_run: usize,

    /// Distinct failed members tolerated before a run aborts.
    ///
    /// Failed members are skipped for the rest of the run; once more than this many
    /// have failed, the remaining data is too thin for a representative chart.
    pub max_member_failures: usize,

    /// Maximum member fetches in flight at once within a week.
    ///
    /// The scrobble client's rate limiter spaces the actual requests; this bounds
    /// memory and connection use.
    pub max_concurrent_fetches: usize,

    /// Pause between processed weeks (milliseconds), smoothing load on the
    /// scrobble service during backlog runs.
    pub week_pause_ms: u64,

    /// Generation lease duration (seconds).
    ///
    /// Renewed before each week; must comfortably exceed the worst-case time to
    /// process one week or the watchdog will reclaim a live run.
    pub lease_seconds: i64,

    /// Retry schedule for member data fetches.
    pub retry: RetryPolicy,

    /// Scoring curve applied to member weekly lists.
    pub scoring: ScoringPolicy,
}

impl PipelinePolicy {
    /// Get the pause between weeks as a Duration
    pub fn week_pause(&self) -> Duration {
        Duration::from_millis(self.week_pause_ms)
    }
}

impl Default for PipelinePolicy {
    /// Default policy: 10 weeks per run, 3 tolerated member failures, 10 concurrent
    /// fetches, a half second pause between weeks, and a 10 minute lease.
    fn default() -> Self {
        Self {
            weeks_per_run: 10,
            max_member_failures: 3,
            max_concurrent_fetches: 10,
            week_pause_ms: 500,
            lease_seconds: 600,
            retry: RetryPolicy::default(),
            scoring: ScoringPolicy::default(),
        }
    }
}
