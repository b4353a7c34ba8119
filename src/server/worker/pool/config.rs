use std::time::Duration;

/// Configuration for the task pool
#[derive(Debug, Clone)]
pub struct TaskPoolConfig {
    /// Maximum concurrent jobs that can be processed simultaneously.
    ///
    /// Stats jobs each hold a database connection while they run, so keep this well
    /// below the connection pool size.
    pub max_concurrent_jobs: usize,

    /// Number of dispatcher tasks that poll the queue for jobs.
    ///
    /// Calculated as 1 dispatcher per 40 concurrent jobs (minimum 1).
    pub dispatcher_count: usize,

    /// How long to wait between polls when the queue is empty (milliseconds).
    pub poll_interval_ms: u64,

    /// Maximum time a job can run before being cancelled (seconds).
    ///
    /// Full stats rebuilds replay every stored week of a group, so the ceiling is
    /// well above what routine record recalculations need.
    pub job_timeout_seconds: u64,

    /// Maximum time to wait for a dispatcher to shut down (seconds).
    /// If a dispatcher doesn't stop within this time, a warning is logged.
    pub shutdown_timeout_seconds: u64,
}

impl TaskPoolConfig {
    /// Create a new configuration with sensible defaults
    ///
    /// # Arguments
    /// * `max_concurrent_jobs` - Maximum concurrent jobs
    pub fn new(max_concurrent_jobs: usize) -> Self {
        // Scale dispatchers: 1 per 40 concurrent jobs, minimum 1
        let dispatcher_count = ((max_concurrent_jobs + 39) / 40).max(1);

        Self {
            max_concurrent_jobs,
            dispatcher_count,
            poll_interval_ms: 50,     // 50ms between polls when queue is empty
            job_timeout_seconds: 300, // 5 minutes, bounded by full stats rebuilds
            shutdown_timeout_seconds: 5, // 5 seconds to wait for dispatcher shutdown
        }
    }

    /// Get job timeout as Duration
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_seconds)
    }

    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }
}

impl Default for TaskPoolConfig {
    fn default() -> Self {
        Self::new(2)
    }
}
