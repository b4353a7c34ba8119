//! Environment-driven server configuration.

use std::str::FromStr;

use crate::server::{
    error::config::ConfigError,
    scrobble::{RateLimitConfig, ScrobbleConfig},
    service::{generation::PipelinePolicy, retry::RetryPolicy, scoring::ScoringPolicy},
};

/// Runtime configuration assembled from the environment at startup.
pub struct Config {
    pub database_url: String,
    /// Port the HTTP server binds on.
    pub port: u16,
    /// Connection settings for the upstream scrobble service.
    pub scrobble: ScrobbleConfig,
    /// Token bucket sizing for outbound scrobble requests.
    pub rate_limit: RateLimitConfig,
    /// Tunables of the chart generation pipeline.
    pub pipeline: PipelinePolicy,
    /// Concurrent background stats jobs the task pool may run.
    pub max_concurrent_jobs: usize,
}

impl Config {
    /// Reads the configuration from environment variables.
    ///
    /// `DATABASE_URL` and `SCROBBLE_API_KEY` are required; everything else falls back
    /// to a default when unset. A variable that is set but fails to parse is an error
    /// rather than silently replaced by its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let pipeline_defaults = PipelinePolicy::default();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parsed("CHORUS_PORT", 8080)?,
            scrobble: ScrobbleConfig {
                base_url: optional("SCROBBLE_BASE_URL")
                    .unwrap_or_else(|| "https://ws.audioscrobbler.com".to_string()),
                api_key: required("SCROBBLE_API_KEY")?,
                user_agent: optional("SCROBBLE_USER_AGENT")
                    .unwrap_or_else(|| concat!("chorus/", env!("CARGO_PKG_VERSION")).to_string()),
                request_timeout_secs: parsed("SCROBBLE_TIMEOUT_SECS", 30)?,
            },
            rate_limit: RateLimitConfig {
                capacity: parsed("SCROBBLE_RATE_CAPACITY", 10.0)?,
                refill_per_sec: parsed("SCROBBLE_RATE_REFILL_PER_SEC", 2.0)?,
            },
            pipeline: PipelinePolicy {
                weeks_per_run: parsed("GENERATION_WEEKS_PER_RUN", pipeline_defaults.weeks_per_run)?,
                max_member_failures: parsed(
                    "GENERATION_MAX_MEMBER_FAILURES",
                    pipeline_defaults.max_member_failures,
                )?,
                max_concurrent_fetches: parsed(
                    "GENERATION_MAX_CONCURRENT_FETCHES",
                    pipeline_defaults.max_concurrent_fetches,
                )?,
                week_pause_ms: parsed("GENERATION_WEEK_PAUSE_MS", pipeline_defaults.week_pause_ms)?,
                lease_seconds: parsed("GENERATION_LEASE_SECONDS", pipeline_defaults.lease_seconds)?,
                retry: RetryPolicy::default(),
                scoring: ScoringPolicy::default(),
            },
            max_concurrent_jobs: parsed("TASK_POOL_CONCURRENT_JOBS", 2)?,
        })
    }
}

/// Reads a required environment variable
fn required(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}

/// Reads an optional environment variable
fn optional(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

/// Reads and parses an optional environment variable, falling back to a default
fn parsed<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}
