//! Retry logic with exponential backoff for service operations.
//!
//! This module provides the `RetryContext` for executing operations with automatic retry
//! logic and exponential backoff. It supports caching between retry attempts to prevent
//! redundant fetches from the scrobble service, and integrates with the error system to
//! determine which errors are retryable and on which backoff schedule.

use std::time::Duration;

use crate::server::error::{
    retry::{BackoffClass, ErrorRetryStrategy},
    Error,
};

/// Retry schedule for operations against external services.
///
/// Rate-limited attempts start from a longer backoff than ordinary transient failures;
/// both schedules double with each retry.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts before giving up
    pub max_attempts: u32,
    /// Initial backoff in seconds for ordinary transient failures
    pub initial_backoff_secs: u64,
    /// Initial backoff in seconds after upstream rate limiting
    pub rate_limit_backoff_secs: u64,
}

impl Default for RetryPolicy {
    /// Default schedule: 3 attempts, 1 second transient backoff, 5 second rate limit backoff.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_secs: 1,
            rate_limit_backoff_secs: 5,
        }
    }
}

/// Context for executing operations with automatic retry logic and caching.
///
/// Provides exponential backoff retry behavior driven by a [`RetryPolicy`]. The generic
/// cache type `T` persists data between retry attempts to avoid redundant fetches from
/// the scrobble service.
///
/// # Type Parameters
///
/// - `T` - Cache type that must implement `Clone + Default`. Typically `WeeklyFetchCache`
///   for member chart collection or `()` for operations without caching needs.
///
/// # Retry Behavior
///
/// - **Max attempts**: 3 (default)
/// - **Backoff strategy**: Exponential, starting at 1 second for transient failures
///   (1s, 2s, 4s, ...) and 5 seconds after rate limiting (5s, 10s, 20s, ...)
/// - **Retry conditions**: Only errors with `ErrorRetryStrategy::Retry` are retried
/// - **Permanent failures**: Errors with `ErrorRetryStrategy::Fail` return immediately
///
/// # Example
///
/// ```ignore
/// let mut ctx: RetryContext<WeeklyFetchCache> = RetryContext::new();
/// let db = db.clone();
/// let client = client.clone();
///
/// ctx.execute_with_retry("weekly charts for listener", |cache| {
///     let db = db.clone();
///     let client = client.clone();
///
///     Box::pin(async move {
///         // Fetch charts - categories already cached by a previous attempt are skipped
///         let charts = fetch_weekly_charts(&client, &member, &week, cache).await?;
///
///         // Persist within transaction
///         let txn = db.begin().await?;
///         let snapshot = persist_snapshot(&txn, &member, &week, charts).await?;
///         txn.commit().await?;
///
///         Ok(snapshot)
///     })
/// }).await?;
/// ```
pub struct RetryContext<T> {
    /// Cache to be used between retries to prevent unnecessary additional fetches
    cache: T,
    /// Schedule controlling attempt count and backoff growth
    policy: RetryPolicy,
}

impl<T> RetryContext<T>
where
    T: Clone + Default,
{
    /// Creates a new retry context with the default policy.
    ///
    /// The cache is initialized using its `Default` implementation.
    ///
    /// # Returns
    /// - `RetryContext<T>` - New retry context with default settings
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    /// Creates a new retry context with an explicit policy.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            cache: T::default(),
            policy,
        }
    }

    /// Executes an operation with automatic retry logic and exponential backoff.
    ///
    /// Runs the provided async operation up to `max_attempts` times, retrying on transient
    /// failures with exponential backoff. Rate-limited failures back off on the policy's
    /// longer schedule. The cache persists between retry attempts, allowing operations to
    /// skip redundant fetches.
    ///
    /// The operation should check the cache for existing data and populate it with fetched
    /// data to optimize retry attempts. Errors are evaluated using `to_retry_strategy()` to
    /// determine if they are retryable or permanent failures.
    ///
    /// # Arguments
    /// - `description` - Human-readable description for logging (e.g., "weekly charts for listener")
    /// - `operation` - Async function that receives mutable cache reference and returns `Result<R, Error>`
    ///
    /// # Returns
    /// - `Ok(R)` - Operation succeeded
    /// - `Err(Error)` - Operation failed permanently or exhausted all retry attempts
    pub async fn execute_with_retry<R, F>(
        &mut self,
        description: &str,
        operation: F,
    ) -> Result<R, Error>
    where
        F: for<'a> Fn(
            &'a mut T,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<R, Error>> + Send + 'a>,
        >,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.policy.max_attempts
            );

            let result = operation(&mut self.cache).await;

            match result {
                Ok(result) => {
                    tracing::debug!("Successfully processed {}", description);
                    return Ok(result);
                }
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        tracing::error!("Permanent error for {}: {:?}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry(class) => {
                        attempt_count += 1;
                        if attempt_count >= self.policy.max_attempts {
                            tracing::error!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                self.policy.max_attempts,
                                description,
                                e
                            );
                            return Err(e);
                        }

                        let base_secs = match class {
                            BackoffClass::Transient => self.policy.initial_backoff_secs,
                            BackoffClass::RateLimited => self.policy.rate_limit_backoff_secs,
                        };
                        let backoff = Duration::from_secs(base_secs * 2_u64.pow(attempt_count - 1));

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description,
                            attempt_count,
                            self.policy.max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}

impl<T> Default for RetryContext<T>
where
    T: Clone + Default,
{
    fn default() -> Self {
        Self::new()
    }
}
