//! Token bucket rate limiting for scrobble API requests.
//!
//! Every outbound request to the scrobble service acquires tokens here before it is
//! sent, keeping the request rate inside the upstream allowance no matter how many
//! member fetches run concurrently.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Token bucket sizing for the scrobble API limiter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum number of tokens the bucket can hold, bounding burst size.
    pub capacity: f64,
    /// Tokens restored per second of elapsed time.
    pub refill_per_sec: f64,
}

impl RateLimitConfig {
    /// Creates a limiter configuration with the given burst capacity and refill rate.
    pub fn new(capacity: f64, refill_per_sec: f64) -> Self {
        Self {
            capacity,
            refill_per_sec,
        }
    }
}

impl Default for RateLimitConfig {
    /// Default sizing: bursts of 10 requests, refilling at 2 per second.
    fn default() -> Self {
        Self::new(10.0, 2.0)
    }
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    /// Credits tokens for the time elapsed since the last refill, capped at capacity.
    fn refill(&mut self, config: &RateLimitConfig, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();

        self.tokens = (self.tokens + elapsed * config.refill_per_sec).min(config.capacity);
        self.last_refill = now;
    }
}

/// Shared token bucket rate limiter.
///
/// Cloning is cheap and all clones drain the same bucket. The bucket starts full so
/// startup work is not delayed.
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    bucket: Arc<Mutex<Bucket>>,
}

impl RateLimiter {
    /// Creates a limiter with a full bucket.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: config.capacity,
                last_refill: Instant::now(),
            })),
        }
    }

    /// Waits until `n` tokens are available, then takes them.
    ///
    /// The wait is the exact time for the deficit to refill, computed outside the lock
    /// so concurrent callers are not serialized while sleeping. Requests larger than
    /// the bucket capacity are clamped to it, as they could otherwise never be
    /// satisfied.
    pub async fn acquire(&self, n: u32) {
        let needed = f64::from(n).min(self.config.capacity);

        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                bucket.refill(&self.config, Instant::now());

                if bucket.tokens >= needed {
                    bucket.tokens -= needed;
                    return;
                }

                let deficit = needed - bucket.tokens;
                Duration::from_secs_f64(deficit / self.config.refill_per_sec)
            };

            tokio::time::sleep(wait).await;
        }
    }

    /// Takes `n` tokens if they are available right now, without waiting.
    pub async fn try_acquire(&self, n: u32) -> bool {
        let needed = f64::from(n).min(self.config.capacity);
        let mut bucket = self.bucket.lock().await;

        bucket.refill(&self.config, Instant::now());

        if bucket.tokens >= needed {
            bucket.tokens -= needed;
            true
        } else {
            false
        }
    }
}
