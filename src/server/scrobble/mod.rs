//! Scrobble service integration.
//!
//! This module provides the HTTP client used to collect members' weekly listening
//! charts from the upstream scrobble service, along with the wire-format models and the
//! token bucket rate limiter every outbound request passes through.

pub mod client;
pub mod limiter;
pub mod model;

pub use client::{ScrobbleClient, ScrobbleConfig};
pub use limiter::{RateLimitConfig, RateLimiter};
