//! Utility functions and helpers for server operations.
//!
//! This module provides reusable utility functions for common server tasks, including
//! chart entry key normalization and the week boundary calculations that drive chart
//! generation. These utilities are used across services, background tasks, and schedulers.

pub mod entry;
pub mod week;
