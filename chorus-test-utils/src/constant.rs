//! Shared constants and week helpers for chart tests.
//!
//! Chart tests anchor every week to the same fixed Sunday so that assertions on
//! week boundaries, ordering, and streaks are deterministic regardless of when
//! the suite runs.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// API key used by test scrobble clients.
///
/// Placeholder value; mock endpoints never validate it.
pub static TEST_API_KEY: &str = "0123456789abcdef0123456789abcdef";

/// User agent reported by test scrobble clients.
pub static TEST_USER_AGENT: &str = "chorus-tests/0.1";

/// Start of a test chart week: 00:00 on Sunday 2025-12-28, shifted by
/// `offset_weeks` whole weeks.
///
/// Offset 0 is the base Sunday, positive offsets move forward, negative
/// offsets move back. The base date is far enough in the past that offsets
/// used by the suite always describe finished weeks.
pub fn test_week_start(offset_weeks: i64) -> NaiveDateTime {
    let base = NaiveDate::from_ymd_opt(2025, 12, 28)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    base + Duration::weeks(offset_weeks)
}

/// Week bounds `(start, end)` for the week at `offset_weeks`, where `end` is
/// the start of the following week.
pub fn test_week_range(offset_weeks: i64) -> (NaiveDateTime, NaiveDateTime) {
    let start = test_week_start(offset_weeks);

    (start, start + Duration::weeks(1))
}
