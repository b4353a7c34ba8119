//! Week boundary calculation utilities.
//!
//! This module provides functions for calculating chart week boundaries and determining
//! which weeks a generation run still needs to produce. All boundaries are midnight UTC
//! on the group's configured tracking day, and a week only becomes eligible for chart
//! generation once it has fully elapsed.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};

use crate::server::error::{chart::ChartError, Error};

/// A single chart week as a half-open interval `[start, end)`.
///
/// Both boundaries are midnight UTC on the group's tracking day and `end` is always
/// exactly seven days after `start`. Charts are stored keyed by `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    /// Inclusive start of the week at midnight UTC.
    pub start: NaiveDateTime,
    /// Exclusive end of the week, seven days after `start`.
    pub end: NaiveDateTime,
}

impl WeekRange {
    /// Builds the week beginning at the given boundary.
    pub fn starting_at(start: NaiveDateTime) -> Result<Self, Error> {
        let end = start.checked_add_signed(Duration::days(7)).ok_or_else(|| {
            Error::ParseError("Failed to calculate the end boundary of a chart week".to_string())
        })?;

        Ok(Self { start, end })
    }

    /// Unix timestamp of the week start, used as the `from` parameter on scrobble API calls.
    pub fn start_ts(&self) -> i64 {
        self.start.and_utc().timestamp()
    }

    /// Unix timestamp of the week end, used as the `to` parameter on scrobble API calls.
    pub fn end_ts(&self) -> i64 {
        self.end.and_utc().timestamp()
    }
}

/// Converts a stored tracking day number into a [`Weekday`].
///
/// Groups store their tracking day as an integer where `0` is Sunday and `6` is
/// Saturday. Any value outside that range is rejected.
///
/// # Returns
/// - `Ok(Weekday)` - The weekday the group's chart weeks begin on
/// - `Err(Error::ChartError(ChartError::InvalidTrackingDay))` - The stored value is out of range
pub fn tracking_weekday(day: i32) -> Result<Weekday, Error> {
    let weekday = match day {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        _ => return Err(Error::ChartError(ChartError::InvalidTrackingDay(day))),
    };

    Ok(weekday)
}

/// Calculates the most recent week boundary at or before the given date.
///
/// The boundary is midnight UTC on the most recent occurrence of `tracking_day`,
/// counting `date` itself when it falls on the tracking day.
///
/// # Arguments
/// - `date` - The date to align to the week grid
/// - `tracking_day` - The weekday the group's chart weeks begin on
///
/// # Returns
/// - `Ok(NaiveDateTime)` - Midnight UTC on the aligned tracking day
/// - `Err(Error::ParseError)` - Date arithmetic left the representable range
pub fn week_start_on_or_before(
    date: NaiveDate,
    tracking_day: Weekday,
) -> Result<NaiveDateTime, Error> {
    let days_back = (date.weekday().num_days_from_sunday() + 7
        - tracking_day.num_days_from_sunday())
        % 7;

    let start_date = date
        .checked_sub_signed(Duration::days(days_back as i64))
        .ok_or_else(|| {
            Error::ParseError("Failed to calculate the start of the current chart week".to_string())
        })?;

    start_date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        Error::ParseError(
            "Failed to construct the midnight boundary of the current chart week".to_string(),
        )
    })
}

/// Calculates the start of the most recent fully elapsed chart week.
///
/// A week `[start, start + 7d)` is finished once `now` has reached its end boundary.
/// The week containing `now` is always still in progress, so the result is the boundary
/// one full week before the aligned boundary of `now`, even when `now` sits exactly on
/// a boundary.
///
/// # Arguments
/// - `now` - Current UTC timestamp
/// - `tracking_day` - The weekday the group's chart weeks begin on
pub fn latest_finished_week_start(
    now: DateTime<Utc>,
    tracking_day: Weekday,
) -> Result<NaiveDateTime, Error> {
    let boundary = week_start_on_or_before(now.date_naive(), tracking_day)?;

    boundary.checked_sub_signed(Duration::days(7)).ok_or_else(|| {
        Error::ParseError(
            "Failed to calculate the start of the most recent finished chart week".to_string(),
        )
    })
}

/// Determines which chart weeks a generation run should produce, oldest first.
///
/// # Logic
/// - With no stored chart yet, the result is the `max_weeks` most recent finished weeks.
/// - Otherwise the result is every finished week on the current week grid strictly after
///   `last_stored_start`, capped at the `max_weeks` oldest so a long backlog is worked
///   off across successive runs.
///
/// When a group changes its tracking day, previously stored boundaries no longer sit on
/// the current grid. Only grid-aligned weeks after the stored boundary are returned, so
/// the first run after the change may produce a week partially overlapping the old one;
/// the overlap resolver replaces the stale charts at write time.
///
/// # Arguments
/// - `last_stored_start` - Start boundary of the most recent stored chart, if any
/// - `now` - Current UTC timestamp
/// - `tracking_day` - The weekday the group's chart weeks begin on
/// - `max_weeks` - Upper bound on the number of weeks a single run may produce
pub fn weeks_to_generate(
    last_stored_start: Option<NaiveDateTime>,
    now: DateTime<Utc>,
    tracking_day: Weekday,
    max_weeks: usize,
) -> Result<Vec<WeekRange>, Error> {
    if max_weeks == 0 {
        return Ok(Vec::new());
    }

    let latest = latest_finished_week_start(now, tracking_day)?;

    let mut starts = Vec::new();
    let mut cursor = latest;

    loop {
        match last_stored_start {
            Some(last) if cursor <= last => break,
            None if starts.len() >= max_weeks => break,
            _ => {}
        }

        starts.push(cursor);

        cursor = cursor.checked_sub_signed(Duration::days(7)).ok_or_else(|| {
            Error::ParseError(
                "Failed to step back to the previous chart week boundary".to_string(),
            )
        })?;
    }

    starts.reverse();
    starts.truncate(max_weeks);

    starts.into_iter().map(WeekRange::starting_at).collect()
}
