//! Background task definitions for deferred statistics work.
//!
//! This module defines the `TaskJob` enum representing follow-up work a chart
//! generation run defers to the background task queue. Jobs carry only the group they
//! apply to; handlers reload whatever state they need, so a queued job never goes stale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Background job types for deferred group statistics work.
///
/// Each variant represents work that runs after chart generation rather than while the
/// generation lease is held. Jobs are deduplicated by value in the queue, so enqueueing
/// the same recalculation twice across back-to-back runs does no extra work.
///
/// # Job Types
/// - `RecalculateRecords` - Refresh a group's record holders and entry major drivers
/// - `RefreshGroupIcon` - Update the artist a group's icon is derived from
/// - `RebuildStats` - Rebuild all derived statistics from the stored charts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskJob {
    /// Recalculate a group's chart records and entry major drivers.
    ///
    /// Reads the accumulated entry history and stored charts to find the current
    /// record holder per category and record kind, then refreshes the member credited
    /// as major driver on each entry. Queued after every generation run.
    RecalculateRecords {
        /// Group whose records are recalculated.
        group_id: i32,
    },

    /// Refresh the artist a group's icon is derived from.
    ///
    /// Looks up the number one artist of the group's latest chart and stores it as
    /// the group's icon source.
    RefreshGroupIcon {
        /// Group whose icon source is refreshed.
        group_id: i32,
    },

    /// Rebuild a group's derived statistics from its stored charts.
    ///
    /// Replays every stored week in order, replacing entry history, member
    /// contributions, and the all-time ranking wholesale. Used to repair counter
    /// drift after overlapping weeks were regenerated, for example following a
    /// tracking day change.
    RebuildStats {
        /// Group whose statistics are rebuilt.
        group_id: i32,
    },
}

/// Display implementation for readable job logging.
impl fmt::Display for TaskJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
