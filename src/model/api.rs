use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Optional chart settings applied to the group before a generation run starts.
///
/// Omitted fields leave the group's stored settings untouched. Mode and day values are
/// validated before the run is accepted.
#[derive(Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GenerateChartsDto {
    /// Aggregation mode: `vs`, `vs_weighted`, or `plays_only`.
    pub chart_mode: Option<String>,
    /// Number of positions kept per chart category.
    pub chart_size: Option<i32>,
    /// Weekday chart weeks begin on, 0 (Sunday) through 6 (Saturday).
    pub tracking_day: Option<i32>,
}

/// Progress of the current or most recent generation run for a group.
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GenerationStatusDto {
    /// Group the status belongs to.
    pub group_id: i32,
    /// Whether a run currently holds the generation lease.
    pub in_progress: bool,
    /// Pipeline stage of the active run, if any.
    pub stage: Option<String>,
    /// 1-based index of the week the active run is processing.
    pub current_week: i32,
    /// Total number of weeks the active run will process.
    pub total_weeks: i32,
    /// Usernames skipped for the remainder of the run after repeated fetch failures.
    pub failed_members: Vec<String>,
    /// Whether the most recent run stopped early after too many member failures.
    pub last_run_aborted: bool,
    /// When the active run started, if one is in progress.
    pub started_at: Option<NaiveDateTime>,
}

/// A single position on a weekly group chart.
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChartEntryDto {
    /// 1-based chart position.
    pub position: i32,
    /// Display name of the artist, track, or album.
    pub name: String,
    /// Artist credit for track and album entries.
    pub artist: Option<String>,
    /// Combined play count across contributing members.
    pub playcount: i64,
    /// Aggregated score under the group's chart mode.
    pub score: f64,
    /// Position change against the previous week, positive when climbing.
    /// `None` marks an entry with no previous-week position.
    pub movement: Option<i32>,
}

/// A group's full chart for one week, all three categories.
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GroupChartsDto {
    /// Group the chart belongs to.
    pub group_id: i32,
    /// Inclusive week start, midnight UTC on the tracking day.
    pub week_start: NaiveDateTime,
    /// Exclusive week end, seven days after the start.
    pub week_end: NaiveDateTime,
    /// Aggregation mode the group is currently configured with.
    pub chart_mode: String,
    /// Ranked artist entries.
    pub artists: Vec<ChartEntryDto>,
    /// Ranked track entries.
    pub tracks: Vec<ChartEntryDto>,
    /// Ranked album entries.
    pub albums: Vec<ChartEntryDto>,
}

/// A member's cumulative contribution to the group's charts.
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContributionDto {
    /// Member the totals belong to.
    pub member_id: i32,
    /// Scrobble service username of the member.
    pub username: String,
    /// Summed score contributed across all stored weeks.
    pub total_score: f64,
    /// Summed plays contributed across all stored weeks.
    pub total_playcount: i64,
    /// Artists this member brought onto a group chart first.
    pub artist_debuts: i32,
    /// Tracks this member brought onto a group chart first.
    pub track_debuts: i32,
    /// Albums this member brought onto a group chart first.
    pub album_debuts: i32,
    /// Weeks this member contributed to the number one artist.
    pub artist_number_ones: i32,
    /// Weeks this member contributed to the number one track.
    pub track_number_ones: i32,
    /// Weeks this member contributed to the number one album.
    pub album_number_ones: i32,
    /// Weeks this member was the group's highest scorer overall.
    pub mvp_weeks: i32,
    /// When the totals were last recalculated.
    pub updated_at: NaiveDateTime,
}

/// A single group listening record.
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecordDto {
    /// Chart category the record was set in.
    pub category: String,
    /// Which record this is, for example `weeks_at_top`.
    pub record_kind: String,
    /// Display name of the record-holding entry.
    pub name: String,
    /// Artist credit for track and album record holders.
    pub artist: Option<String>,
    /// Magnitude of the record (weeks, plays).
    pub value: i64,
    /// Week the record was set in, when the record is week-scoped.
    pub week_start: Option<NaiveDateTime>,
    /// When the record was last recalculated.
    pub updated_at: NaiveDateTime,
}
