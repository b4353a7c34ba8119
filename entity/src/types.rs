//! Shared column enums for chart categories, aggregation modes, record kinds,
//! and generation run stages. Stored as short strings so the tables stay
//! readable from plain SQL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chart category: one ranked list is produced per category per week.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ChartCategory {
    #[sea_orm(string_value = "artist")]
    Artist,
    #[sea_orm(string_value = "track")]
    Track,
    #[sea_orm(string_value = "album")]
    Album,
}

/// How per-member inputs are combined into one group chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    /// Sum of rank-derived scores.
    #[sea_orm(string_value = "vs")]
    Vs,
    /// Sum of rank-derived scores, weighted by in-list playcount share.
    #[sea_orm(string_value = "vs_weighted")]
    VsWeighted,
    /// Sum of raw playcounts.
    #[sea_orm(string_value = "plays_only")]
    PlaysOnly,
}

/// Cross-week record categories tracked per group and chart category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[sea_orm(string_value = "weeks_on_chart")]
    WeeksOnChart,
    #[sea_orm(string_value = "weeks_at_top")]
    WeeksAtTop,
    #[sea_orm(string_value = "longest_streak")]
    LongestStreak,
    /// Highest playcount an entry reached within a single chart week.
    #[sea_orm(string_value = "week_playcount")]
    WeekPlaycount,
}

/// Stage of an in-progress generation run, surfaced by the status endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    #[sea_orm(string_value = "initializing")]
    Initializing,
    #[sea_orm(string_value = "fetching")]
    Fetching,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "finalizing")]
    Finalizing,
}
