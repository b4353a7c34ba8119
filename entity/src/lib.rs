pub mod prelude;
pub mod types;

pub mod chorus_group;
pub mod chorus_member;
pub mod group_alltime_entry;
pub mod group_entry_history;
pub mod group_generation_state;
pub mod group_member_contribution;
pub mod group_record;
pub mod group_week_chart;
pub mod group_week_entry;
pub mod member_week_play;
pub mod member_week_score;
pub mod member_week_snapshot;
