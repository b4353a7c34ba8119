pub use sea_orm_migration::prelude::*;

mod m20260512_000001_chorus_group;
mod m20260512_000002_chorus_member;
mod m20260512_000003_member_week_snapshot;
mod m20260512_000004_member_week_play;
mod m20260512_000005_member_week_score;
mod m20260512_000006_group_week_chart;
mod m20260512_000007_group_week_entry;
mod m20260512_000008_group_entry_history;
mod m20260512_000009_group_member_contribution;
mod m20260512_000010_group_alltime_entry;
mod m20260512_000011_group_record;
mod m20260512_000012_group_generation_state;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260512_000001_chorus_group::Migration),
            Box::new(m20260512_000002_chorus_member::Migration),
            Box::new(m20260512_000003_member_week_snapshot::Migration),
            Box::new(m20260512_000004_member_week_play::Migration),
            Box::new(m20260512_000005_member_week_score::Migration),
            Box::new(m20260512_000006_group_week_chart::Migration),
            Box::new(m20260512_000007_group_week_entry::Migration),
            Box::new(m20260512_000008_group_entry_history::Migration),
            Box::new(m20260512_000009_group_member_contribution::Migration),
            Box::new(m20260512_000010_group_alltime_entry::Migration),
            Box::new(m20260512_000011_group_record::Migration),
            Box::new(m20260512_000012_group_generation_state::Migration),
        ]
    }
}
