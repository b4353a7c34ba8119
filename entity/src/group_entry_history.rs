use sea_orm::entity::prelude::*;

use crate::types::ChartCategory;

/// Running per-entry statistics across every chart a group has generated.
///
/// One row per (group, category, entry key). Streak fields track consecutive
/// charted weeks; `current_streak` is the run ending at the entry's most
/// recent appearance and restarts at 1 when a reappearance follows a gap.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "group_entry_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: i32,
    pub category: ChartCategory,
    #[sea_orm(column_type = "Text")]
    pub entry_key: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub artist: Option<String>,
    pub weeks_on_chart: i32,
    pub weeks_at_top: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub first_week_start: DateTime,
    pub last_week_start: DateTime,
    pub total_playcount: i64,
    pub total_score: f64,
    /// Member whose summed scores contributed most to this entry across its
    /// history. Refreshed by the records recalculation task.
    pub major_driver_member_id: Option<i32>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chorus_group::Entity",
        from = "Column::GroupId",
        to = "super::chorus_group::Column::Id"
    )]
    ChorusGroup,
}

impl Related<super::chorus_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChorusGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
