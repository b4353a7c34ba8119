use sea_orm::entity::prelude::*;

use crate::types::ChartCategory;

/// All-time ranking row, rebuilt from scratch after each generation run.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "group_alltime_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: i32,
    pub category: ChartCategory,
    pub position: i32,
    #[sea_orm(column_type = "Text")]
    pub entry_key: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub artist: Option<String>,
    pub total_score: f64,
    pub total_playcount: i64,
    pub weeks_on_chart: i32,
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
