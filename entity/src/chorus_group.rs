use sea_orm::entity::prelude::*;

use crate::types::ChartMode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "chorus_group")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    /// Day the group's chart week starts on; 0 = Sunday through 6 = Saturday.
    pub tracking_day_of_week: i32,
    pub chart_size: i32,
    pub chart_mode: ChartMode,
    /// Artist name the group's generated icon is derived from, if any.
    #[sea_orm(column_type = "Text", nullable)]
    pub icon_source: Option<String>,
    pub icon_updated_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::chorus_member::Entity")]
    ChorusMember,
    #[sea_orm(has_many = "super::group_week_chart::Entity")]
    GroupWeekChart,
    #[sea_orm(has_one = "super::group_generation_state::Entity")]
    GroupGenerationState,
}

impl Related<super::chorus_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChorusMember.def()
    }
}

impl Related<super::group_week_chart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupWeekChart.def()
    }
}

impl Related<super::group_generation_state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupGenerationState.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
