use sea_orm::entity::prelude::*;

use crate::types::ChartCategory;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "group_week_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chart_id: i32,
    pub category: ChartCategory,
    /// 1-based position within the category's ranked list.
    pub position: i32,
    #[sea_orm(column_type = "Text")]
    pub entry_key: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub artist: Option<String>,
    pub playcount: i64,
    pub score: f64,
    /// Signed position delta against the previous week; None for a new entry
    /// or a week whose movement has not been computed.
    pub movement: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group_week_chart::Entity",
        from = "Column::ChartId",
        to = "super::group_week_chart::Column::Id"
    )]
    GroupWeekChart,
}

impl Related<super::group_week_chart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupWeekChart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
