use sea_orm::entity::prelude::*;

use crate::types::ChartCategory;

/// Rank-derived competitive score for one entry in one member's week.
/// Replaced wholesale whenever the member's snapshot is (re)processed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "member_week_score")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub member_id: i32,
    pub week_start: DateTime,
    pub category: ChartCategory,
    #[sea_orm(column_type = "Text")]
    pub entry_key: String,
    pub score: f64,
    pub playcount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chorus_member::Entity",
        from = "Column::MemberId",
        to = "super::chorus_member::Column::Id"
    )]
    ChorusMember,
}

impl Related<super::chorus_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChorusMember.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
