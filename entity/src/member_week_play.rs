use sea_orm::entity::prelude::*;

use crate::types::ChartCategory;

/// One raw top-list item from a member's weekly snapshot.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "member_week_play")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub snapshot_id: i32,
    pub category: ChartCategory,
    /// 1-based rank within the member's own weekly list.
    pub rank: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    /// Artist of the track/album; not set for the artist category.
    #[sea_orm(column_type = "Text", nullable)]
    pub artist: Option<String>,
    pub playcount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member_week_snapshot::Entity",
        from = "Column::SnapshotId",
        to = "super::member_week_snapshot::Column::Id"
    )]
    MemberWeekSnapshot,
}

impl Related<super::member_week_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemberWeekSnapshot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
