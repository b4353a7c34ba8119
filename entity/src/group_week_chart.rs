use sea_orm::entity::prelude::*;

/// One generated chart week for a group. `week_start` is 00:00 UTC on the
/// group's tracking day; entries hang off `group_week_entry`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "group_week_chart")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: i32,
    pub week_start: DateTime,
    pub week_end: DateTime,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chorus_group::Entity",
        from = "Column::GroupId",
        to = "super::chorus_group::Column::Id"
    )]
    ChorusGroup,
    #[sea_orm(has_many = "super::group_week_entry::Entity")]
    GroupWeekEntry,
}

impl Related<super::chorus_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChorusGroup.def()
    }
}

impl Related<super::group_week_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupWeekEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
