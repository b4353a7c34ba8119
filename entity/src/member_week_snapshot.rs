use sea_orm::entity::prelude::*;

/// Header row for one member's fetched listening week. Present even when the
/// member had zero listens, which is what makes cache-or-fetch checks correct.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "member_week_snapshot")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub member_id: i32,
    pub week_start: DateTime,
    pub fetched_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chorus_member::Entity",
        from = "Column::MemberId",
        to = "super::chorus_member::Column::Id"
    )]
    ChorusMember,
    #[sea_orm(has_many = "super::member_week_play::Entity")]
    MemberWeekPlay,
}

impl Related<super::chorus_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChorusMember.def()
    }
}

impl Related<super::member_week_play::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemberWeekPlay.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
