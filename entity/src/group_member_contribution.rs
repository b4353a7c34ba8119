use sea_orm::entity::prelude::*;

/// Cumulative contribution totals for one member within one group.
///
/// Debut counters increment when an entry the member listened to appears on a
/// group chart for the first time; number-one counters increment each week the
/// member contributed to the entry that landed at position 1.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "group_member_contribution")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: i32,
    pub member_id: i32,
    pub total_score: f64,
    pub total_playcount: i64,
    pub artist_debuts: i32,
    pub track_debuts: i32,
    pub album_debuts: i32,
    pub artist_number_ones: i32,
    pub track_number_ones: i32,
    pub album_number_ones: i32,
    pub mvp_weeks: i32,
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
    #[sea_orm(
        belongs_to = "super::chorus_member::Entity",
        from = "Column::MemberId",
        to = "super::chorus_member::Column::Id"
    )]
    ChorusMember,
}

impl Related<super::chorus_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChorusGroup.def()
    }
}

impl Related<super::chorus_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChorusMember.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
