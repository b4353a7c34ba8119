use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "chorus_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: i32,
    /// Internal user the listening account belongs to.
    pub user_id: i64,
    /// Username on the external listening-history service.
    #[sea_orm(column_type = "Text")]
    pub username: String,
    /// Per-member access credential for the external service, when one exists.
    #[sea_orm(column_type = "Text", nullable)]
    pub session_key: Option<String>,
    pub joined_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chorus_group::Entity",
        from = "Column::GroupId",
        to = "super::chorus_group::Column::Id"
    )]
    ChorusGroup,
    #[sea_orm(has_many = "super::member_week_snapshot::Entity")]
    MemberWeekSnapshot,
}

impl Related<super::chorus_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChorusGroup.def()
    }
}

impl Related<super::member_week_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemberWeekSnapshot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
