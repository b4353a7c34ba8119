use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

/// Repository for group member rows.
pub struct MemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MemberRepository<'a, C> {
    /// Creates a new instance of [`MemberRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a member by its ID
    pub async fn get(
        &self,
        member_id: i32,
    ) -> Result<Option<entity::chorus_member::Model>, DbErr> {
        entity::prelude::ChorusMember::find_by_id(member_id)
            .one(self.db)
            .await
    }

    /// Gets all members of a group ordered by join date
    pub async fn get_all_by_group_id(
        &self,
        group_id: i32,
    ) -> Result<Vec<entity::chorus_member::Model>, DbErr> {
        entity::prelude::ChorusMember::find()
            .filter(entity::chorus_member::Column::GroupId.eq(group_id))
            .order_by_asc(entity::chorus_member::Column::JoinedAt)
            .all(self.db)
            .await
    }
}
