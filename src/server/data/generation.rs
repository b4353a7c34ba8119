use chrono::NaiveDateTime;
use entity::types::GenerationStage;
use migration::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter,
};

/// Repository for the generation lease and progress row of each group.
///
/// Acquisition and reclaim are compare-and-set updates so that two runners
/// racing for the same group resolve through the database rather than through
/// in-process locking. Every progress write is guarded by the owner token;
/// a runner whose lease was reclaimed sees its writes affect zero rows.
pub struct GenerationStateRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> GenerationStateRepository<'a, C> {
    /// Creates a new instance of [`GenerationStateRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets the generation state row for a group
    pub async fn get(
        &self,
        group_id: i32,
    ) -> Result<Option<entity::group_generation_state::Model>, DbErr> {
        entity::prelude::GroupGenerationState::find()
            .filter(entity::group_generation_state::Column::GroupId.eq(group_id))
            .one(self.db)
            .await
    }

    /// Gets the generation state row for a group, creating an idle row if none exists
    pub async fn get_or_create(
        &self,
        group_id: i32,
        now: NaiveDateTime,
    ) -> Result<entity::group_generation_state::Model, DbErr> {
        if let Some(state) = self.get(group_id).await? {
            return Ok(state);
        }

        let state = entity::group_generation_state::ActiveModel {
            group_id: ActiveValue::Set(group_id),
            in_progress: ActiveValue::Set(false),
            owner_token: ActiveValue::Set(None),
            lease_expires_at: ActiveValue::Set(None),
            started_at: ActiveValue::Set(None),
            current_week: ActiveValue::Set(0),
            total_weeks: ActiveValue::Set(0),
            stage: ActiveValue::Set(None),
            failed_members: ActiveValue::Set(serde_json::json!([])),
            last_run_aborted: ActiveValue::Set(false),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        state.insert(self.db).await
    }

    /// Attempts to take the generation lease for a group
    ///
    /// Succeeds when the row is idle or its previous lease has expired.
    /// Returns whether the lease was taken.
    pub async fn try_acquire(
        &self,
        group_id: i32,
        owner_token: &str,
        lease_expires_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::GroupGenerationState::update_many()
            .col_expr(
                entity::group_generation_state::Column::InProgress,
                Expr::value(true),
            )
            .col_expr(
                entity::group_generation_state::Column::OwnerToken,
                Expr::value(Some(owner_token.to_string())),
            )
            .col_expr(
                entity::group_generation_state::Column::LeaseExpiresAt,
                Expr::value(Some(lease_expires_at)),
            )
            .col_expr(
                entity::group_generation_state::Column::UpdatedAt,
                Expr::value(now),
            )
            .filter(entity::group_generation_state::Column::GroupId.eq(group_id))
            .filter(
                Condition::any()
                    .add(entity::group_generation_state::Column::InProgress.eq(false))
                    .add(entity::group_generation_state::Column::LeaseExpiresAt.lt(now)),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Initializes progress fields at the start of an acquired run
    ///
    /// Returns whether the caller still held the lease.
    pub async fn begin_run(
        &self,
        group_id: i32,
        owner_token: &str,
        total_weeks: i32,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::GroupGenerationState::update_many()
            .col_expr(
                entity::group_generation_state::Column::StartedAt,
                Expr::value(Some(now)),
            )
            .col_expr(
                entity::group_generation_state::Column::CurrentWeek,
                Expr::value(0),
            )
            .col_expr(
                entity::group_generation_state::Column::TotalWeeks,
                Expr::value(total_weeks),
            )
            .col_expr(
                entity::group_generation_state::Column::Stage,
                Expr::value(Some(GenerationStage::Initializing.to_value())),
            )
            .col_expr(
                entity::group_generation_state::Column::FailedMembers,
                Expr::value(serde_json::json!([])),
            )
            .col_expr(
                entity::group_generation_state::Column::UpdatedAt,
                Expr::value(now),
            )
            .filter(entity::group_generation_state::Column::GroupId.eq(group_id))
            .filter(entity::group_generation_state::Column::OwnerToken.eq(owner_token))
            .filter(entity::group_generation_state::Column::InProgress.eq(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Extends the lease of a running generation
    ///
    /// Returns whether the caller still held the lease.
    pub async fn renew_lease(
        &self,
        group_id: i32,
        owner_token: &str,
        lease_expires_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::GroupGenerationState::update_many()
            .col_expr(
                entity::group_generation_state::Column::LeaseExpiresAt,
                Expr::value(Some(lease_expires_at)),
            )
            .col_expr(
                entity::group_generation_state::Column::UpdatedAt,
                Expr::value(now),
            )
            .filter(entity::group_generation_state::Column::GroupId.eq(group_id))
            .filter(entity::group_generation_state::Column::OwnerToken.eq(owner_token))
            .filter(entity::group_generation_state::Column::InProgress.eq(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Records the stage a running generation is in
    pub async fn set_stage(
        &self,
        group_id: i32,
        owner_token: &str,
        stage: GenerationStage,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::GroupGenerationState::update_many()
            .col_expr(
                entity::group_generation_state::Column::Stage,
                Expr::value(Some(stage.to_value())),
            )
            .col_expr(
                entity::group_generation_state::Column::UpdatedAt,
                Expr::value(now),
            )
            .filter(entity::group_generation_state::Column::GroupId.eq(group_id))
            .filter(entity::group_generation_state::Column::OwnerToken.eq(owner_token))
            .filter(entity::group_generation_state::Column::InProgress.eq(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Records which week of the run is being processed, 1-based
    pub async fn set_progress(
        &self,
        group_id: i32,
        owner_token: &str,
        current_week: i32,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::GroupGenerationState::update_many()
            .col_expr(
                entity::group_generation_state::Column::CurrentWeek,
                Expr::value(current_week),
            )
            .col_expr(
                entity::group_generation_state::Column::UpdatedAt,
                Expr::value(now),
            )
            .filter(entity::group_generation_state::Column::GroupId.eq(group_id))
            .filter(entity::group_generation_state::Column::OwnerToken.eq(owner_token))
            .filter(entity::group_generation_state::Column::InProgress.eq(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Records the usernames that failed every retry during the current run
    pub async fn set_failed_members(
        &self,
        group_id: i32,
        owner_token: &str,
        failed: &[String],
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::GroupGenerationState::update_many()
            .col_expr(
                entity::group_generation_state::Column::FailedMembers,
                Expr::value(serde_json::json!(failed)),
            )
            .col_expr(
                entity::group_generation_state::Column::UpdatedAt,
                Expr::value(now),
            )
            .filter(entity::group_generation_state::Column::GroupId.eq(group_id))
            .filter(entity::group_generation_state::Column::OwnerToken.eq(owner_token))
            .filter(entity::group_generation_state::Column::InProgress.eq(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Releases the lease at the end of a run
    ///
    /// Clears the lease and stage fields and records whether the run aborted.
    /// Returns whether the caller still held the lease.
    pub async fn release(
        &self,
        group_id: i32,
        owner_token: &str,
        aborted: bool,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::GroupGenerationState::update_many()
            .col_expr(
                entity::group_generation_state::Column::InProgress,
                Expr::value(false),
            )
            .col_expr(
                entity::group_generation_state::Column::OwnerToken,
                Expr::value(None::<String>),
            )
            .col_expr(
                entity::group_generation_state::Column::LeaseExpiresAt,
                Expr::value(None::<NaiveDateTime>),
            )
            .col_expr(
                entity::group_generation_state::Column::Stage,
                Expr::value(None::<String>),
            )
            .col_expr(
                entity::group_generation_state::Column::LastRunAborted,
                Expr::value(aborted),
            )
            .col_expr(
                entity::group_generation_state::Column::UpdatedAt,
                Expr::value(now),
            )
            .filter(entity::group_generation_state::Column::GroupId.eq(group_id))
            .filter(entity::group_generation_state::Column::OwnerToken.eq(owner_token))
            .filter(entity::group_generation_state::Column::InProgress.eq(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Gets every row whose run is marked in progress but whose lease has expired
    pub async fn find_expired(
        &self,
        now: NaiveDateTime,
    ) -> Result<Vec<entity::group_generation_state::Model>, DbErr> {
        entity::prelude::GroupGenerationState::find()
            .filter(entity::group_generation_state::Column::InProgress.eq(true))
            .filter(entity::group_generation_state::Column::LeaseExpiresAt.lt(now))
            .all(self.db)
            .await
    }

    /// Reclaims an expired lease, marking the abandoned run as aborted
    ///
    /// Returns whether a lease was reclaimed. A row whose lease is still live
    /// is left untouched.
    pub async fn reclaim(&self, group_id: i32, now: NaiveDateTime) -> Result<bool, DbErr> {
        let result = entity::prelude::GroupGenerationState::update_many()
            .col_expr(
                entity::group_generation_state::Column::InProgress,
                Expr::value(false),
            )
            .col_expr(
                entity::group_generation_state::Column::OwnerToken,
                Expr::value(None::<String>),
            )
            .col_expr(
                entity::group_generation_state::Column::LeaseExpiresAt,
                Expr::value(None::<NaiveDateTime>),
            )
            .col_expr(
                entity::group_generation_state::Column::Stage,
                Expr::value(None::<String>),
            )
            .col_expr(
                entity::group_generation_state::Column::LastRunAborted,
                Expr::value(true),
            )
            .col_expr(
                entity::group_generation_state::Column::UpdatedAt,
                Expr::value(now),
            )
            .filter(entity::group_generation_state::Column::GroupId.eq(group_id))
            .filter(entity::group_generation_state::Column::InProgress.eq(true))
            .filter(entity::group_generation_state::Column::LeaseExpiresAt.lt(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
