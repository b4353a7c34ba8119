use chrono::NaiveDateTime;
use entity::types::ChartCategory;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

/// A scored entry ready for persistence.
#[derive(Debug, Clone)]
pub struct NewScore {
    /// Chart category the entry was ranked in.
    pub category: ChartCategory,
    /// Normalized deduplication key.
    pub entry_key: String,
    /// Rank-derived score.
    pub score: f64,
    /// Plays behind the rank.
    pub playcount: i64,
}

/// Repository for members' per-week entry scores.
///
/// Scores are a derived artifact of a member's snapshot; reprocessing a week replaces
/// them wholesale so stale rows can never mix with fresh ones.
pub struct ScoreRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ScoreRepository<'a, C> {
    /// Creates a new instance of [`ScoreRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Replaces every score row for a member's week with the provided set
    pub async fn replace_for_member_week(
        &self,
        member_id: i32,
        week_start: NaiveDateTime,
        scores: &[NewScore],
    ) -> Result<(), DbErr> {
        entity::prelude::MemberWeekScore::delete_many()
            .filter(entity::member_week_score::Column::MemberId.eq(member_id))
            .filter(entity::member_week_score::Column::WeekStart.eq(week_start))
            .exec(self.db)
            .await?;

        if scores.is_empty() {
            return Ok(());
        }

        let rows = scores.iter().map(|score| entity::member_week_score::ActiveModel {
            member_id: ActiveValue::Set(member_id),
            week_start: ActiveValue::Set(week_start),
            category: ActiveValue::Set(score.category),
            entry_key: ActiveValue::Set(score.entry_key.clone()),
            score: ActiveValue::Set(score.score),
            playcount: ActiveValue::Set(score.playcount),
            ..Default::default()
        });

        entity::prelude::MemberWeekScore::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Gets one member's score rows for a week
    pub async fn get_by_member_week(
        &self,
        member_id: i32,
        week_start: NaiveDateTime,
    ) -> Result<Vec<entity::member_week_score::Model>, DbErr> {
        entity::prelude::MemberWeekScore::find()
            .filter(entity::member_week_score::Column::MemberId.eq(member_id))
            .filter(entity::member_week_score::Column::WeekStart.eq(week_start))
            .order_by_asc(entity::member_week_score::Column::Category)
            .all(self.db)
            .await
    }

    /// Gets every member's score rows for a week across the given members
    pub async fn get_by_members_week(
        &self,
        member_ids: &[i32],
        week_start: NaiveDateTime,
    ) -> Result<Vec<entity::member_week_score::Model>, DbErr> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::MemberWeekScore::find()
            .filter(entity::member_week_score::Column::MemberId.is_in(member_ids.iter().copied()))
            .filter(entity::member_week_score::Column::WeekStart.eq(week_start))
            .all(self.db)
            .await
    }

    /// Gets every score row the given members ever logged for one entry
    pub async fn get_by_members_for_entry(
        &self,
        member_ids: &[i32],
        category: ChartCategory,
        entry_key: &str,
    ) -> Result<Vec<entity::member_week_score::Model>, DbErr> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::MemberWeekScore::find()
            .filter(entity::member_week_score::Column::MemberId.is_in(member_ids.iter().copied()))
            .filter(entity::member_week_score::Column::Category.eq(category))
            .filter(entity::member_week_score::Column::EntryKey.eq(entry_key))
            .all(self.db)
            .await
    }
}
