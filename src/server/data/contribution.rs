use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter,
};

/// Per-week increments to a member's cumulative contribution totals.
///
/// Each finished week produces one delta per member, applied on top of whatever
/// totals are already stored. The same shape doubles as absolute totals when a
/// full rebuild replaces the stored rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributionDelta {
    /// Summed score the member put on this week's charts
    pub score: f64,
    /// Summed playcount the member put on this week's charts
    pub playcount: i64,
    /// Artist entries debuting this week that the member listened to
    pub artist_debuts: i32,
    /// Track entries debuting this week that the member listened to
    pub track_debuts: i32,
    /// Album entries debuting this week that the member listened to
    pub album_debuts: i32,
    /// 1 when the member contributed to this week's number one artist
    pub artist_number_ones: i32,
    /// 1 when the member contributed to this week's number one track
    pub track_number_ones: i32,
    /// 1 when the member contributed to this week's number one album
    pub album_number_ones: i32,
    /// 1 when the member was the week's top scorer overall
    pub mvp_weeks: i32,
}

/// Repository for cumulative member contribution totals
pub struct ContributionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ContributionRepository<'a, C> {
    /// Creates a new instance of [`ContributionRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds the contribution row for one member of a group
    pub async fn find_by_member(
        &self,
        group_id: i32,
        member_id: i32,
    ) -> Result<Option<entity::group_member_contribution::Model>, DbErr> {
        entity::prelude::GroupMemberContribution::find()
            .filter(entity::group_member_contribution::Column::GroupId.eq(group_id))
            .filter(entity::group_member_contribution::Column::MemberId.eq(member_id))
            .one(self.db)
            .await
    }

    /// Gets all contribution rows of a group together with their member rows
    pub async fn get_by_group_with_members(
        &self,
        group_id: i32,
    ) -> Result<
        Vec<(
            entity::group_member_contribution::Model,
            Option<entity::chorus_member::Model>,
        )>,
        DbErr,
    > {
        entity::prelude::GroupMemberContribution::find()
            .filter(entity::group_member_contribution::Column::GroupId.eq(group_id))
            .find_also_related(entity::prelude::ChorusMember)
            .all(self.db)
            .await
    }

    /// Applies one week's increments on top of a member's stored totals
    ///
    /// Inserts the row when the member has no totals yet. Existing totals are
    /// only ever added to here; wholesale replacement is reserved for
    /// [`ContributionRepository::replace_all`].
    pub async fn apply_delta(
        &self,
        group_id: i32,
        member_id: i32,
        delta: &ContributionDelta,
        now: NaiveDateTime,
    ) -> Result<entity::group_member_contribution::Model, DbErr> {
        let existing = self.find_by_member(group_id, member_id).await?;

        match existing {
            Some(contribution) => {
                let mut contribution_am = contribution.clone().into_active_model();
                contribution_am.total_score =
                    ActiveValue::Set(contribution.total_score + delta.score);
                contribution_am.total_playcount =
                    ActiveValue::Set(contribution.total_playcount + delta.playcount);
                contribution_am.artist_debuts =
                    ActiveValue::Set(contribution.artist_debuts + delta.artist_debuts);
                contribution_am.track_debuts =
                    ActiveValue::Set(contribution.track_debuts + delta.track_debuts);
                contribution_am.album_debuts =
                    ActiveValue::Set(contribution.album_debuts + delta.album_debuts);
                contribution_am.artist_number_ones =
                    ActiveValue::Set(contribution.artist_number_ones + delta.artist_number_ones);
                contribution_am.track_number_ones =
                    ActiveValue::Set(contribution.track_number_ones + delta.track_number_ones);
                contribution_am.album_number_ones =
                    ActiveValue::Set(contribution.album_number_ones + delta.album_number_ones);
                contribution_am.mvp_weeks =
                    ActiveValue::Set(contribution.mvp_weeks + delta.mvp_weeks);
                contribution_am.updated_at = ActiveValue::Set(now);

                contribution_am.update(self.db).await
            }
            None => {
                let contribution = entity::group_member_contribution::ActiveModel {
                    group_id: ActiveValue::Set(group_id),
                    member_id: ActiveValue::Set(member_id),
                    total_score: ActiveValue::Set(delta.score),
                    total_playcount: ActiveValue::Set(delta.playcount),
                    artist_debuts: ActiveValue::Set(delta.artist_debuts),
                    track_debuts: ActiveValue::Set(delta.track_debuts),
                    album_debuts: ActiveValue::Set(delta.album_debuts),
                    artist_number_ones: ActiveValue::Set(delta.artist_number_ones),
                    track_number_ones: ActiveValue::Set(delta.track_number_ones),
                    album_number_ones: ActiveValue::Set(delta.album_number_ones),
                    mvp_weeks: ActiveValue::Set(delta.mvp_weeks),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                };

                contribution.insert(self.db).await
            }
        }
    }

    /// Replaces every contribution row of a group with freshly computed totals
    ///
    /// Only the explicit rebuild task goes through here; the weekly pipeline
    /// uses [`ContributionRepository::apply_delta`].
    pub async fn replace_all(
        &self,
        group_id: i32,
        totals: &[(i32, ContributionDelta)],
        now: NaiveDateTime,
    ) -> Result<(), DbErr> {
        entity::prelude::GroupMemberContribution::delete_many()
            .filter(entity::group_member_contribution::Column::GroupId.eq(group_id))
            .exec(self.db)
            .await?;

        if totals.is_empty() {
            return Ok(());
        }

        let rows = totals.iter().map(|(member_id, delta)| {
            entity::group_member_contribution::ActiveModel {
                group_id: ActiveValue::Set(group_id),
                member_id: ActiveValue::Set(*member_id),
                total_score: ActiveValue::Set(delta.score),
                total_playcount: ActiveValue::Set(delta.playcount),
                artist_debuts: ActiveValue::Set(delta.artist_debuts),
                track_debuts: ActiveValue::Set(delta.track_debuts),
                album_debuts: ActiveValue::Set(delta.album_debuts),
                artist_number_ones: ActiveValue::Set(delta.artist_number_ones),
                track_number_ones: ActiveValue::Set(delta.track_number_ones),
                album_number_ones: ActiveValue::Set(delta.album_number_ones),
                mvp_weeks: ActiveValue::Set(delta.mvp_weeks),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
        });

        entity::prelude::GroupMemberContribution::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Deletes a member's contribution row
    ///
    /// Returns OK regardless of whether a row existed.
    pub async fn delete_by_member(
        &self,
        contribution: entity::group_member_contribution::Model,
    ) -> Result<sea_orm::DeleteResult, DbErr> {
        contribution.delete(self.db).await
    }
}
