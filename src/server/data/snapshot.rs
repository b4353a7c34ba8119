use chrono::NaiveDateTime;
use entity::types::ChartCategory;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::server::scrobble::model::TopListItem;

/// Repository for members' fetched listening weeks.
///
/// A snapshot row marks a member/week pair as fetched; its play rows hold the raw top
/// lists. An existing snapshot is what lets rerun weeks skip the scrobble service.
pub struct SnapshotRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SnapshotRepository<'a, C> {
    /// Creates a new instance of [`SnapshotRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds the snapshot header for a member's week, if it was fetched before
    pub async fn find_by_member_week(
        &self,
        member_id: i32,
        week_start: NaiveDateTime,
    ) -> Result<Option<entity::member_week_snapshot::Model>, DbErr> {
        entity::prelude::MemberWeekSnapshot::find()
            .filter(entity::member_week_snapshot::Column::MemberId.eq(member_id))
            .filter(entity::member_week_snapshot::Column::WeekStart.eq(week_start))
            .one(self.db)
            .await
    }

    /// Creates the snapshot header for a member's week
    ///
    /// The header is written even when every top list came back empty, so later runs
    /// can tell "fetched, nothing played" apart from "never fetched".
    pub async fn create(
        &self,
        member_id: i32,
        week_start: NaiveDateTime,
        fetched_at: NaiveDateTime,
    ) -> Result<entity::member_week_snapshot::Model, DbErr> {
        let snapshot = entity::member_week_snapshot::ActiveModel {
            member_id: ActiveValue::Set(member_id),
            week_start: ActiveValue::Set(week_start),
            fetched_at: ActiveValue::Set(fetched_at),
            ..Default::default()
        };

        snapshot.insert(self.db).await
    }

    /// Inserts the raw top list rows for one category of a snapshot
    pub async fn insert_plays(
        &self,
        snapshot_id: i32,
        category: ChartCategory,
        items: &[TopListItem],
    ) -> Result<(), DbErr> {
        if items.is_empty() {
            return Ok(());
        }

        let rows = items.iter().map(|item| entity::member_week_play::ActiveModel {
            snapshot_id: ActiveValue::Set(snapshot_id),
            category: ActiveValue::Set(category),
            rank: ActiveValue::Set(item.rank),
            name: ActiveValue::Set(item.name.clone()),
            artist: ActiveValue::Set(item.artist.clone()),
            playcount: ActiveValue::Set(item.playcount),
            ..Default::default()
        });

        entity::prelude::MemberWeekPlay::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Gets a snapshot's play rows for one category ordered by rank
    pub async fn get_plays(
        &self,
        snapshot_id: i32,
        category: ChartCategory,
    ) -> Result<Vec<entity::member_week_play::Model>, DbErr> {
        entity::prelude::MemberWeekPlay::find()
            .filter(entity::member_week_play::Column::SnapshotId.eq(snapshot_id))
            .filter(entity::member_week_play::Column::Category.eq(category))
            .order_by_asc(entity::member_week_play::Column::Rank)
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {

    mod find_by_member_week {
        use chorus_test_utils::prelude::*;

        use crate::server::data::snapshot::SnapshotRepository;

        /// Expect Ok(Some(_)) only for the fetched member/week pair
        #[tokio::test]
        async fn finds_only_the_fetched_week() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let member_model = test.group().insert_member(group_model.id, "foo").await?;

            let week = chorus_test_utils::constant::test_week_start(0);
            let other_week = chorus_test_utils::constant::test_week_start(1);
            test.listening()
                .insert_snapshot(member_model.id, week)
                .await?;

            let snapshot_repo = SnapshotRepository::new(&test.state.db);

            assert!(snapshot_repo
                .find_by_member_week(member_model.id, week)
                .await?
                .is_some());
            assert!(snapshot_repo
                .find_by_member_week(member_model.id, other_week)
                .await?
                .is_none());

            Ok(())
        }
    }

    mod insert_plays {
        use chorus_test_utils::prelude::*;
        use entity::types::ChartCategory;

        use crate::server::data::snapshot::SnapshotRepository;
        use crate::server::scrobble::model::TopListItem;

        /// Expect play rows to round-trip ordered by rank
        #[tokio::test]
        async fn stores_and_orders_play_rows() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let member_model = test.group().insert_member(group_model.id, "foo").await?;
            let week = chorus_test_utils::constant::test_week_start(0);
            let snapshot_model = test
                .listening()
                .insert_snapshot(member_model.id, week)
                .await?;

            let snapshot_repo = SnapshotRepository::new(&test.state.db);
            let items = vec![
                TopListItem {
                    rank: 2,
                    name: "Idioteque".to_string(),
                    artist: Some("Radiohead".to_string()),
                    playcount: 4,
                },
                TopListItem {
                    rank: 1,
                    name: "Creep".to_string(),
                    artist: Some("Radiohead".to_string()),
                    playcount: 9,
                },
            ];
            snapshot_repo
                .insert_plays(snapshot_model.id, ChartCategory::Track, &items)
                .await?;

            let plays = snapshot_repo
                .get_plays(snapshot_model.id, ChartCategory::Track)
                .await?;

            assert_eq!(plays.len(), 2);
            assert_eq!(plays[0].rank, 1);
            assert_eq!(plays[0].name, "Creep");
            assert_eq!(plays[1].rank, 2);

            Ok(())
        }

        /// Expect empty category inserts to be a no-op
        #[tokio::test]
        async fn empty_items_insert_nothing() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let member_model = test.group().insert_member(group_model.id, "foo").await?;
            let week = chorus_test_utils::constant::test_week_start(0);
            let snapshot_model = test
                .listening()
                .insert_snapshot(member_model.id, week)
                .await?;

            let snapshot_repo = SnapshotRepository::new(&test.state.db);
            snapshot_repo
                .insert_plays(snapshot_model.id, entity::types::ChartCategory::Artist, &[])
                .await?;

            let plays = snapshot_repo
                .get_plays(snapshot_model.id, entity::types::ChartCategory::Artist)
                .await?;
            assert!(plays.is_empty());

            Ok(())
        }
    }
}
