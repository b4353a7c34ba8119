//! Stored listening week and chart database insertion utilities.

use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveValue, EntityTrait};

use entity::types::ChartCategory;

use crate::{error::TestError, TestSetup};

impl TestSetup {
    pub fn listening<'a>(&'a mut self) -> ListeningFixtures<'a> {
        ListeningFixtures { setup: self }
    }
}

pub struct ListeningFixtures<'a> {
    pub setup: &'a mut TestSetup,
}

impl<'a> ListeningFixtures<'a> {
    /// Insert a fetched-week marker for a member.
    ///
    /// The marker alone is what cache checks look at, so no play rows are
    /// created; a member with a marker and no plays is a valid zero-listen
    /// week.
    ///
    /// # Arguments
    /// - `member_id` - Member the week belongs to
    /// - `week_start` - Start of the fetched week
    ///
    /// # Returns
    /// - `Ok(Model)` - The created snapshot record
    /// - `Err(TestError::DbErr)` - Insert operation failed
    pub async fn insert_snapshot(
        &self,
        member_id: i32,
        week_start: NaiveDateTime,
    ) -> Result<entity::member_week_snapshot::Model, TestError> {
        Ok(
            entity::prelude::MemberWeekSnapshot::insert(entity::member_week_snapshot::ActiveModel {
                member_id: ActiveValue::Set(member_id),
                week_start: ActiveValue::Set(week_start),
                fetched_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.state.db)
            .await?,
        )
    }

    /// Insert a stored chart week for a group, without entries.
    ///
    /// # Arguments
    /// - `group_id` - Group the chart belongs to
    /// - `week_start` - Start of the chart week
    /// - `week_end` - End of the chart week
    ///
    /// # Returns
    /// - `Ok(Model)` - The created chart record
    /// - `Err(TestError::DbErr)` - Insert operation failed
    pub async fn insert_chart(
        &self,
        group_id: i32,
        week_start: NaiveDateTime,
        week_end: NaiveDateTime,
    ) -> Result<entity::group_week_chart::Model, TestError> {
        Ok(
            entity::prelude::GroupWeekChart::insert(entity::group_week_chart::ActiveModel {
                group_id: ActiveValue::Set(group_id),
                week_start: ActiveValue::Set(week_start),
                week_end: ActiveValue::Set(week_end),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.state.db)
            .await?,
        )
    }

    /// Insert a stored chart week holding a single artist entry at position 1.
    ///
    /// Useful for overlap and movement tests that only need the chart to be
    /// non-empty.
    ///
    /// # Arguments
    /// - `group_id` - Group the chart belongs to
    /// - `week_start` - Start of the chart week
    /// - `week_end` - End of the chart week
    /// - `entry_key` - Aggregation key of the single entry; also used as its name
    ///
    /// # Returns
    /// - `Ok(Model)` - The created chart record; the entry hangs off its id
    /// - `Err(TestError::DbErr)` - Insert operation failed
    pub async fn insert_chart_with_entry(
        &self,
        group_id: i32,
        week_start: NaiveDateTime,
        week_end: NaiveDateTime,
        entry_key: &str,
    ) -> Result<entity::group_week_chart::Model, TestError> {
        let chart = self.insert_chart(group_id, week_start, week_end).await?;

        entity::prelude::GroupWeekEntry::insert(entity::group_week_entry::ActiveModel {
            chart_id: ActiveValue::Set(chart.id),
            category: ActiveValue::Set(ChartCategory::Artist),
            position: ActiveValue::Set(1),
            entry_key: ActiveValue::Set(entry_key.to_string()),
            name: ActiveValue::Set(entry_key.to_string()),
            artist: ActiveValue::Set(None),
            playcount: ActiveValue::Set(10),
            score: ActiveValue::Set(10.0),
            movement: ActiveValue::Set(None),
            ..Default::default()
        })
        .exec(&self.setup.state.db)
        .await?;

        Ok(chart)
    }
}
