//! Group and member database insertion utilities.

use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};

use entity::types::ChartMode;

use crate::{error::TestError, TestSetup};

impl TestSetup {
    pub fn group<'a>(&'a mut self) -> GroupFixtures<'a> {
        GroupFixtures { setup: self }
    }
}

pub struct GroupFixtures<'a> {
    pub setup: &'a mut TestSetup,
}

impl<'a> GroupFixtures<'a> {
    /// Insert a group with standard test chart settings.
    ///
    /// The group starts with chart size 25 and `vs` mode; tests that need other
    /// settings update the row afterwards or pass settings through the
    /// generation request.
    ///
    /// # Arguments
    /// - `name` - Display name of the group
    /// - `tracking_day_of_week` - Day the chart week starts on, 0 = Sunday
    ///
    /// # Returns
    /// - `Ok(Model)` - The created group record
    /// - `Err(TestError::DbErr)` - Insert operation failed
    pub async fn insert_group(
        &self,
        name: &str,
        tracking_day_of_week: i32,
    ) -> Result<entity::chorus_group::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::ChorusGroup::insert(entity::chorus_group::ActiveModel {
                name: ActiveValue::Set(name.to_string()),
                tracking_day_of_week: ActiveValue::Set(tracking_day_of_week),
                chart_size: ActiveValue::Set(25),
                chart_mode: ActiveValue::Set(ChartMode::Vs),
                icon_source: ActiveValue::Set(None),
                icon_updated_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.state.db)
            .await?,
        )
    }

    /// Insert a member into a group.
    ///
    /// The member gets a fixed internal user id and no session key; the
    /// username is what mock scrobble endpoints key on.
    ///
    /// # Arguments
    /// - `group_id` - Group the member joins
    /// - `username` - Username on the external listening-history service
    ///
    /// # Returns
    /// - `Ok(Model)` - The created member record
    /// - `Err(TestError::DbErr)` - Insert operation failed
    pub async fn insert_member(
        &self,
        group_id: i32,
        username: &str,
    ) -> Result<entity::chorus_member::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::ChorusMember::insert(entity::chorus_member::ActiveModel {
                group_id: ActiveValue::Set(group_id),
                user_id: ActiveValue::Set(1),
                username: ActiveValue::Set(username.to_string()),
                session_key: ActiveValue::Set(None),
                joined_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.state.db)
            .await?,
        )
    }
}
