use chrono::Utc;
use entity::types::ChartMode;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
};

/// Repository for listening group rows.
pub struct GroupRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> GroupRepository<'a, C> {
    /// Creates a new instance of [`GroupRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a group by its ID
    pub async fn get(&self, group_id: i32) -> Result<Option<entity::chorus_group::Model>, DbErr> {
        entity::prelude::ChorusGroup::find_by_id(group_id)
            .one(self.db)
            .await
    }

    /// Updates whichever chart settings are provided, leaving the rest untouched
    ///
    /// Values are expected to be validated by the caller before they reach the database.
    pub async fn update_chart_settings(
        &self,
        group_id: i32,
        chart_mode: Option<ChartMode>,
        chart_size: Option<i32>,
        tracking_day_of_week: Option<i32>,
    ) -> Result<Option<entity::chorus_group::Model>, DbErr> {
        let group = match entity::prelude::ChorusGroup::find_by_id(group_id)
            .one(self.db)
            .await?
        {
            Some(group) => group,
            None => return Ok(None),
        };

        let mut group_am = group.into_active_model();

        if let Some(mode) = chart_mode {
            group_am.chart_mode = ActiveValue::Set(mode);
        }
        if let Some(size) = chart_size {
            group_am.chart_size = ActiveValue::Set(size);
        }
        if let Some(day) = tracking_day_of_week {
            group_am.tracking_day_of_week = ActiveValue::Set(day);
        }
        group_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        let group = group_am.update(self.db).await?;

        Ok(Some(group))
    }

    /// Sets the artist the group's icon is derived from
    pub async fn set_icon_source(
        &self,
        group_id: i32,
        icon_source: String,
    ) -> Result<Option<entity::chorus_group::Model>, DbErr> {
        let group = match entity::prelude::ChorusGroup::find_by_id(group_id)
            .one(self.db)
            .await?
        {
            Some(group) => group,
            None => return Ok(None),
        };

        let mut group_am = group.into_active_model();
        group_am.icon_source = ActiveValue::Set(Some(icon_source));
        group_am.icon_updated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        let group = group_am.update(self.db).await?;

        Ok(Some(group))
    }
}
