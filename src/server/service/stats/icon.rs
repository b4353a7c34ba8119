//! Group icon refresh from the latest chart's top artist.

use entity::types::ChartCategory;
use sea_orm::ConnectionTrait;

use crate::server::{
    data::{chart::ChartRepository, group::GroupRepository},
    error::Error,
};

/// Service pointing a group's icon at its current number one artist
pub struct IconService<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> IconService<'a, C> {
    /// Creates a new instance of [`IconService`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Stores the latest chart's top artist as the group's icon source
    ///
    /// A group without charts, or with an empty artist chart, keeps its current
    /// icon.
    pub async fn refresh(&self, group_id: i32) -> Result<(), Error> {
        let chart_repo = ChartRepository::new(self.db);

        let Some(chart) = chart_repo.find_latest(group_id).await? else {
            tracing::debug!("Group {} has no charts to derive an icon from", group_id);
            return Ok(());
        };

        let entries = chart_repo
            .get_entries_for_category(chart.id, ChartCategory::Artist)
            .await?;
        let Some(top) = entries.into_iter().next() else {
            return Ok(());
        };

        GroupRepository::new(self.db)
            .set_icon_source(group_id, top.name.clone())
            .await?;

        tracing::debug!("Refreshed icon source for group {} to {}", group_id, top.name);

        Ok(())
    }
}
