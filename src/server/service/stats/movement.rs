//! Position movement against the previous stored week.

use std::collections::HashMap;

use entity::types::ChartCategory;
use sea_orm::ConnectionTrait;

use crate::server::{data::chart::ChartRepository, error::Error};

/// Service stamping the latest chart's entries with their position change
pub struct MovementService<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MovementService<'a, C> {
    /// Creates a new instance of [`MovementService`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Recomputes movement for the group's most recent chart
    ///
    /// Movement is the previous position minus the new one, so climbing reads
    /// positive. Entries absent from the previous chart keep no movement, and only
    /// the latest week is ever stamped; older charts stay as they were published.
    pub async fn recompute_latest(&self, group_id: i32) -> Result<(), Error> {
        let chart_repo = ChartRepository::new(self.db);
        let charts = chart_repo.get_all_by_group(group_id).await?;

        let Some(latest) = charts.last() else {
            return Ok(());
        };
        let previous = charts
            .len()
            .checked_sub(2)
            .and_then(|index| charts.get(index));

        let mut previous_positions: HashMap<(ChartCategory, String), i32> = HashMap::new();
        if let Some(previous) = previous {
            for entry in chart_repo.get_entries(previous.id).await? {
                previous_positions.insert((entry.category, entry.entry_key), entry.position);
            }
        }

        for entry in chart_repo.get_entries(latest.id).await? {
            let movement = previous_positions
                .get(&(entry.category, entry.entry_key.clone()))
                .map(|previous_position| previous_position - entry.position);

            if entry.movement != movement {
                chart_repo.set_entry_movement(entry, movement).await?;
            }
        }

        Ok(())
    }
}
