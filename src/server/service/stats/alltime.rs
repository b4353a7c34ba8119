//! All-time group rankings recomputed from stored weekly charts.

use std::collections::HashMap;

use entity::types::ChartCategory;
use sea_orm::ConnectionTrait;

use crate::server::{
    data::{
        alltime::{AlltimeRepository, NewAlltimeEntry},
        chart::ChartRepository,
    },
    error::Error,
};

/// Rows kept per category in the all-time ranking.
const ALLTIME_SIZE: usize = 100;

/// Service recomputing a group's all-time rankings
pub struct AlltimeService<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AlltimeService<'a, C> {
    /// Creates a new instance of [`AlltimeService`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Replaces the group's all-time rankings with totals summed over every stored chart
    ///
    /// Entries are ranked by total score, which under every chart mode is the sum of
    /// that mode's weekly aggregate. Ties fall back to total playcount, then to the
    /// entry key. The display name follows the most recent chart's spelling.
    pub async fn rebuild(&self, group_id: i32) -> Result<(), Error> {
        let chart_repo = ChartRepository::new(self.db);
        let charts = chart_repo.get_all_by_group(group_id).await?;

        let mut accumulated: HashMap<(ChartCategory, String), NewAlltimeEntry> = HashMap::new();

        for chart in &charts {
            for entry in chart_repo.get_entries(chart.id).await? {
                let key = (entry.category, entry.entry_key.clone());

                match accumulated.get_mut(&key) {
                    Some(row) => {
                        row.total_score += entry.score;
                        row.total_playcount += entry.playcount;
                        row.weeks_on_chart += 1;
                        row.name = entry.name;
                        row.artist = entry.artist;
                    }
                    None => {
                        accumulated.insert(
                            key,
                            NewAlltimeEntry {
                                category: entry.category,
                                position: 0,
                                entry_key: entry.entry_key,
                                name: entry.name,
                                artist: entry.artist,
                                total_score: entry.score,
                                total_playcount: entry.playcount,
                                weeks_on_chart: 1,
                            },
                        );
                    }
                }
            }
        }

        let mut ranked: Vec<NewAlltimeEntry> = Vec::new();
        for category in [
            ChartCategory::Artist,
            ChartCategory::Track,
            ChartCategory::Album,
        ] {
            let mut rows: Vec<NewAlltimeEntry> = accumulated
                .values()
                .filter(|row| row.category == category)
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                b.total_score
                    .total_cmp(&a.total_score)
                    .then_with(|| b.total_playcount.cmp(&a.total_playcount))
                    .then_with(|| a.entry_key.cmp(&b.entry_key))
            });
            rows.truncate(ALLTIME_SIZE);

            for (index, mut row) in rows.into_iter().enumerate() {
                row.position = i32::try_from(index + 1).unwrap_or(i32::MAX);
                ranked.push(row);
            }
        }

        AlltimeRepository::new(self.db)
            .replace_all(group_id, &ranked)
            .await?;

        tracing::debug!(
            "Rebuilt {} all-time row(s) for group {} from {} chart(s)",
            ranked.len(),
            group_id,
            charts.len()
        );

        Ok(())
    }
}
