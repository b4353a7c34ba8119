//! Incremental and replayed per-entry chart history.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDateTime, Utc};
use entity::types::ChartCategory;
use sea_orm::{ActiveEnum, ConnectionTrait};

use crate::server::{
    data::{
        chart::ChartRepository,
        history::{EntryHistoryRepository, NewEntryHistory},
    },
    error::Error,
    service::aggregation::AggregatedEntry,
};

/// Width of one slot on the group's week grid.
///
/// An appearance exactly one slot after the previous one extends the entry's
/// streak; any other gap, including the irregular week after a tracking day
/// change, resets it.
const WEEK_GRID: Duration = Duration::days(7);

/// Service maintaining each entry's running history across a group's charts
pub struct EntryHistoryService<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EntryHistoryService<'a, C> {
    /// Creates a new instance of [`EntryHistoryService`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Folds one finalized week into the group's history rows
    ///
    /// Runs inside the transaction persisting the week. Entries already recorded
    /// for this or a later week are left untouched, so replacing an overlapped
    /// chart cannot count the same appearance twice; the totals the replaced
    /// chart contributed stay until the rebuild task replays the charts.
    ///
    /// # Returns
    /// The entries that appeared on a chart of this group for the first time.
    pub async fn record_week(
        &self,
        group_id: i32,
        week_start: NaiveDateTime,
        categories: &[(ChartCategory, Vec<AggregatedEntry>)],
        now: NaiveDateTime,
    ) -> Result<HashSet<(ChartCategory, String)>, Error> {
        let history_repo = EntryHistoryRepository::new(self.db);
        let mut debuts = HashSet::new();

        for (category, entries) in categories {
            for entry in entries {
                let at_top = entry.position == 1;
                let existing = history_repo
                    .find_by_key(group_id, *category, &entry.entry_key)
                    .await?;

                match existing {
                    Some(history) => {
                        if history.last_week_start >= week_start {
                            continue;
                        }

                        let consecutive = week_start - history.last_week_start == WEEK_GRID;
                        history_repo
                            .record_appearance(
                                history,
                                week_start,
                                entry.playcount,
                                entry.score,
                                at_top,
                                consecutive,
                                now,
                            )
                            .await?;
                    }
                    None => {
                        history_repo
                            .create_first_appearance(
                                group_id,
                                *category,
                                entry.entry_key.clone(),
                                entry.name.clone(),
                                entry.artist.clone(),
                                week_start,
                                entry.playcount,
                                entry.score,
                                at_top,
                                now,
                            )
                            .await?;
                        debuts.insert((*category, entry.entry_key.clone()));
                    }
                }
            }
        }

        Ok(debuts)
    }

    /// Rebuilds the group's whole history by replaying its stored charts
    ///
    /// Charts are replayed oldest-first so streaks and first appearances come out
    /// the same as an uninterrupted incremental run would have produced. Driver
    /// attribution is cleared and restored by the records task.
    pub async fn rebuild(&self, group_id: i32) -> Result<(), Error> {
        let chart_repo = ChartRepository::new(self.db);
        let charts = chart_repo.get_all_by_group(group_id).await?;

        let mut accumulated: HashMap<(ChartCategory, String), NewEntryHistory> = HashMap::new();

        for chart in &charts {
            let entries = chart_repo.get_entries(chart.id).await?;

            for entry in entries {
                let at_top = entry.position == 1;
                let key = (entry.category, entry.entry_key.clone());

                match accumulated.get_mut(&key) {
                    Some(row) => {
                        let consecutive = chart.week_start - row.last_week_start == WEEK_GRID;
                        row.current_streak = if consecutive { row.current_streak + 1 } else { 1 };
                        row.longest_streak = row.longest_streak.max(row.current_streak);
                        row.weeks_on_chart += 1;
                        row.weeks_at_top += i32::from(at_top);
                        row.last_week_start = chart.week_start;
                        row.total_playcount += entry.playcount;
                        row.total_score += entry.score;
                        row.name = entry.name;
                        row.artist = entry.artist;
                    }
                    None => {
                        accumulated.insert(
                            key,
                            NewEntryHistory {
                                category: entry.category,
                                entry_key: entry.entry_key,
                                name: entry.name,
                                artist: entry.artist,
                                weeks_on_chart: 1,
                                weeks_at_top: i32::from(at_top),
                                current_streak: 1,
                                longest_streak: 1,
                                first_week_start: chart.week_start,
                                last_week_start: chart.week_start,
                                total_playcount: entry.playcount,
                                total_score: entry.score,
                            },
                        );
                    }
                }
            }
        }

        let mut rows: Vec<NewEntryHistory> = accumulated.into_values().collect();
        rows.sort_by(|a, b| {
            a.category
                .to_value()
                .cmp(&b.category.to_value())
                .then_with(|| a.entry_key.cmp(&b.entry_key))
        });

        let now = Utc::now().naive_utc();
        EntryHistoryRepository::new(self.db)
            .replace_all(group_id, &rows, now)
            .await?;

        tracing::debug!(
            "Rebuilt {} history row(s) for group {} from {} chart(s)",
            rows.len(),
            group_id,
            charts.len()
        );

        Ok(())
    }
}
