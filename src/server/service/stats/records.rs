//! Best-ever group records and entry driver attribution.

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use entity::types::{ChartCategory, RecordKind};
use sea_orm::ConnectionTrait;

use crate::server::{
    data::{
        chart::ChartRepository,
        history::EntryHistoryRepository,
        member::MemberRepository,
        record::{NewRecord, RecordRepository},
    },
    error::Error,
    service::analytics::EntryAnalyticsCache,
};

/// The single-week playcount peak of one category.
struct WeekBest {
    entry_key: String,
    name: String,
    artist: Option<String>,
    playcount: i64,
    week_start: NaiveDateTime,
}

/// Service recomputing a group's records and per-entry driver attribution.
///
/// Runs from the deferred task queue, so it reads whatever charts and history are
/// stored at the time rather than coordinating with an active generation run.
pub struct RecordService<'a, C: ConnectionTrait> {
    db: &'a C,
    analytics: &'a EntryAnalyticsCache,
}

impl<'a, C: ConnectionTrait> RecordService<'a, C> {
    /// Creates a new instance of [`RecordService`]
    pub fn new(db: &'a C, analytics: &'a EntryAnalyticsCache) -> Self {
        Self { db, analytics }
    }

    /// Replaces the group's stored records and refreshes entry driver attribution
    ///
    /// History-derived records tie-break toward the lexicographically first entry
    /// key. The single-week playcount record keeps the earliest week on a tie, so a
    /// record is only ever taken by beating it outright.
    pub async fn recalculate(&self, group_id: i32) -> Result<(), Error> {
        let members = MemberRepository::new(self.db)
            .get_all_by_group_id(group_id)
            .await?;
        let member_ids: Vec<i32> = members.iter().map(|member| member.id).collect();

        let week_bests = self.best_single_weeks(group_id).await?;

        let history_repo = EntryHistoryRepository::new(self.db);
        let now = Utc::now().naive_utc();
        let mut records: Vec<NewRecord> = Vec::new();
        let mut driver_updates = 0usize;

        for category in [
            ChartCategory::Artist,
            ChartCategory::Track,
            ChartCategory::Album,
        ] {
            let rows = history_repo.get_by_group_category(group_id, category).await?;

            if let Some(holder) = best_by(&rows, |row| row.weeks_on_chart) {
                records.push(history_record(
                    category,
                    RecordKind::WeeksOnChart,
                    holder,
                    holder.weeks_on_chart,
                ));
            }
            if let Some(holder) = best_by(&rows, |row| row.weeks_at_top) {
                records.push(history_record(
                    category,
                    RecordKind::WeeksAtTop,
                    holder,
                    holder.weeks_at_top,
                ));
            }
            if let Some(holder) = best_by(&rows, |row| row.longest_streak) {
                records.push(history_record(
                    category,
                    RecordKind::LongestStreak,
                    holder,
                    holder.longest_streak,
                ));
            }
            if let Some(best) = week_bests.get(&category) {
                records.push(NewRecord {
                    category,
                    record_kind: RecordKind::WeekPlaycount,
                    entry_key: best.entry_key.clone(),
                    name: best.name.clone(),
                    artist: best.artist.clone(),
                    value: best.playcount,
                    week_start: Some(best.week_start),
                });
            }

            for row in rows {
                let analytics = self
                    .analytics
                    .get_or_compute(self.db, group_id, &member_ids, category, &row.entry_key)
                    .await?;

                if analytics.major_driver_member_id != row.major_driver_member_id {
                    history_repo
                        .set_major_driver(row, analytics.major_driver_member_id, now)
                        .await?;
                    driver_updates += 1;
                }
            }
        }

        RecordRepository::new(self.db)
            .replace_all(group_id, &records, now)
            .await?;

        tracing::debug!(
            "Recalculated {} record(s) for group {} with {} driver update(s)",
            records.len(),
            group_id,
            driver_updates
        );

        Ok(())
    }

    /// Finds the highest single-week entry playcount per category
    async fn best_single_weeks(
        &self,
        group_id: i32,
    ) -> Result<HashMap<ChartCategory, WeekBest>, Error> {
        let chart_repo = ChartRepository::new(self.db);
        let mut bests: HashMap<ChartCategory, WeekBest> = HashMap::new();

        for chart in chart_repo.get_all_by_group(group_id).await? {
            for entry in chart_repo.get_entries(chart.id).await? {
                let beats = bests
                    .get(&entry.category)
                    .map_or(true, |best| entry.playcount > best.playcount);
                if beats {
                    bests.insert(
                        entry.category,
                        WeekBest {
                            entry_key: entry.entry_key,
                            name: entry.name,
                            artist: entry.artist,
                            playcount: entry.playcount,
                            week_start: chart.week_start,
                        },
                    );
                }
            }
        }

        Ok(bests)
    }
}

/// Picks the history row with the highest positive value of one measurement.
fn best_by(
    rows: &[entity::group_entry_history::Model],
    value: impl Fn(&entity::group_entry_history::Model) -> i32,
) -> Option<&entity::group_entry_history::Model> {
    rows.iter()
        .filter(|row| value(row) > 0)
        .max_by(|a, b| {
            value(a)
                .cmp(&value(b))
                .then_with(|| b.entry_key.cmp(&a.entry_key))
        })
}

/// Builds a record row holding one history-derived measurement.
fn history_record(
    category: ChartCategory,
    record_kind: RecordKind,
    holder: &entity::group_entry_history::Model,
    value: i32,
) -> NewRecord {
    NewRecord {
        category,
        record_kind,
        entry_key: holder.entry_key.clone(),
        name: holder.name.clone(),
        artist: holder.artist.clone(),
        value: i64::from(value),
        week_start: None,
    }
}
