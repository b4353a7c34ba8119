use chrono::NaiveDateTime;
use entity::types::ChartCategory;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};

/// One fully recomputed history row, produced by a replay of the stored charts
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntryHistory {
    /// Chart category the entry belongs to
    pub category: ChartCategory,
    /// Normalized entry key
    pub entry_key: String,
    /// Display name
    pub name: String,
    /// Credited artist for tracks and albums
    pub artist: Option<String>,
    /// Weekly charts the entry appeared on
    pub weeks_on_chart: i32,
    /// Weeks the entry held position one
    pub weeks_at_top: i32,
    /// Consecutive-week streak as of the newest chart
    pub current_streak: i32,
    /// Longest consecutive-week streak ever held
    pub longest_streak: i32,
    /// Week of the entry's first appearance
    pub first_week_start: NaiveDateTime,
    /// Week of the entry's most recent appearance
    pub last_week_start: NaiveDateTime,
    /// Playcount summed over every charted week
    pub total_playcount: i64,
    /// Score summed over every charted week
    pub total_score: f64,
}

/// Repository for per-entry running chart history.
///
/// One row tracks an entry's appearances across a group's whole chart history. Rows are
/// updated incrementally as each finalized week lands; the major driver column is
/// refreshed separately by the records task.
pub struct EntryHistoryRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EntryHistoryRepository<'a, C> {
    /// Creates a new instance of [`EntryHistoryRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds the history row for one entry key
    pub async fn find_by_key(
        &self,
        group_id: i32,
        category: ChartCategory,
        entry_key: &str,
    ) -> Result<Option<entity::group_entry_history::Model>, DbErr> {
        entity::prelude::GroupEntryHistory::find()
            .filter(entity::group_entry_history::Column::GroupId.eq(group_id))
            .filter(entity::group_entry_history::Column::Category.eq(category))
            .filter(entity::group_entry_history::Column::EntryKey.eq(entry_key))
            .one(self.db)
            .await
    }

    /// Gets every history row of a group for one category
    pub async fn get_by_group_category(
        &self,
        group_id: i32,
        category: ChartCategory,
    ) -> Result<Vec<entity::group_entry_history::Model>, DbErr> {
        entity::prelude::GroupEntryHistory::find()
            .filter(entity::group_entry_history::Column::GroupId.eq(group_id))
            .filter(entity::group_entry_history::Column::Category.eq(category))
            .all(self.db)
            .await
    }

    /// Creates the history row for an entry's first chart appearance
    #[allow(clippy::too_many_arguments)]
    pub async fn create_first_appearance(
        &self,
        group_id: i32,
        category: ChartCategory,
        entry_key: String,
        name: String,
        artist: Option<String>,
        week_start: NaiveDateTime,
        playcount: i64,
        score: f64,
        at_top: bool,
        now: NaiveDateTime,
    ) -> Result<entity::group_entry_history::Model, DbErr> {
        let history = entity::group_entry_history::ActiveModel {
            group_id: ActiveValue::Set(group_id),
            category: ActiveValue::Set(category),
            entry_key: ActiveValue::Set(entry_key),
            name: ActiveValue::Set(name),
            artist: ActiveValue::Set(artist),
            weeks_on_chart: ActiveValue::Set(1),
            weeks_at_top: ActiveValue::Set(i32::from(at_top)),
            current_streak: ActiveValue::Set(1),
            longest_streak: ActiveValue::Set(1),
            first_week_start: ActiveValue::Set(week_start),
            last_week_start: ActiveValue::Set(week_start),
            total_playcount: ActiveValue::Set(playcount),
            total_score: ActiveValue::Set(score),
            major_driver_member_id: ActiveValue::Set(None),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        history.insert(self.db).await
    }

    /// Records one more chart appearance for an existing entry
    ///
    /// `consecutive` is whether this week directly follows the entry's previous
    /// appearance on the group's week grid.
    pub async fn record_appearance(
        &self,
        history: entity::group_entry_history::Model,
        week_start: NaiveDateTime,
        playcount: i64,
        score: f64,
        at_top: bool,
        consecutive: bool,
        now: NaiveDateTime,
    ) -> Result<entity::group_entry_history::Model, DbErr> {
        let current_streak = if consecutive {
            history.current_streak + 1
        } else {
            1
        };
        let longest_streak = history.longest_streak.max(current_streak);
        let weeks_at_top = history.weeks_at_top + i32::from(at_top);
        let weeks_on_chart = history.weeks_on_chart + 1;
        let total_playcount = history.total_playcount + playcount;
        let total_score = history.total_score + score;

        let mut history_am = history.into_active_model();
        history_am.weeks_on_chart = ActiveValue::Set(weeks_on_chart);
        history_am.weeks_at_top = ActiveValue::Set(weeks_at_top);
        history_am.current_streak = ActiveValue::Set(current_streak);
        history_am.longest_streak = ActiveValue::Set(longest_streak);
        history_am.last_week_start = ActiveValue::Set(week_start);
        history_am.total_playcount = ActiveValue::Set(total_playcount);
        history_am.total_score = ActiveValue::Set(total_score);
        history_am.updated_at = ActiveValue::Set(now);

        history_am.update(self.db).await
    }

    /// Sets the member credited as an entry's major driver
    pub async fn set_major_driver(
        &self,
        history: entity::group_entry_history::Model,
        member_id: Option<i32>,
        now: NaiveDateTime,
    ) -> Result<entity::group_entry_history::Model, DbErr> {
        let mut history_am = history.into_active_model();
        history_am.major_driver_member_id = ActiveValue::Set(member_id);
        history_am.updated_at = ActiveValue::Set(now);

        history_am.update(self.db).await
    }

    /// Replaces a group's whole history with rows recomputed from stored charts
    ///
    /// Driver attribution is dropped here; the records task restores it.
    pub async fn replace_all(
        &self,
        group_id: i32,
        rows: &[NewEntryHistory],
        now: NaiveDateTime,
    ) -> Result<(), DbErr> {
        entity::prelude::GroupEntryHistory::delete_many()
            .filter(entity::group_entry_history::Column::GroupId.eq(group_id))
            .exec(self.db)
            .await?;

        if rows.is_empty() {
            return Ok(());
        }

        let models = rows.iter().map(|row| entity::group_entry_history::ActiveModel {
            group_id: ActiveValue::Set(group_id),
            category: ActiveValue::Set(row.category),
            entry_key: ActiveValue::Set(row.entry_key.clone()),
            name: ActiveValue::Set(row.name.clone()),
            artist: ActiveValue::Set(row.artist.clone()),
            weeks_on_chart: ActiveValue::Set(row.weeks_on_chart),
            weeks_at_top: ActiveValue::Set(row.weeks_at_top),
            current_streak: ActiveValue::Set(row.current_streak),
            longest_streak: ActiveValue::Set(row.longest_streak),
            first_week_start: ActiveValue::Set(row.first_week_start),
            last_week_start: ActiveValue::Set(row.last_week_start),
            total_playcount: ActiveValue::Set(row.total_playcount),
            total_score: ActiveValue::Set(row.total_score),
            major_driver_member_id: ActiveValue::Set(None),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        });

        entity::prelude::GroupEntryHistory::insert_many(models)
            .exec(self.db)
            .await?;

        Ok(())
    }
}
