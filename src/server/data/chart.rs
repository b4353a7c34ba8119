use chrono::NaiveDateTime;
use entity::types::ChartCategory;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

/// A ranked chart entry ready for persistence.
#[derive(Debug, Clone)]
pub struct NewChartEntry {
    /// Chart category the entry belongs to.
    pub category: ChartCategory,
    /// 1-based position within the category.
    pub position: i32,
    /// Normalized deduplication key.
    pub entry_key: String,
    /// Display name.
    pub name: String,
    /// Artist credit for track and album entries.
    pub artist: Option<String>,
    /// Combined play count across members.
    pub playcount: i64,
    /// Aggregated score.
    pub score: f64,
    /// Position change against the previous week, set during finalization.
    pub movement: Option<i32>,
}

/// Repository for generated weekly group charts and their entries.
pub struct ChartRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ChartRepository<'a, C> {
    /// Creates a new instance of [`ChartRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds charts whose stored range overlaps the half-open interval `[start, end)`
    ///
    /// Overlap means `stored_start < end AND start < stored_end`. A chart for the exact
    /// same week overlaps itself and is therefore included.
    pub async fn find_overlapping(
        &self,
        group_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<entity::group_week_chart::Model>, DbErr> {
        entity::prelude::GroupWeekChart::find()
            .filter(entity::group_week_chart::Column::GroupId.eq(group_id))
            .filter(entity::group_week_chart::Column::WeekStart.lt(end))
            .filter(entity::group_week_chart::Column::WeekEnd.gt(start))
            .all(self.db)
            .await
    }

    /// Deletes every chart overlapping `[start, end)` along with its entries
    ///
    /// Returns the number of charts removed.
    pub async fn delete_overlapping(
        &self,
        group_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        let overlapping = self.find_overlapping(group_id, start, end).await?;

        if overlapping.is_empty() {
            return Ok(0);
        }

        let chart_ids: Vec<i32> = overlapping.iter().map(|chart| chart.id).collect();

        entity::prelude::GroupWeekEntry::delete_many()
            .filter(entity::group_week_entry::Column::ChartId.is_in(chart_ids.clone()))
            .exec(self.db)
            .await?;

        let result = entity::prelude::GroupWeekChart::delete_many()
            .filter(entity::group_week_chart::Column::Id.is_in(chart_ids))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Creates a chart header for one group week
    pub async fn create(
        &self,
        group_id: i32,
        week_start: NaiveDateTime,
        week_end: NaiveDateTime,
        created_at: NaiveDateTime,
    ) -> Result<entity::group_week_chart::Model, DbErr> {
        let chart = entity::group_week_chart::ActiveModel {
            group_id: ActiveValue::Set(group_id),
            week_start: ActiveValue::Set(week_start),
            week_end: ActiveValue::Set(week_end),
            created_at: ActiveValue::Set(created_at),
            ..Default::default()
        };

        chart.insert(self.db).await
    }

    /// Inserts the ranked entries of a chart
    pub async fn insert_entries(
        &self,
        chart_id: i32,
        entries: &[NewChartEntry],
    ) -> Result<(), DbErr> {
        if entries.is_empty() {
            return Ok(());
        }

        let rows = entries.iter().map(|entry| entity::group_week_entry::ActiveModel {
            chart_id: ActiveValue::Set(chart_id),
            category: ActiveValue::Set(entry.category),
            position: ActiveValue::Set(entry.position),
            entry_key: ActiveValue::Set(entry.entry_key.clone()),
            name: ActiveValue::Set(entry.name.clone()),
            artist: ActiveValue::Set(entry.artist.clone()),
            playcount: ActiveValue::Set(entry.playcount),
            score: ActiveValue::Set(entry.score),
            movement: ActiveValue::Set(entry.movement),
            ..Default::default()
        });

        entity::prelude::GroupWeekEntry::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Finds the most recent chart for a group by week start
    pub async fn find_latest(
        &self,
        group_id: i32,
    ) -> Result<Option<entity::group_week_chart::Model>, DbErr> {
        entity::prelude::GroupWeekChart::find()
            .filter(entity::group_week_chart::Column::GroupId.eq(group_id))
            .order_by_desc(entity::group_week_chart::Column::WeekStart)
            .one(self.db)
            .await
    }

    /// Finds a group's chart for an exact week start
    pub async fn find_by_week(
        &self,
        group_id: i32,
        week_start: NaiveDateTime,
    ) -> Result<Option<entity::group_week_chart::Model>, DbErr> {
        entity::prelude::GroupWeekChart::find()
            .filter(entity::group_week_chart::Column::GroupId.eq(group_id))
            .filter(entity::group_week_chart::Column::WeekStart.eq(week_start))
            .one(self.db)
            .await
    }

    /// Gets every chart of a group ordered oldest-first
    pub async fn get_all_by_group(
        &self,
        group_id: i32,
    ) -> Result<Vec<entity::group_week_chart::Model>, DbErr> {
        entity::prelude::GroupWeekChart::find()
            .filter(entity::group_week_chart::Column::GroupId.eq(group_id))
            .order_by_asc(entity::group_week_chart::Column::WeekStart)
            .all(self.db)
            .await
    }

    /// Gets a chart's entries ordered by category then position
    pub async fn get_entries(
        &self,
        chart_id: i32,
    ) -> Result<Vec<entity::group_week_entry::Model>, DbErr> {
        entity::prelude::GroupWeekEntry::find()
            .filter(entity::group_week_entry::Column::ChartId.eq(chart_id))
            .order_by_asc(entity::group_week_entry::Column::Category)
            .order_by_asc(entity::group_week_entry::Column::Position)
            .all(self.db)
            .await
    }

    /// Gets one category of a chart's entries ordered by position
    pub async fn get_entries_for_category(
        &self,
        chart_id: i32,
        category: ChartCategory,
    ) -> Result<Vec<entity::group_week_entry::Model>, DbErr> {
        entity::prelude::GroupWeekEntry::find()
            .filter(entity::group_week_entry::Column::ChartId.eq(chart_id))
            .filter(entity::group_week_entry::Column::Category.eq(category))
            .order_by_asc(entity::group_week_entry::Column::Position)
            .all(self.db)
            .await
    }

    /// Sets the movement of a single chart entry
    pub async fn set_entry_movement(
        &self,
        entry: entity::group_week_entry::Model,
        movement: Option<i32>,
    ) -> Result<entity::group_week_entry::Model, DbErr> {
        let mut entry_am = entry.into_active_model();
        entry_am.movement = ActiveValue::Set(movement);

        entry_am.update(self.db).await
    }
}
