use entity::types::ChartCategory;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

/// One freshly ranked all-time row, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlltimeEntry {
    /// Chart category the row ranks within
    pub category: ChartCategory,
    /// 1-based position within the category
    pub position: i32,
    /// Normalized entry key
    pub entry_key: String,
    /// Display name
    pub name: String,
    /// Credited artist for tracks and albums
    pub artist: Option<String>,
    /// Score summed over every charted week
    pub total_score: f64,
    /// Playcount summed over every charted week
    pub total_playcount: i64,
    /// Number of weekly charts the entry appeared on
    pub weeks_on_chart: i32,
}

/// Repository for the all-time rankings of a group.
///
/// The table holds no incremental state. Every generation run recomputes the
/// rankings from entry history and swaps the stored rows out in one go.
pub struct AlltimeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AlltimeRepository<'a, C> {
    /// Creates a new instance of [`AlltimeRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Replaces a group's all-time rankings with freshly computed rows
    pub async fn replace_all(
        &self,
        group_id: i32,
        entries: &[NewAlltimeEntry],
    ) -> Result<(), DbErr> {
        entity::prelude::GroupAlltimeEntry::delete_many()
            .filter(entity::group_alltime_entry::Column::GroupId.eq(group_id))
            .exec(self.db)
            .await?;

        if entries.is_empty() {
            return Ok(());
        }

        let rows = entries
            .iter()
            .map(|entry| entity::group_alltime_entry::ActiveModel {
                group_id: ActiveValue::Set(group_id),
                category: ActiveValue::Set(entry.category),
                position: ActiveValue::Set(entry.position),
                entry_key: ActiveValue::Set(entry.entry_key.clone()),
                name: ActiveValue::Set(entry.name.clone()),
                artist: ActiveValue::Set(entry.artist.clone()),
                total_score: ActiveValue::Set(entry.total_score),
                total_playcount: ActiveValue::Set(entry.total_playcount),
                weeks_on_chart: ActiveValue::Set(entry.weeks_on_chart),
                ..Default::default()
            });

        entity::prelude::GroupAlltimeEntry::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Gets a group's all-time ranking for one category, best first
    pub async fn get_by_group_category(
        &self,
        group_id: i32,
        category: ChartCategory,
    ) -> Result<Vec<entity::group_alltime_entry::Model>, DbErr> {
        entity::prelude::GroupAlltimeEntry::find()
            .filter(entity::group_alltime_entry::Column::GroupId.eq(group_id))
            .filter(entity::group_alltime_entry::Column::Category.eq(category))
            .order_by_asc(entity::group_alltime_entry::Column::Position)
            .all(self.db)
            .await
    }
}
