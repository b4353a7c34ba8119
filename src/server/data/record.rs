use chrono::NaiveDateTime;
use entity::types::{ChartCategory, RecordKind};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

/// One freshly computed record holder, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Chart category the record belongs to
    pub category: ChartCategory,
    /// Which record this row holds
    pub record_kind: RecordKind,
    /// Normalized entry key of the holder
    pub entry_key: String,
    /// Display name of the holder
    pub name: String,
    /// Credited artist for tracks and albums
    pub artist: Option<String>,
    /// Record measurement, weeks or plays depending on the kind
    pub value: i64,
    /// Week the record was set, where that applies
    pub week_start: Option<NaiveDateTime>,
}

/// Repository for a group's best-ever records.
///
/// Records are derived entirely from entry history and chart rows, so the
/// recalculation task replaces the whole set instead of patching individual
/// holders.
pub struct RecordRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RecordRepository<'a, C> {
    /// Creates a new instance of [`RecordRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Replaces a group's stored records with freshly computed holders
    pub async fn replace_all(
        &self,
        group_id: i32,
        records: &[NewRecord],
        now: NaiveDateTime,
    ) -> Result<(), DbErr> {
        entity::prelude::GroupRecord::delete_many()
            .filter(entity::group_record::Column::GroupId.eq(group_id))
            .exec(self.db)
            .await?;

        if records.is_empty() {
            return Ok(());
        }

        let rows = records
            .iter()
            .map(|record| entity::group_record::ActiveModel {
                group_id: ActiveValue::Set(group_id),
                category: ActiveValue::Set(record.category),
                record_kind: ActiveValue::Set(record.record_kind),
                entry_key: ActiveValue::Set(record.entry_key.clone()),
                name: ActiveValue::Set(record.name.clone()),
                artist: ActiveValue::Set(record.artist.clone()),
                value: ActiveValue::Set(record.value),
                week_start: ActiveValue::Set(record.week_start),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            });

        entity::prelude::GroupRecord::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Gets every stored record of a group
    pub async fn get_by_group(
        &self,
        group_id: i32,
    ) -> Result<Vec<entity::group_record::Model>, DbErr> {
        entity::prelude::GroupRecord::find()
            .filter(entity::group_record::Column::GroupId.eq(group_id))
            .order_by_asc(entity::group_record::Column::Category)
            .order_by_asc(entity::group_record::Column::RecordKind)
            .all(self.db)
            .await
    }
}
