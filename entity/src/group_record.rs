use sea_orm::entity::prelude::*;

use crate::types::{ChartCategory, RecordKind};

/// Best-ever holder for one record kind within one (group, category) pair.
///
/// `value` is the record measurement (weeks or plays depending on the kind)
/// and `week_start` marks the week the record was set where that applies.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "group_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: i32,
    pub category: ChartCategory,
    pub record_kind: RecordKind,
    #[sea_orm(column_type = "Text")]
    pub entry_key: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub artist: Option<String>,
    pub value: i64,
    pub week_start: Option<DateTime>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chorus_group::Entity",
        from = "Column::GroupId",
        to = "super::chorus_group::Column::Id"
    )]
    ChorusGroup,
}

impl Related<super::chorus_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChorusGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
