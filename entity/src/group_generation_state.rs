use sea_orm::entity::prelude::*;

use crate::types::GenerationStage;

/// Persisted generation lease and progress for one group.
///
/// A run holds the lease while `in_progress` is true, `owner_token` matches
/// its own token, and `lease_expires_at` lies in the future. Any process may
/// reclaim a row whose lease has expired. Progress fields are advisory and
/// only meaningful while a run is in progress; `failed_members` is a JSON
/// array of member usernames that failed every retry during the current run.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "group_generation_state")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub group_id: i32,
    pub in_progress: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub owner_token: Option<String>,
    pub lease_expires_at: Option<DateTime>,
    pub started_at: Option<DateTime>,
    pub current_week: i32,
    pub total_weeks: i32,
    pub stage: Option<GenerationStage>,
    pub failed_members: Json,
    pub last_run_aborted: bool,
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
