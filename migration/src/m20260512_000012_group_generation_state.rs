use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260512_000001_chorus_group::ChorusGroup;

static FK_GROUP_GENERATION_STATE_GROUP_ID: &str = "fk-group_generation_state-group_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupGenerationState::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupGenerationState::Id))
                    .col(integer_uniq(GroupGenerationState::GroupId))
                    .col(boolean(GroupGenerationState::InProgress))
                    .col(text_null(GroupGenerationState::OwnerToken))
                    .col(timestamp_null(GroupGenerationState::LeaseExpiresAt))
                    .col(timestamp_null(GroupGenerationState::StartedAt))
                    .col(integer(GroupGenerationState::CurrentWeek))
                    .col(integer(GroupGenerationState::TotalWeeks))
                    .col(string_len_null(GroupGenerationState::Stage, 16))
                    .col(json(GroupGenerationState::FailedMembers))
                    .col(boolean(GroupGenerationState::LastRunAborted))
                    .col(timestamp(GroupGenerationState::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_GROUP_GENERATION_STATE_GROUP_ID)
                    .from_tbl(GroupGenerationState::Table)
                    .from_col(GroupGenerationState::GroupId)
                    .to_tbl(ChorusGroup::Table)
                    .to_col(ChorusGroup::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_GROUP_GENERATION_STATE_GROUP_ID)
                    .table(GroupGenerationState::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GroupGenerationState::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum GroupGenerationState {
    Table,
    Id,
    GroupId,
    InProgress,
    OwnerToken,
    LeaseExpiresAt,
    StartedAt,
    CurrentWeek,
    TotalWeeks,
    Stage,
    FailedMembers,
    LastRunAborted,
    UpdatedAt,
}
