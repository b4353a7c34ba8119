use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260512_000001_chorus_group::ChorusGroup, m20260512_000002_chorus_member::ChorusMember,
};

static IDX_GROUP_ENTRY_HISTORY_UNIQUE: &str =
    "idx-group_entry_history-group_id-category-entry_key";
static FK_GROUP_ENTRY_HISTORY_GROUP_ID: &str = "fk-group_entry_history-group_id";
static FK_GROUP_ENTRY_HISTORY_MAJOR_DRIVER_MEMBER_ID: &str =
    "fk-group_entry_history-major_driver_member_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupEntryHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupEntryHistory::Id))
                    .col(integer(GroupEntryHistory::GroupId))
                    .col(string_len(GroupEntryHistory::Category, 16))
                    .col(text(GroupEntryHistory::EntryKey))
                    .col(text(GroupEntryHistory::Name))
                    .col(text_null(GroupEntryHistory::Artist))
                    .col(integer(GroupEntryHistory::WeeksOnChart))
                    .col(integer(GroupEntryHistory::WeeksAtTop))
                    .col(integer(GroupEntryHistory::CurrentStreak))
                    .col(integer(GroupEntryHistory::LongestStreak))
                    .col(timestamp(GroupEntryHistory::FirstWeekStart))
                    .col(timestamp(GroupEntryHistory::LastWeekStart))
                    .col(big_integer(GroupEntryHistory::TotalPlaycount))
                    .col(double(GroupEntryHistory::TotalScore))
                    .col(integer_null(GroupEntryHistory::MajorDriverMemberId))
                    .col(timestamp(GroupEntryHistory::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_GROUP_ENTRY_HISTORY_UNIQUE)
                    .table(GroupEntryHistory::Table)
                    .col(GroupEntryHistory::GroupId)
                    .col(GroupEntryHistory::Category)
                    .col(GroupEntryHistory::EntryKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_GROUP_ENTRY_HISTORY_GROUP_ID)
                    .from_tbl(GroupEntryHistory::Table)
                    .from_col(GroupEntryHistory::GroupId)
                    .to_tbl(ChorusGroup::Table)
                    .to_col(ChorusGroup::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_GROUP_ENTRY_HISTORY_MAJOR_DRIVER_MEMBER_ID)
                    .from_tbl(GroupEntryHistory::Table)
                    .from_col(GroupEntryHistory::MajorDriverMemberId)
                    .to_tbl(ChorusMember::Table)
                    .to_col(ChorusMember::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_GROUP_ENTRY_HISTORY_MAJOR_DRIVER_MEMBER_ID)
                    .table(GroupEntryHistory::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_GROUP_ENTRY_HISTORY_GROUP_ID)
                    .table(GroupEntryHistory::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GROUP_ENTRY_HISTORY_UNIQUE)
                    .table(GroupEntryHistory::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GroupEntryHistory::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum GroupEntryHistory {
    Table,
    Id,
    GroupId,
    Category,
    EntryKey,
    Name,
    Artist,
    WeeksOnChart,
    WeeksAtTop,
    CurrentStreak,
    LongestStreak,
    FirstWeekStart,
    LastWeekStart,
    TotalPlaycount,
    TotalScore,
    MajorDriverMemberId,
    UpdatedAt,
}
