use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260512_000001_chorus_group::ChorusGroup;

static IDX_GROUP_ALLTIME_ENTRY_UNIQUE: &str =
    "idx-group_alltime_entry-group_id-category-position";
static FK_GROUP_ALLTIME_ENTRY_GROUP_ID: &str = "fk-group_alltime_entry-group_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupAlltimeEntry::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupAlltimeEntry::Id))
                    .col(integer(GroupAlltimeEntry::GroupId))
                    .col(string_len(GroupAlltimeEntry::Category, 16))
                    .col(integer(GroupAlltimeEntry::Position))
                    .col(text(GroupAlltimeEntry::EntryKey))
                    .col(text(GroupAlltimeEntry::Name))
                    .col(text_null(GroupAlltimeEntry::Artist))
                    .col(double(GroupAlltimeEntry::TotalScore))
                    .col(big_integer(GroupAlltimeEntry::TotalPlaycount))
                    .col(integer(GroupAlltimeEntry::WeeksOnChart))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_GROUP_ALLTIME_ENTRY_UNIQUE)
                    .table(GroupAlltimeEntry::Table)
                    .col(GroupAlltimeEntry::GroupId)
                    .col(GroupAlltimeEntry::Category)
                    .col(GroupAlltimeEntry::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_GROUP_ALLTIME_ENTRY_GROUP_ID)
                    .from_tbl(GroupAlltimeEntry::Table)
                    .from_col(GroupAlltimeEntry::GroupId)
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
                    .name(FK_GROUP_ALLTIME_ENTRY_GROUP_ID)
                    .table(GroupAlltimeEntry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GROUP_ALLTIME_ENTRY_UNIQUE)
                    .table(GroupAlltimeEntry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GroupAlltimeEntry::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum GroupAlltimeEntry {
    Table,
    Id,
    GroupId,
    Category,
    Position,
    EntryKey,
    Name,
    Artist,
    TotalScore,
    TotalPlaycount,
    WeeksOnChart,
}
