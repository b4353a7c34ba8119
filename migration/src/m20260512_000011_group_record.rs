use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260512_000001_chorus_group::ChorusGroup;

static IDX_GROUP_RECORD_UNIQUE: &str = "idx-group_record-group_id-category-record_kind";
static FK_GROUP_RECORD_GROUP_ID: &str = "fk-group_record-group_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupRecord::Id))
                    .col(integer(GroupRecord::GroupId))
                    .col(string_len(GroupRecord::Category, 16))
                    .col(string_len(GroupRecord::RecordKind, 24))
                    .col(text(GroupRecord::EntryKey))
                    .col(text(GroupRecord::Name))
                    .col(text_null(GroupRecord::Artist))
                    .col(big_integer(GroupRecord::Value))
                    .col(timestamp_null(GroupRecord::WeekStart))
                    .col(timestamp(GroupRecord::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_GROUP_RECORD_UNIQUE)
                    .table(GroupRecord::Table)
                    .col(GroupRecord::GroupId)
                    .col(GroupRecord::Category)
                    .col(GroupRecord::RecordKind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_GROUP_RECORD_GROUP_ID)
                    .from_tbl(GroupRecord::Table)
                    .from_col(GroupRecord::GroupId)
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
                    .name(FK_GROUP_RECORD_GROUP_ID)
                    .table(GroupRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GROUP_RECORD_UNIQUE)
                    .table(GroupRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GroupRecord::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum GroupRecord {
    Table,
    Id,
    GroupId,
    Category,
    RecordKind,
    EntryKey,
    Name,
    Artist,
    Value,
    WeekStart,
    UpdatedAt,
}
