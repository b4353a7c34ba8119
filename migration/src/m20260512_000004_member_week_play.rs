use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260512_000003_member_week_snapshot::MemberWeekSnapshot;

static IDX_MEMBER_WEEK_PLAY_SNAPSHOT_ID: &str = "idx-member_week_play-snapshot_id";
static FK_MEMBER_WEEK_PLAY_SNAPSHOT_ID: &str = "fk-member_week_play-snapshot_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MemberWeekPlay::Table)
                    .if_not_exists()
                    .col(pk_auto(MemberWeekPlay::Id))
                    .col(integer(MemberWeekPlay::SnapshotId))
                    .col(string_len(MemberWeekPlay::Category, 16))
                    .col(integer(MemberWeekPlay::Rank))
                    .col(text(MemberWeekPlay::Name))
                    .col(text_null(MemberWeekPlay::Artist))
                    .col(big_integer(MemberWeekPlay::Playcount))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MEMBER_WEEK_PLAY_SNAPSHOT_ID)
                    .table(MemberWeekPlay::Table)
                    .col(MemberWeekPlay::SnapshotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_MEMBER_WEEK_PLAY_SNAPSHOT_ID)
                    .from_tbl(MemberWeekPlay::Table)
                    .from_col(MemberWeekPlay::SnapshotId)
                    .to_tbl(MemberWeekSnapshot::Table)
                    .to_col(MemberWeekSnapshot::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_MEMBER_WEEK_PLAY_SNAPSHOT_ID)
                    .table(MemberWeekPlay::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MEMBER_WEEK_PLAY_SNAPSHOT_ID)
                    .table(MemberWeekPlay::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MemberWeekPlay::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum MemberWeekPlay {
    Table,
    Id,
    SnapshotId,
    Category,
    Rank,
    Name,
    Artist,
    Playcount,
}
