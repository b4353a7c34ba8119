use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260512_000002_chorus_member::ChorusMember;

static IDX_MEMBER_WEEK_SNAPSHOT_MEMBER_ID_WEEK_START: &str =
    "idx-member_week_snapshot-member_id-week_start";
static FK_MEMBER_WEEK_SNAPSHOT_MEMBER_ID: &str = "fk-member_week_snapshot-member_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MemberWeekSnapshot::Table)
                    .if_not_exists()
                    .col(pk_auto(MemberWeekSnapshot::Id))
                    .col(integer(MemberWeekSnapshot::MemberId))
                    .col(timestamp(MemberWeekSnapshot::WeekStart))
                    .col(timestamp(MemberWeekSnapshot::FetchedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MEMBER_WEEK_SNAPSHOT_MEMBER_ID_WEEK_START)
                    .table(MemberWeekSnapshot::Table)
                    .col(MemberWeekSnapshot::MemberId)
                    .col(MemberWeekSnapshot::WeekStart)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_MEMBER_WEEK_SNAPSHOT_MEMBER_ID)
                    .from_tbl(MemberWeekSnapshot::Table)
                    .from_col(MemberWeekSnapshot::MemberId)
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
                    .name(FK_MEMBER_WEEK_SNAPSHOT_MEMBER_ID)
                    .table(MemberWeekSnapshot::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MEMBER_WEEK_SNAPSHOT_MEMBER_ID_WEEK_START)
                    .table(MemberWeekSnapshot::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MemberWeekSnapshot::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum MemberWeekSnapshot {
    Table,
    Id,
    MemberId,
    WeekStart,
    FetchedAt,
}
