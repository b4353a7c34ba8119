use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260512_000002_chorus_member::ChorusMember;

static IDX_MEMBER_WEEK_SCORE_UNIQUE: &str =
    "idx-member_week_score-member_id-week_start-category-entry_key";
static FK_MEMBER_WEEK_SCORE_MEMBER_ID: &str = "fk-member_week_score-member_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MemberWeekScore::Table)
                    .if_not_exists()
                    .col(pk_auto(MemberWeekScore::Id))
                    .col(integer(MemberWeekScore::MemberId))
                    .col(timestamp(MemberWeekScore::WeekStart))
                    .col(string_len(MemberWeekScore::Category, 16))
                    .col(text(MemberWeekScore::EntryKey))
                    .col(double(MemberWeekScore::Score))
                    .col(big_integer(MemberWeekScore::Playcount))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MEMBER_WEEK_SCORE_UNIQUE)
                    .table(MemberWeekScore::Table)
                    .col(MemberWeekScore::MemberId)
                    .col(MemberWeekScore::WeekStart)
                    .col(MemberWeekScore::Category)
                    .col(MemberWeekScore::EntryKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_MEMBER_WEEK_SCORE_MEMBER_ID)
                    .from_tbl(MemberWeekScore::Table)
                    .from_col(MemberWeekScore::MemberId)
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
                    .name(FK_MEMBER_WEEK_SCORE_MEMBER_ID)
                    .table(MemberWeekScore::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MEMBER_WEEK_SCORE_UNIQUE)
                    .table(MemberWeekScore::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MemberWeekScore::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum MemberWeekScore {
    Table,
    Id,
    MemberId,
    WeekStart,
    Category,
    EntryKey,
    Score,
    Playcount,
}
