use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260512_000001_chorus_group::ChorusGroup;

static IDX_GROUP_WEEK_CHART_GROUP_ID_WEEK_START: &str =
    "idx-group_week_chart-group_id-week_start";
static FK_GROUP_WEEK_CHART_GROUP_ID: &str = "fk-group_week_chart-group_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupWeekChart::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupWeekChart::Id))
                    .col(integer(GroupWeekChart::GroupId))
                    .col(timestamp(GroupWeekChart::WeekStart))
                    .col(timestamp(GroupWeekChart::WeekEnd))
                    .col(timestamp(GroupWeekChart::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_GROUP_WEEK_CHART_GROUP_ID_WEEK_START)
                    .table(GroupWeekChart::Table)
                    .col(GroupWeekChart::GroupId)
                    .col(GroupWeekChart::WeekStart)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_GROUP_WEEK_CHART_GROUP_ID)
                    .from_tbl(GroupWeekChart::Table)
                    .from_col(GroupWeekChart::GroupId)
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
                    .name(FK_GROUP_WEEK_CHART_GROUP_ID)
                    .table(GroupWeekChart::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GROUP_WEEK_CHART_GROUP_ID_WEEK_START)
                    .table(GroupWeekChart::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GroupWeekChart::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum GroupWeekChart {
    Table,
    Id,
    GroupId,
    WeekStart,
    WeekEnd,
    CreatedAt,
}
