use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260512_000006_group_week_chart::GroupWeekChart;

static IDX_GROUP_WEEK_ENTRY_CHART_ID_CATEGORY_POSITION: &str =
    "idx-group_week_entry-chart_id-category-position";
static FK_GROUP_WEEK_ENTRY_CHART_ID: &str = "fk-group_week_entry-chart_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupWeekEntry::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupWeekEntry::Id))
                    .col(integer(GroupWeekEntry::ChartId))
                    .col(string_len(GroupWeekEntry::Category, 16))
                    .col(integer(GroupWeekEntry::Position))
                    .col(text(GroupWeekEntry::EntryKey))
                    .col(text(GroupWeekEntry::Name))
                    .col(text_null(GroupWeekEntry::Artist))
                    .col(big_integer(GroupWeekEntry::Playcount))
                    .col(double(GroupWeekEntry::Score))
                    .col(integer_null(GroupWeekEntry::Movement))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_GROUP_WEEK_ENTRY_CHART_ID_CATEGORY_POSITION)
                    .table(GroupWeekEntry::Table)
                    .col(GroupWeekEntry::ChartId)
                    .col(GroupWeekEntry::Category)
                    .col(GroupWeekEntry::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_GROUP_WEEK_ENTRY_CHART_ID)
                    .from_tbl(GroupWeekEntry::Table)
                    .from_col(GroupWeekEntry::ChartId)
                    .to_tbl(GroupWeekChart::Table)
                    .to_col(GroupWeekChart::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_GROUP_WEEK_ENTRY_CHART_ID)
                    .table(GroupWeekEntry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GROUP_WEEK_ENTRY_CHART_ID_CATEGORY_POSITION)
                    .table(GroupWeekEntry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GroupWeekEntry::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum GroupWeekEntry {
    Table,
    Id,
    ChartId,
    Category,
    Position,
    EntryKey,
    Name,
    Artist,
    Playcount,
    Score,
    Movement,
}
