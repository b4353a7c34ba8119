use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChorusGroup::Table)
                    .if_not_exists()
                    .col(pk_auto(ChorusGroup::Id))
                    .col(text(ChorusGroup::Name))
                    .col(integer(ChorusGroup::TrackingDayOfWeek))
                    .col(integer(ChorusGroup::ChartSize))
                    .col(string_len(ChorusGroup::ChartMode, 16))
                    .col(text_null(ChorusGroup::IconSource))
                    .col(timestamp_null(ChorusGroup::IconUpdatedAt))
                    .col(timestamp(ChorusGroup::CreatedAt))
                    .col(timestamp(ChorusGroup::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChorusGroup::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ChorusGroup {
    Table,
    Id,
    Name,
    TrackingDayOfWeek,
    ChartSize,
    ChartMode,
    IconSource,
    IconUpdatedAt,
    CreatedAt,
    UpdatedAt,
}
