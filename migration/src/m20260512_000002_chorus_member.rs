use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260512_000001_chorus_group::ChorusGroup;

static IDX_CHORUS_MEMBER_GROUP_ID_USERNAME: &str = "idx-chorus_member-group_id-username";
static FK_CHORUS_MEMBER_GROUP_ID: &str = "fk-chorus_member-group_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChorusMember::Table)
                    .if_not_exists()
                    .col(pk_auto(ChorusMember::Id))
                    .col(integer(ChorusMember::GroupId))
                    .col(big_integer(ChorusMember::UserId))
                    .col(text(ChorusMember::Username))
                    .col(text_null(ChorusMember::SessionKey))
                    .col(timestamp(ChorusMember::JoinedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CHORUS_MEMBER_GROUP_ID_USERNAME)
                    .table(ChorusMember::Table)
                    .col(ChorusMember::GroupId)
                    .col(ChorusMember::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CHORUS_MEMBER_GROUP_ID)
                    .from_tbl(ChorusMember::Table)
                    .from_col(ChorusMember::GroupId)
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
                    .name(FK_CHORUS_MEMBER_GROUP_ID)
                    .table(ChorusMember::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CHORUS_MEMBER_GROUP_ID_USERNAME)
                    .table(ChorusMember::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ChorusMember::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ChorusMember {
    Table,
    Id,
    GroupId,
    UserId,
    Username,
    SessionKey,
    JoinedAt,
}
