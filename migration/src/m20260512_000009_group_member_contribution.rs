use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260512_000001_chorus_group::ChorusGroup, m20260512_000002_chorus_member::ChorusMember,
};

static IDX_GROUP_MEMBER_CONTRIBUTION_GROUP_ID_MEMBER_ID: &str =
    "idx-group_member_contribution-group_id-member_id";
static FK_GROUP_MEMBER_CONTRIBUTION_GROUP_ID: &str = "fk-group_member_contribution-group_id";
static FK_GROUP_MEMBER_CONTRIBUTION_MEMBER_ID: &str = "fk-group_member_contribution-member_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupMemberContribution::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupMemberContribution::Id))
                    .col(integer(GroupMemberContribution::GroupId))
                    .col(integer(GroupMemberContribution::MemberId))
                    .col(double(GroupMemberContribution::TotalScore))
                    .col(big_integer(GroupMemberContribution::TotalPlaycount))
                    .col(integer(GroupMemberContribution::ArtistDebuts))
                    .col(integer(GroupMemberContribution::TrackDebuts))
                    .col(integer(GroupMemberContribution::AlbumDebuts))
                    .col(integer(GroupMemberContribution::ArtistNumberOnes))
                    .col(integer(GroupMemberContribution::TrackNumberOnes))
                    .col(integer(GroupMemberContribution::AlbumNumberOnes))
                    .col(integer(GroupMemberContribution::MvpWeeks))
                    .col(timestamp(GroupMemberContribution::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_GROUP_MEMBER_CONTRIBUTION_GROUP_ID_MEMBER_ID)
                    .table(GroupMemberContribution::Table)
                    .col(GroupMemberContribution::GroupId)
                    .col(GroupMemberContribution::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_GROUP_MEMBER_CONTRIBUTION_GROUP_ID)
                    .from_tbl(GroupMemberContribution::Table)
                    .from_col(GroupMemberContribution::GroupId)
                    .to_tbl(ChorusGroup::Table)
                    .to_col(ChorusGroup::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_GROUP_MEMBER_CONTRIBUTION_MEMBER_ID)
                    .from_tbl(GroupMemberContribution::Table)
                    .from_col(GroupMemberContribution::MemberId)
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
                    .name(FK_GROUP_MEMBER_CONTRIBUTION_MEMBER_ID)
                    .table(GroupMemberContribution::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_GROUP_MEMBER_CONTRIBUTION_GROUP_ID)
                    .table(GroupMemberContribution::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GROUP_MEMBER_CONTRIBUTION_GROUP_ID_MEMBER_ID)
                    .table(GroupMemberContribution::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .table(GroupMemberContribution::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum GroupMemberContribution {
    Table,
    Id,
    GroupId,
    MemberId,
    TotalScore,
    TotalPlaycount,
    ArtistDebuts,
    TrackDebuts,
    AlbumDebuts,
    ArtistNumberOnes,
    TrackNumberOnes,
    AlbumNumberOnes,
    MvpWeeks,
    UpdatedAt,
}
