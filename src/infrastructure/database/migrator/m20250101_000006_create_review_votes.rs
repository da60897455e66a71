//! Create review_votes table
//!
//! One row per (review, user); the unique index keeps the helpful toggle
//! idempotent per user.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;
use super::m20250101_000005_create_reviews::Reviews;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReviewVotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewVotes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewVotes::ReviewId).string().not_null())
                    .col(ColumnDef::new(ReviewVotes::UserId).string().not_null())
                    .col(
                        ColumnDef::new(ReviewVotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_votes_review")
                            .from(ReviewVotes::Table, ReviewVotes::ReviewId)
                            .to(Reviews::Table, Reviews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_votes_user")
                            .from(ReviewVotes::Table, ReviewVotes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_review_votes_unique")
                    .table(ReviewVotes::Table)
                    .col(ReviewVotes::ReviewId)
                    .col(ReviewVotes::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewVotes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ReviewVotes {
    Table,
    Id,
    ReviewId,
    UserId,
    CreatedAt,
}
