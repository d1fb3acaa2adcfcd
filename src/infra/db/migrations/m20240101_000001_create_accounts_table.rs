//! Migration: Create the accounts table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Accounts::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Nickname)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Role)
                            .string()
                            .not_null()
                            .default("user"),
                    )
                    .col(ColumnDef::new(Accounts::UserType).string().not_null())
                    .col(ColumnDef::new(Accounts::VerificationToken).string().null())
                    .col(
                        ColumnDef::new(Accounts::EmailVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Admin member search orders by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_created_at")
                    .table(Accounts::Table)
                    .col(Accounts::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_accounts_created_at")
                    .table(Accounts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Email,
    Nickname,
    PasswordHash,
    Role,
    UserType,
    VerificationToken,
    EmailVerified,
    CreatedAt,
    UpdatedAt,
}
