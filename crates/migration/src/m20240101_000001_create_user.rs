//! Create `user` table.
//!
//! Staff accounts (therapists, nurses, admins). `username` is unique across
//! active and inactive rows; `password` holds an argon2 PHC string.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(integer(User::UserId).primary_key())
                    .col(string_len(User::FirstName, 128))
                    .col(string_len_null(User::MiddleName, 128))
                    .col(string_len(User::LastName, 128))
                    .col(string_null(User::Address))
                    .col(string_len_null(User::PhoneNumber, 32))
                    .col(string_len(User::Username, 128).unique_key())
                    .col(string_len(User::Password, 255))
                    .col(boolean(User::Active).default(true))
                    .col(integer(User::RowVersion).default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    UserId,
    FirstName,
    MiddleName,
    LastName,
    Address,
    PhoneNumber,
    Username,
    Password,
    Active,
    RowVersion,
}
