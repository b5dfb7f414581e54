//! Create `permission` table with FK to `user`.
//!
//! One row per (user, role) grant; uniqueness of the pair is enforced by an
//! index added in the final migration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Permission::Table)
                    .if_not_exists()
                    .col(integer(Permission::PermissionId).primary_key())
                    .col(integer(Permission::UserId))
                    .col(string_len(Permission::Role, 32))
                    .col(integer(Permission::RowVersion).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permission_user")
                            .from(Permission::Table, Permission::UserId)
                            .to(User::Table, User::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Permission::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Permission { Table, PermissionId, UserId, Role, RowVersion }

#[derive(DeriveIden)]
enum User { Table, UserId }
