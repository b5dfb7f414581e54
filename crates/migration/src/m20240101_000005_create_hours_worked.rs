//! Create `hours_worked` table with FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HoursWorked::Table)
                    .if_not_exists()
                    .col(integer(HoursWorked::HoursWorkedId).primary_key())
                    .col(integer(HoursWorked::UserId))
                    .col(date_time(HoursWorked::StartTime))
                    .col(date_time(HoursWorked::EndTime))
                    .col(integer(HoursWorked::RowVersion).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hours_worked_user")
                            .from(HoursWorked::Table, HoursWorked::UserId)
                            .to(User::Table, User::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(HoursWorked::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum HoursWorked { Table, HoursWorkedId, UserId, StartTime, EndTime, RowVersion }

#[derive(DeriveIden)]
enum User { Table, UserId }
