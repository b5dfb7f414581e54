//! Create `patient` table. `patient_id` is the hospital-issued PID.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patient::Table)
                    .if_not_exists()
                    .col(integer(Patient::PatientId).primary_key())
                    .col(string_len(Patient::FirstName, 128))
                    .col(string_len(Patient::LastName, 128))
                    .col(string_len_null(Patient::RoomNumber, 32))
                    .col(boolean(Patient::Active).default(true))
                    .col(integer(Patient::RowVersion).default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Patient::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Patient { Table, PatientId, FirstName, LastName, RoomNumber, Active, RowVersion }
