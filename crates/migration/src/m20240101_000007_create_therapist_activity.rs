//! Create `therapist_activity` table, keyed by the activity name.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TherapistActivity::Table)
                    .if_not_exists()
                    .col(string_len(TherapistActivity::ActivityName, 128).primary_key())
                    .col(boolean(TherapistActivity::IsProductive).default(false))
                    .col(integer(TherapistActivity::RowVersion).default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TherapistActivity::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TherapistActivity { Table, ActivityName, IsProductive, RowVersion }
