//! Create `therapist_event` table with FK to `user` (the therapist).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TherapistEvent::Table)
                    .if_not_exists()
                    .col(integer(TherapistEvent::EventId).primary_key())
                    .col(integer(TherapistEvent::TherapistId))
                    .col(string_len(TherapistEvent::ActivityName, 128))
                    .col(date_time(TherapistEvent::StartTime))
                    .col(date_time(TherapistEvent::EndTime))
                    .col(text_null(TherapistEvent::Notes))
                    .col(boolean(TherapistEvent::Active).default(true))
                    .col(integer(TherapistEvent::RowVersion).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_therapist_event_user")
                            .from(TherapistEvent::Table, TherapistEvent::TherapistId)
                            .to(User::Table, User::UserId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TherapistEvent::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TherapistEvent {
    Table,
    EventId,
    TherapistId,
    ActivityName,
    StartTime,
    EndTime,
    Notes,
    Active,
    RowVersion,
}

#[derive(DeriveIden)]
enum User { Table, UserId }
