use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Permission: one grant per (user_id, role)
        manager
            .create_index(
                Index::create()
                    .name("uniq_permission_user_role")
                    .table(Permission::Table)
                    .col(Permission::UserId)
                    .col(Permission::Role)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // TherapistEvent: lookups by therapist and by window
        manager
            .create_index(
                Index::create()
                    .name("idx_therapist_event_therapist")
                    .table(TherapistEvent::Table)
                    .col(TherapistEvent::TherapistId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_therapist_event_window")
                    .table(TherapistEvent::Table)
                    .col(TherapistEvent::StartTime)
                    .col(TherapistEvent::EndTime)
                    .to_owned(),
            )
            .await?;

        // HoursWorked: index on user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_hours_worked_user")
                    .table(HoursWorked::Table)
                    .col(HoursWorked::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_permission_user_role").table(Permission::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_therapist_event_therapist").table(TherapistEvent::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_therapist_event_window").table(TherapistEvent::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_hours_worked_user").table(HoursWorked::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Permission { Table, UserId, Role }

#[derive(DeriveIden)]
enum TherapistEvent { Table, TherapistId, StartTime, EndTime }

#[derive(DeriveIden)]
enum HoursWorked { Table, UserId }
