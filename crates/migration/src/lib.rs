//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user;
mod m20240101_000002_create_permission;
mod m20240101_000003_create_patient;
mod m20240101_000004_create_therapist_event;
mod m20240101_000005_create_hours_worked;
mod m20240101_000006_create_location;
mod m20240101_000007_create_therapist_activity;
mod m20240101_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user::Migration),
            Box::new(m20240101_000002_create_permission::Migration),
            Box::new(m20240101_000003_create_patient::Migration),
            Box::new(m20240101_000004_create_therapist_event::Migration),
            Box::new(m20240101_000005_create_hours_worked::Migration),
            Box::new(m20240101_000006_create_location::Migration),
            Box::new(m20240101_000007_create_therapist_activity::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000008_add_indexes::Migration),
        ]
    }
}
