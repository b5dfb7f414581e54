#![cfg(test)]
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::db::{connect_with_config, DATABASE_URL};
use models::{hours_worked, patient as patient_model, permission, therapist_event, user as user_model};

pub use crate::registry::Services;
use crate::store::{EntityStore, MemoryStore, Record, StoreError};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// A migrated connection, or `None` when no database is configured.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let cfg = DatabaseConfig { url: DATABASE_URL.clone(), min_connections: 1, ..DatabaseConfig::default() };
    let migrate_cfg = cfg.clone();
    MIGRATED
        .get_or_try_init(|| async move {
            let db = connect_with_config(&migrate_cfg).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    Ok(Some(connect_with_config(&cfg).await?))
}

pub fn services() -> Services {
    Services::in_memory()
}

pub fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2010, 2, day).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

pub fn user(id: i32, username: &str) -> user_model::Model {
    user_model::Model {
        user_id: id,
        first_name: "First".into(),
        middle_name: None,
        last_name: "Last".into(),
        address: None,
        phone_number: Some("555-0100".into()),
        username: username.into(),
        password: "Passw0rd!".into(),
        active: true,
        row_version: 0,
    }
}

pub fn grant(id: i32, user_id: i32, role: &str) -> permission::Model {
    permission::Model { permission_id: id, user_id, role: role.into(), row_version: 0 }
}

pub fn patient(id: i32) -> patient_model::Model {
    patient_model::Model {
        patient_id: id,
        first_name: "Pat".into(),
        last_name: "Ient".into(),
        room_number: Some("12A".into()),
        active: true,
        row_version: 0,
    }
}

pub fn event(id: i32, therapist_id: i32, start: NaiveDateTime, end: NaiveDateTime) -> therapist_event::Model {
    therapist_event::Model {
        event_id: id,
        therapist_id,
        activity_name: "gait training".into(),
        start_time: start,
        end_time: end,
        notes: None,
        active: true,
        row_version: 0,
    }
}

pub fn hours(id: i32, user_id: i32, start: NaiveDateTime, end: NaiveDateTime) -> hours_worked::Model {
    hours_worked::Model { hours_worked_id: id, user_id, start_time: start, end_time: end, row_version: 0 }
}

/// Memory store where another writer always gets in between a read and the
/// following replace.
pub struct ConflictingStore<T: Record> {
    inner: MemoryStore<T>,
}

impl<T: Record> Default for ConflictingStore<T> {
    fn default() -> Self {
        Self { inner: MemoryStore::new() }
    }
}

#[async_trait]
impl<T: Record> EntityStore<T> for ConflictingStore<T> {
    async fn find(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        self.inner.find(id).await
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.inner.list().await
    }

    async fn add(&self, record: T) -> Result<T, StoreError> {
        self.inner.add(record).await
    }

    async fn replace(&self, record: T, expected_version: i32) -> Result<T, StoreError> {
        // the interleaved writer
        self.inner.replace(record.clone(), expected_version).await?;
        self.inner.replace(record, expected_version).await
    }

    async fn remove(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        self.inner.remove(id).await
    }
}
