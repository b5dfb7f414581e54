use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, SqlErr, Value,
};

use super::{EntityStore, Record, StoreError};

/// Binds a [`Record`] to its SeaORM entity.
pub trait SeaOrmRecord: Record + FromQueryResult {
    type Entity: EntityTrait<Model = Self>;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + From<Self> + Send + 'static;

    fn id_column() -> <Self::Entity as EntityTrait>::Column;
    fn version_column() -> <Self::Entity as EntityTrait>::Column;
    fn id_value(id: &Self::Id) -> Value;
}

/// PostgreSQL-backed store; one instance per entity over a shared pool.
pub struct SeaOrmStore<T> {
    pub(crate) db: DatabaseConnection,
    _rec: PhantomData<fn() -> T>,
}

impl<T> SeaOrmStore<T> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, _rec: PhantomData }
    }
}

pub(crate) fn map_db_err(e: DbErr) -> StoreError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => StoreError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => StoreError::Constraint(msg),
        _ => StoreError::Backend(e.to_string()),
    }
}

fn writable<T: SeaOrmRecord>(record: T) -> T::ActiveModel {
    // every column is written, including ones equal to their previous value
    T::ActiveModel::from(record).reset_all()
}

#[async_trait]
impl<T: SeaOrmRecord> EntityStore<T> for SeaOrmStore<T> {
    async fn find(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        T::Entity::find()
            .filter(T::id_column().eq(T::id_value(id)))
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        T::Entity::find()
            .order_by_asc(T::id_column())
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn add(&self, mut record: T) -> Result<T, StoreError> {
        record.set_row_version(0);
        T::Entity::insert(writable(record.clone()))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(record)
    }

    async fn replace(&self, mut record: T, expected_version: i32) -> Result<T, StoreError> {
        let id = T::id_value(&record.id());
        record.set_row_version(expected_version + 1);
        let res = T::Entity::update_many()
            .set(writable(record.clone()))
            .filter(T::id_column().eq(id))
            .filter(T::version_column().eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if res.rows_affected == 0 {
            return Err(StoreError::Conflict);
        }
        Ok(record)
    }

    async fn remove(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        let Some(existing) = self.find(id).await? else {
            return Ok(None);
        };
        let res = T::Entity::delete_many()
            .filter(T::id_column().eq(T::id_value(id)))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(existing))
    }
}
