use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;

use models::{hours_worked, user};

use crate::crud::{CrudService, EntityRules};
use crate::errors::ServiceError;
use crate::store::{seaorm::map_db_err, EntityStore, MemoryStore, SeaOrmStore, StoreError};
use crate::user::{UserService, UserStore};

#[async_trait]
pub trait HoursWorkedStore: EntityStore<hours_worked::Model> {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<hours_worked::Model>, StoreError>;
}

#[async_trait]
impl HoursWorkedStore for MemoryStore<hours_worked::Model> {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<hours_worked::Model>, StoreError> {
        self.select(|h| h.user_id == user_id)
    }
}

#[async_trait]
impl HoursWorkedStore for SeaOrmStore<hours_worked::Model> {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<hours_worked::Model>, StoreError> {
        hours_worked::Entity::find()
            .filter(hours_worked::Column::UserId.eq(user_id))
            .order_by_asc(hours_worked::Column::HoursWorkedId)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}

pub type HoursWorkedService = CrudService<hours_worked::Model, dyn HoursWorkedStore>;

pub struct HoursWorkedRules {
    users: Arc<dyn UserStore>,
}

impl HoursWorkedRules {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl EntityRules<hours_worked::Model> for HoursWorkedRules {
    async fn check(&self, record: &hours_worked::Model, _existing: Option<&hours_worked::Model>) -> Result<(), ServiceError> {
        if self.users.find(&record.user_id).await?.is_none() {
            return Err(ServiceError::ReferencedEntityNotFound(format!("user {}", record.user_id)));
        }
        Ok(())
    }
}

impl CrudService<hours_worked::Model, dyn HoursWorkedStore> {
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<hours_worked::Model>, ServiceError> {
        Ok(self.store.list_for_user(user_id).await?)
    }

    /// The user a time entry belongs to.
    #[instrument(skip(self, users))]
    pub async fn user_for(&self, hours_worked_id: i32, users: &UserService) -> Result<user::Model, ServiceError> {
        let entry = self.get(&hours_worked_id).await?;
        users.get(&entry.user_id).await
    }
}
