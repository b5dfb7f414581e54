use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;

use models::permission;

use crate::crud::{CrudService, EntityRules};
use crate::errors::ServiceError;
use crate::store::{seaorm::map_db_err, EntityStore, MemoryStore, SeaOrmStore, StoreError};
use crate::user::UserStore;

#[async_trait]
pub trait PermissionStore: EntityStore<permission::Model> {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<permission::Model>, StoreError>;
}

#[async_trait]
impl PermissionStore for MemoryStore<permission::Model> {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<permission::Model>, StoreError> {
        self.select(|p| p.user_id == user_id)
    }
}

#[async_trait]
impl PermissionStore for SeaOrmStore<permission::Model> {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<permission::Model>, StoreError> {
        permission::Entity::find()
            .filter(permission::Column::UserId.eq(user_id))
            .order_by_asc(permission::Column::PermissionId)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}

pub type PermissionService = CrudService<permission::Model, dyn PermissionStore>;

pub struct PermissionRules {
    users: Arc<dyn UserStore>,
    permissions: Arc<dyn PermissionStore>,
}

impl PermissionRules {
    pub fn new(users: Arc<dyn UserStore>, permissions: Arc<dyn PermissionStore>) -> Self {
        Self { users, permissions }
    }
}

#[async_trait]
impl EntityRules<permission::Model> for PermissionRules {
    async fn check(&self, record: &permission::Model, _existing: Option<&permission::Model>) -> Result<(), ServiceError> {
        permission::validate_role(&record.role)?;
        if self.users.find(&record.user_id).await?.is_none() {
            return Err(ServiceError::ReferencedEntityNotFound(format!("user {}", record.user_id)));
        }
        let granted = self.permissions.list_for_user(record.user_id).await?;
        if granted
            .iter()
            .any(|p| p.role == record.role && p.permission_id != record.permission_id)
        {
            return Err(ServiceError::DuplicateIdentity(format!(
                "role {} for user {}",
                record.role, record.user_id
            )));
        }
        Ok(())
    }
}

impl CrudService<permission::Model, dyn PermissionStore> {
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<permission::Model>, ServiceError> {
        Ok(self.store.list_for_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{grant, services, user};

    #[tokio::test]
    async fn grant_requires_known_role_and_existing_user() {
        let s = services();
        assert!(matches!(
            s.permissions.create(grant(1, 1, "therapist")).await,
            Err(ServiceError::ReferencedEntityNotFound(_))
        ));
        s.users.create(user(1, "ada")).await.unwrap();
        assert!(matches!(
            s.permissions.create(grant(1, 1, "surgeon")).await,
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(s.permissions.create(grant(1, 1, "therapist")).await.is_ok());
    }

    #[tokio::test]
    async fn same_role_twice_is_duplicate() {
        let s = services();
        s.users.create(user(1, "ada")).await.unwrap();
        s.permissions.create(grant(1, 1, "nurse")).await.unwrap();
        let err = s.permissions.create(grant(2, 1, "nurse")).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateIdentity(_)));
        // re-saving the same grant is fine
        assert!(s.permissions.update(&1, grant(1, 1, "nurse")).await.is_ok());
    }

    #[tokio::test]
    async fn list_for_user_filters_by_owner() {
        let s = services();
        s.users.create(user(1, "ada")).await.unwrap();
        s.users.create(user(2, "grace")).await.unwrap();
        s.permissions.create(grant(1, 1, "nurse")).await.unwrap();
        s.permissions.create(grant(2, 2, "admin")).await.unwrap();
        s.permissions.create(grant(3, 1, "admin")).await.unwrap();

        let ids: Vec<i32> = s.permissions.list_for_user(1).await.unwrap().iter().map(|p| p.permission_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(s.permissions.list_for_user(9).await.unwrap().is_empty());
    }
}
