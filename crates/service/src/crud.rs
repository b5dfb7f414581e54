//! The CRUD service shared by every entity.
//!
//! `CrudService<T, S>` owns the uniform contract (identity match, existence,
//! duplicate identity, not-found on missing targets, versioned replace); the
//! per-entity differences are injected as an [`EntityRules`] object and the
//! entity-specific queries are inherent methods on the concrete aliases.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::store::{EntityStore, Record};

/// Entity-specific validation and shaping hooks.
///
/// `existing` is `None` on create and the currently stored row on update.
#[async_trait]
pub trait EntityRules<T: Record>: Send + Sync {
    /// Field and reference checks; runs before the duplicate check on create.
    async fn check(&self, _record: &T, _existing: Option<&T>) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Final transformation of the row about to be written.
    async fn prepare(&self, record: T, _existing: Option<&T>) -> Result<T, ServiceError> {
        Ok(record)
    }

    /// Runs before `existing` is removed; dependent rows are dealt with here.
    async fn before_delete(&self, _existing: &T) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Rules for entities with no constraints beyond identity.
pub struct NoRules;

#[async_trait]
impl<T: Record> EntityRules<T> for NoRules {}

pub struct CrudService<T: Record, S: EntityStore<T> + ?Sized> {
    pub(crate) store: Arc<S>,
    rules: Arc<dyn EntityRules<T>>,
}

impl<T: Record, S: EntityStore<T> + ?Sized> CrudService<T, S> {
    pub fn new(store: Arc<S>, rules: Arc<dyn EntityRules<T>>) -> Self {
        Self { store, rules }
    }

    pub fn without_rules(store: Arc<S>) -> Self {
        Self::new(store, Arc::new(NoRules))
    }

    #[instrument(skip(self), fields(kind = T::KIND))]
    pub async fn list(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.store.list().await?)
    }

    #[instrument(skip(self, id), fields(kind = T::KIND, id = %id))]
    pub async fn get(&self, id: &T::Id) -> Result<T, ServiceError> {
        self.store.find(id).await?.ok_or(ServiceError::not_found(T::KIND))
    }

    /// Persist a new row.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::crud::CrudService;
    /// use service::store::MemoryStore;
    /// use models::location;
    ///
    /// let svc = CrudService::without_rules(Arc::new(MemoryStore::<location::Model>::new()));
    /// let gym = location::Model { location_id: 1, name: "Gym".into(), address: None, row_version: 0 };
    /// let created = tokio_test::block_on(svc.create(gym.clone())).unwrap();
    /// assert_eq!(created, gym);
    /// assert!(tokio_test::block_on(svc.create(gym)).is_err());
    /// ```
    #[instrument(skip(self, record), fields(kind = T::KIND, id = %record.id()))]
    pub async fn create(&self, record: T) -> Result<T, ServiceError> {
        self.rules.check(&record, None).await?;
        let id = record.id();
        if self.store.find(&id).await?.is_some() {
            return Err(ServiceError::DuplicateIdentity(format!("{} {}", T::KIND, id)));
        }
        let record = self.rules.prepare(record, None).await?;
        let created = self.store.add(record).await?;
        info!(kind = T::KIND, id = %id, "entity_created");
        Ok(created)
    }

    /// Full replacement of the row stored under `id`.
    #[instrument(skip(self, id, record), fields(kind = T::KIND, id = %id))]
    pub async fn update(&self, id: &T::Id, record: T) -> Result<T, ServiceError> {
        let body_id = record.id();
        if *id != body_id {
            return Err(ServiceError::IdentityMismatch { path: id.to_string(), body: body_id.to_string() });
        }
        let existing = self.get(id).await?;
        self.rules.check(&record, Some(&existing)).await?;
        let record = self.rules.prepare(record, Some(&existing)).await?;
        match self.store.replace(record, existing.row_version()).await {
            Ok(updated) => {
                info!(kind = T::KIND, id = %id, row_version = updated.row_version(), "entity_updated");
                Ok(updated)
            }
            Err(e) => {
                warn!(kind = T::KIND, id = %id, error = %e, "entity_update_failed");
                Err(e.into())
            }
        }
    }

    /// Remove the row and return its last snapshot.
    #[instrument(skip(self, id), fields(kind = T::KIND, id = %id))]
    pub async fn delete(&self, id: &T::Id) -> Result<T, ServiceError> {
        let existing = self.get(id).await?;
        self.rules.before_delete(&existing).await?;
        let removed = self
            .store
            .remove(id)
            .await?
            .ok_or_else(|| ServiceError::ConcurrencyConflict(format!("{} {} removed concurrently", T::KIND, id)))?;
        info!(kind = T::KIND, id = %id, "entity_deleted");
        Ok(removed)
    }
}
