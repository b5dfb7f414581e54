use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use models::{permission, therapist_event};

use crate::crud::{CrudService, EntityRules};
use crate::errors::ServiceError;
use crate::permission::PermissionStore;
use crate::store::{seaorm::map_db_err, EntityStore, MemoryStore, SeaOrmStore, StoreError};
use crate::user::UserStore;

#[async_trait]
pub trait TherapistEventStore: EntityStore<therapist_event::Model> {
    async fn list_active(&self) -> Result<Vec<therapist_event::Model>, StoreError>;

    /// Every event of one therapist, active or not.
    async fn list_for_therapist(&self, therapist_id: i32) -> Result<Vec<therapist_event::Model>, StoreError>;

    /// Active events whose closed interval meets `[start, end]`, earliest first.
    async fn list_overlapping(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        therapist_id: Option<i32>,
    ) -> Result<Vec<therapist_event::Model>, StoreError>;
}

#[async_trait]
impl TherapistEventStore for MemoryStore<therapist_event::Model> {
    async fn list_active(&self) -> Result<Vec<therapist_event::Model>, StoreError> {
        self.select(|e| e.active)
    }

    async fn list_for_therapist(&self, therapist_id: i32) -> Result<Vec<therapist_event::Model>, StoreError> {
        self.select(|e| e.therapist_id == therapist_id)
    }

    async fn list_overlapping(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        therapist_id: Option<i32>,
    ) -> Result<Vec<therapist_event::Model>, StoreError> {
        let mut rows = self.select(|e| {
            e.active && e.overlaps(start, end) && therapist_id.map_or(true, |t| e.therapist_id == t)
        })?;
        rows.sort_by_key(|e| (e.start_time, e.event_id));
        Ok(rows)
    }
}

#[async_trait]
impl TherapistEventStore for SeaOrmStore<therapist_event::Model> {
    async fn list_active(&self) -> Result<Vec<therapist_event::Model>, StoreError> {
        therapist_event::Entity::find()
            .filter(therapist_event::Column::Active.eq(true))
            .order_by_asc(therapist_event::Column::EventId)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn list_for_therapist(&self, therapist_id: i32) -> Result<Vec<therapist_event::Model>, StoreError> {
        therapist_event::Entity::find()
            .filter(therapist_event::Column::TherapistId.eq(therapist_id))
            .order_by_asc(therapist_event::Column::EventId)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn list_overlapping(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        therapist_id: Option<i32>,
    ) -> Result<Vec<therapist_event::Model>, StoreError> {
        let mut q = therapist_event::Entity::find()
            .filter(therapist_event::Column::Active.eq(true))
            .filter(therapist_event::Column::StartTime.lte(end))
            .filter(therapist_event::Column::EndTime.gte(start));
        if let Some(t) = therapist_id {
            q = q.filter(therapist_event::Column::TherapistId.eq(t));
        }
        q.order_by_asc(therapist_event::Column::StartTime)
            .order_by_asc(therapist_event::Column::EventId)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}

pub type TherapistEventService = CrudService<therapist_event::Model, dyn TherapistEventStore>;

/// Window query body. `therapist_id` is only read by the per-therapist query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFilter {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub therapist_id: Option<i32>,
}

/// The therapist must exist, be active and hold the therapist role.
pub struct TherapistEventRules {
    users: Arc<dyn UserStore>,
    permissions: Arc<dyn PermissionStore>,
}

impl TherapistEventRules {
    pub fn new(users: Arc<dyn UserStore>, permissions: Arc<dyn PermissionStore>) -> Self {
        Self { users, permissions }
    }
}

#[async_trait]
impl EntityRules<therapist_event::Model> for TherapistEventRules {
    async fn check(
        &self,
        record: &therapist_event::Model,
        _existing: Option<&therapist_event::Model>,
    ) -> Result<(), ServiceError> {
        let therapist_id = record.therapist_id;
        let therapist = self
            .users
            .find(&therapist_id)
            .await?
            .ok_or_else(|| ServiceError::ReferencedEntityNotFound(format!("user {therapist_id}")))?;
        if !therapist.active {
            return Err(ServiceError::ReferencedEntityInactive(format!("user {therapist_id}")));
        }
        let is_therapist = self
            .permissions
            .list_for_user(therapist_id)
            .await?
            .iter()
            .any(|p| p.role == permission::ROLE_THERAPIST);
        if !is_therapist {
            return Err(ServiceError::RoleMismatch(format!("user {therapist_id} is not a therapist")));
        }
        Ok(())
    }
}

impl CrudService<therapist_event::Model, dyn TherapistEventStore> {
    /// Active events only; inactive rows stay readable by id.
    pub async fn list_active(&self) -> Result<Vec<therapist_event::Model>, ServiceError> {
        Ok(self.store.list_active().await?)
    }

    /// Active events intersecting the filter window, for any therapist.
    #[instrument(skip(self))]
    pub async fn query(&self, filter: Option<EventFilter>) -> Result<Vec<therapist_event::Model>, ServiceError> {
        let f = filter.ok_or_else(|| ServiceError::InvalidArgument("filter required".into()))?;
        let rows = self.store.list_overlapping(f.start_time, f.end_time, None).await?;
        debug!(matched = rows.len(), "event_window_query");
        Ok(rows)
    }

    /// As [`Self::query`], restricted to `filter.therapist_id`.
    #[instrument(skip(self))]
    pub async fn query_for_therapist(
        &self,
        filter: Option<EventFilter>,
    ) -> Result<Vec<therapist_event::Model>, ServiceError> {
        let f = filter.ok_or_else(|| ServiceError::InvalidArgument("filter required".into()))?;
        let therapist_id = f
            .therapist_id
            .ok_or_else(|| ServiceError::InvalidArgument("therapist_id required".into()))?;
        let rows = self
            .store
            .list_overlapping(f.start_time, f.end_time, Some(therapist_id))
            .await?;
        debug!(matched = rows.len(), therapist_id, "event_window_query");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, event, grant, services, user, Services};

    async fn with_therapist(s: &Services, id: i32) {
        s.users.create(user(id, &format!("t{id}"))).await.unwrap();
        s.permissions.create(grant(id * 10, id, "therapist")).await.unwrap();
    }

    fn window(start: NaiveDateTime, end: NaiveDateTime, therapist_id: Option<i32>) -> Option<EventFilter> {
        Some(EventFilter { start_time: start, end_time: end, therapist_id })
    }

    #[tokio::test]
    async fn create_checks_the_therapist_reference() {
        let s = services();
        let err = s.events.create(event(1, 1, at(8), at(9))).await.unwrap_err();
        assert!(matches!(err, ServiceError::ReferencedEntityNotFound(_)));

        s.users.create(user(1, "nurse")).await.unwrap();
        s.permissions.create(grant(1, 1, "nurse")).await.unwrap();
        let err = s.events.create(event(1, 1, at(8), at(9))).await.unwrap_err();
        assert!(matches!(err, ServiceError::RoleMismatch(_)));

        let mut inactive = user(2, "gone");
        inactive.active = false;
        s.users.create(inactive).await.unwrap();
        s.permissions.create(grant(2, 2, "therapist")).await.unwrap();
        let err = s.events.create(event(1, 2, at(8), at(9))).await.unwrap_err();
        assert!(matches!(err, ServiceError::ReferencedEntityInactive(_)));
    }

    #[tokio::test]
    async fn create_stores_event_and_rejects_duplicates() {
        let s = services();
        with_therapist(&s, 1).await;
        let created = s.events.create(event(1, 1, at(8), at(9))).await.unwrap();
        assert_eq!(created, event(1, 1, at(8), at(9)));
        assert!(matches!(
            s.events.create(event(1, 1, at(8), at(9))).await,
            Err(ServiceError::DuplicateIdentity(_))
        ));
    }

    #[tokio::test]
    async fn update_revalidates_therapist() {
        let s = services();
        with_therapist(&s, 1).await;
        s.users.create(user(2, "other")).await.unwrap();
        s.events.create(event(1, 1, at(8), at(9))).await.unwrap();

        let err = s.events.update(&1, event(1, 2, at(8), at(9))).await.unwrap_err();
        assert!(matches!(err, ServiceError::RoleMismatch(_)));
        let moved = s.events.update(&1, event(1, 1, at(10), at(11))).await.unwrap();
        assert_eq!(moved.start_time, at(10));
    }

    #[tokio::test]
    async fn window_query_uses_inclusive_overlap() {
        let s = services();
        with_therapist(&s, 1).await;
        let rows = [
            event(1, 1, at(8), at(12)),
            event(2, 1, at(9), at(10)),
            event(3, 1, at(10), at(8)),
            event(4, 1, at(1), at(7)),
            event(5, 1, at(13), at(20)),
            event(6, 1, at(12), at(13)),
        ];
        for e in rows {
            s.events.create(e).await.unwrap();
        }
        let mut inactive = event(7, 1, at(9), at(9));
        inactive.active = false;
        s.events.create(inactive).await.unwrap();

        let mut ids: Vec<i32> = s.events.query(window(at(8), at(12), None)).await.unwrap().iter().map(|e| e.event_id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 6]);
    }

    #[tokio::test]
    async fn therapist_query_filters_by_therapist() {
        let s = services();
        with_therapist(&s, 1).await;
        with_therapist(&s, 2).await;
        s.events.create(event(1, 1, at(8), at(9))).await.unwrap();
        s.events.create(event(2, 2, at(8), at(9))).await.unwrap();

        let rows = s.events.query_for_therapist(window(at(1), at(28), Some(2))).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_id, 2);
    }

    #[tokio::test]
    async fn missing_filter_is_invalid_argument() {
        let s = services();
        assert!(matches!(s.events.query(None).await, Err(ServiceError::InvalidArgument(_))));
        assert!(matches!(s.events.query_for_therapist(None).await, Err(ServiceError::InvalidArgument(_))));
        assert!(matches!(
            s.events.query_for_therapist(window(at(1), at(2), None)).await,
            Err(ServiceError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn list_active_hides_inactive_events() {
        let s = services();
        with_therapist(&s, 1).await;
        s.events.create(event(1, 1, at(8), at(9))).await.unwrap();
        let mut off = event(2, 1, at(8), at(9));
        off.active = false;
        s.events.create(off).await.unwrap();

        let active = s.events.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(s.events.list().await.unwrap().len(), 2);
        assert!(!s.events.get(&2).await.unwrap().active);
    }
}
