use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use models::user;

use crate::crud::{CrudService, EntityRules};
use crate::errors::ServiceError;
use crate::hours_worked::HoursWorkedStore;
use crate::password;
use crate::permission::PermissionStore;
use crate::store::{seaorm::map_db_err, EntityStore, MemoryStore, SeaOrmStore, StoreError};
use crate::therapist_event::TherapistEventStore;

#[async_trait]
pub trait UserStore: EntityStore<user::Model> {
    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, StoreError>;
}

#[async_trait]
impl UserStore for MemoryStore<user::Model> {
    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, StoreError> {
        Ok(self.select(|u| u.username == username)?.into_iter().next())
    }
}

#[async_trait]
impl UserStore for SeaOrmStore<user::Model> {
    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, StoreError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }
}

pub type UserService = CrudService<user::Model, dyn UserStore>;

/// Login input. Deliberately not `Debug` so the password cannot end up in logs.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Username uniqueness, password hashing and removal of dependent rows.
///
/// Deleting a user takes their permissions and hours with them, and is refused
/// while any therapist event still names them.
pub struct UserRules {
    users: Arc<dyn UserStore>,
    permissions: Arc<dyn PermissionStore>,
    hours_worked: Arc<dyn HoursWorkedStore>,
    events: Arc<dyn TherapistEventStore>,
}

impl UserRules {
    pub fn new(
        users: Arc<dyn UserStore>,
        permissions: Arc<dyn PermissionStore>,
        hours_worked: Arc<dyn HoursWorkedStore>,
        events: Arc<dyn TherapistEventStore>,
    ) -> Self {
        Self { users, permissions, hours_worked, events }
    }
}

#[async_trait]
impl EntityRules<user::Model> for UserRules {
    async fn check(&self, record: &user::Model, existing: Option<&user::Model>) -> Result<(), ServiceError> {
        user::validate_username(&record.username)?;
        if existing.is_none() && record.password.is_empty() {
            return Err(ServiceError::InvalidArgument("password required".into()));
        }
        if let Some(holder) = self.users.find_by_username(&record.username).await? {
            if holder.user_id != record.user_id {
                return Err(ServiceError::DuplicateIdentity(format!("username {}", record.username)));
            }
        }
        Ok(())
    }

    async fn prepare(&self, mut record: user::Model, existing: Option<&user::Model>) -> Result<user::Model, ServiceError> {
        record.password = match existing {
            // empty password on update keeps the stored hash
            Some(prev) if record.password.is_empty() => prev.password.clone(),
            _ => password::hash(&record.password)?,
        };
        Ok(record)
    }

    async fn before_delete(&self, existing: &user::Model) -> Result<(), ServiceError> {
        let user_id = existing.user_id;
        let events = self.events.list_for_therapist(user_id).await?;
        if !events.is_empty() {
            return Err(ServiceError::ConstraintViolation(format!(
                "user {user_id} is the therapist of {} event(s)",
                events.len()
            )));
        }
        for grant in self.permissions.list_for_user(user_id).await? {
            self.permissions.remove(&grant.permission_id).await?;
        }
        for entry in self.hours_worked.list_for_user(user_id).await? {
            self.hours_worked.remove(&entry.hours_worked_id).await?;
        }
        info!(user_id, "user_dependents_removed");
        Ok(())
    }
}

impl CrudService<user::Model, dyn UserStore> {
    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<user::Model, ServiceError> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or(ServiceError::not_found("user"))
    }

    /// Check credentials. Unknown user, inactive user and wrong password all
    /// come back as the same `NotFound`.
    #[instrument(skip(self, creds), fields(username = %creds.username))]
    pub async fn login(&self, creds: Credentials) -> Result<user::Model, ServiceError> {
        let candidate = self
            .store
            .find_by_username(&creds.username)
            .await?
            .filter(|u| u.active);
        let Some(user) = candidate else {
            password::verify_dummy(&creds.password);
            warn!(event = "login_failed", "unknown or inactive user");
            return Err(ServiceError::not_found("user"));
        };
        if !password::verify(&creds.password, &user.password) {
            warn!(event = "login_failed", user_id = user.user_id, "password mismatch");
            return Err(ServiceError::not_found("user"));
        }
        info!(event = "login_ok", user_id = user.user_id, "user_logged_in");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Services, Stores};
    use crate::test_support::{at, event, get_db, grant, hours, services, user as sample_user};

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials { username: username.into(), password: password.into() }
    }

    #[tokio::test]
    async fn create_hashes_the_password() {
        let svc = services().users;
        let created = svc.create(sample_user(1, "ada")).await.unwrap();
        assert!(created.password.starts_with("$argon2"));
        assert_eq!(svc.get(&1).await.unwrap().password, created.password);
    }

    #[tokio::test]
    async fn create_requires_password_and_username() {
        let svc = services().users;
        let mut u = sample_user(1, "ada");
        u.password.clear();
        assert!(matches!(svc.create(u).await, Err(ServiceError::InvalidArgument(_))));
        assert!(matches!(svc.create(sample_user(2, " ")).await, Err(ServiceError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_even_when_inactive() {
        let svc = services().users;
        let mut first = sample_user(1, "ada");
        first.active = false;
        svc.create(first).await.unwrap();
        let err = svc.create(sample_user(2, "ada")).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateIdentity(_)));
    }

    #[tokio::test]
    async fn update_keeps_hash_on_empty_password_and_rehashes_otherwise() {
        let svc = services().users;
        let created = svc.create(sample_user(1, "ada")).await.unwrap();

        let mut keep = sample_user(1, "ada");
        keep.password.clear();
        keep.last_name = "Byron".into();
        let kept = svc.update(&1, keep).await.unwrap();
        assert_eq!(kept.password, created.password);
        assert_eq!(kept.last_name, "Byron");

        let mut change = sample_user(1, "ada");
        change.password = "n3w-secret".into();
        let changed = svc.update(&1, change).await.unwrap();
        assert_ne!(changed.password, created.password);
        assert!(svc.login(creds("ada", "n3w-secret")).await.is_ok());
    }

    #[tokio::test]
    async fn update_may_keep_own_username_but_not_take_another() {
        let svc = services().users;
        svc.create(sample_user(1, "ada")).await.unwrap();
        svc.create(sample_user(2, "grace")).await.unwrap();
        assert!(svc.update(&1, sample_user(1, "ada")).await.is_ok());
        let err = svc.update(&1, sample_user(1, "grace")).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateIdentity(_)));
    }

    #[tokio::test]
    async fn find_by_username() {
        let svc = services().users;
        svc.create(sample_user(1, "ada")).await.unwrap();
        assert_eq!(svc.find_by_username("ada").await.unwrap().user_id, 1);
        assert!(matches!(svc.find_by_username("nobody").await, Err(ServiceError::NotFound("user"))));
    }

    #[tokio::test]
    async fn login_outcomes() {
        let svc = services().users;
        svc.create(sample_user(1, "ada")).await.unwrap();
        let mut gone = sample_user(2, "grace");
        gone.active = false;
        svc.create(gone).await.unwrap();

        let ok = svc.login(creds("ada", "Passw0rd!")).await.unwrap();
        assert_eq!(ok.user_id, 1);

        for (name, pw) in [("ada", "wrong"), ("nobody", "Passw0rd!"), ("grace", "Passw0rd!")] {
            let err = svc.login(creds(name, pw)).await.unwrap_err();
            assert!(matches!(err, ServiceError::NotFound("user")), "{name}: {err}");
        }
    }

    #[tokio::test]
    async fn login_with_unreadable_stored_hash_is_not_found() {
        let svc = services().users;
        let mut broken = sample_user(1, "ada");
        broken.password = "Passw0rd!".into();
        svc.store.add(broken).await.unwrap();

        let err = svc.login(creds("ada", "Passw0rd!")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("user")), "{err}");
    }

    async fn delete_takes_dependents_and_respects_events(s: &Services, id: i32) {
        s.users.create(sample_user(id, &format!("del{id}"))).await.unwrap();
        s.permissions.create(grant(id + 1, id, "therapist")).await.unwrap();
        s.hours_worked.create(hours(id + 2, id, at(1), at(2))).await.unwrap();
        s.events.create(event(id + 3, id, at(3), at(4))).await.unwrap();

        let err = s.users.delete(&id).await.unwrap_err();
        assert!(matches!(err, ServiceError::ConstraintViolation(_)), "{err}");
        assert!(s.users.get(&id).await.is_ok());
        assert_eq!(s.permissions.list_for_user(id).await.unwrap().len(), 1);

        s.events.delete(&(id + 3)).await.unwrap();
        assert_eq!(s.users.delete(&id).await.unwrap().user_id, id);
        assert!(s.permissions.list_for_user(id).await.unwrap().is_empty());
        assert!(s.hours_worked.list_for_user(id).await.unwrap().is_empty());

        // a recreated user starts without the old grants
        s.users.create(sample_user(id, &format!("del{id}"))).await.unwrap();
        assert!(s.permissions.list_for_user(id).await.unwrap().is_empty());
        let err = s.events.create(event(id + 3, id, at(3), at(4))).await.unwrap_err();
        assert!(matches!(err, ServiceError::RoleMismatch(_)), "{err}");
        s.users.delete(&id).await.unwrap();
    }

    #[tokio::test]
    async fn delete_user_in_memory() {
        delete_takes_dependents_and_respects_events(&services(), 1).await;
    }

    #[tokio::test]
    async fn delete_user_in_database() -> anyhow::Result<()> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let id = 700_000_000 + (std::process::id() % 100_000) as i32 * 10;
        delete_takes_dependents_and_respects_events(&Services::new(Stores::sea_orm(db)), id).await;
        Ok(())
    }
}
