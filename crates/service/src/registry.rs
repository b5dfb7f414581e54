//! Wiring of stores and services for one storage backend.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use models::{location, patient, therapist_activity};

use crate::crud::CrudService;
use crate::hours_worked::{HoursWorkedRules, HoursWorkedService, HoursWorkedStore};
use crate::patient::{PatientRules, PatientService};
use crate::permission::{PermissionRules, PermissionService, PermissionStore};
use crate::store::{EntityStore, MemoryStore, SeaOrmStore};
use crate::therapist_event::{TherapistEventRules, TherapistEventService, TherapistEventStore};
use crate::user::{UserRules, UserService, UserStore};

pub type LocationService = CrudService<location::Model, dyn EntityStore<location::Model>>;
pub type TherapistActivityService =
    CrudService<therapist_activity::Model, dyn EntityStore<therapist_activity::Model>>;

/// One store per entity, all on the same backend.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub permissions: Arc<dyn PermissionStore>,
    pub patients: Arc<dyn EntityStore<patient::Model>>,
    pub events: Arc<dyn TherapistEventStore>,
    pub hours_worked: Arc<dyn HoursWorkedStore>,
    pub locations: Arc<dyn EntityStore<location::Model>>,
    pub activities: Arc<dyn EntityStore<therapist_activity::Model>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryStore::<models::user::Model>::new()),
            permissions: Arc::new(MemoryStore::<models::permission::Model>::new()),
            patients: Arc::new(MemoryStore::<patient::Model>::new()),
            events: Arc::new(MemoryStore::<models::therapist_event::Model>::new()),
            hours_worked: Arc::new(MemoryStore::<models::hours_worked::Model>::new()),
            locations: Arc::new(MemoryStore::<location::Model>::new()),
            activities: Arc::new(MemoryStore::<therapist_activity::Model>::new()),
        }
    }

    pub fn sea_orm(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(SeaOrmStore::<models::user::Model>::new(db.clone())),
            permissions: Arc::new(SeaOrmStore::<models::permission::Model>::new(db.clone())),
            patients: Arc::new(SeaOrmStore::<patient::Model>::new(db.clone())),
            events: Arc::new(SeaOrmStore::<models::therapist_event::Model>::new(db.clone())),
            hours_worked: Arc::new(SeaOrmStore::<models::hours_worked::Model>::new(db.clone())),
            locations: Arc::new(SeaOrmStore::<location::Model>::new(db.clone())),
            activities: Arc::new(SeaOrmStore::<therapist_activity::Model>::new(db)),
        }
    }
}

/// Every entity service, sharing the stores they cross-check against.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<UserService>,
    pub permissions: Arc<PermissionService>,
    pub patients: Arc<PatientService>,
    pub events: Arc<TherapistEventService>,
    pub hours_worked: Arc<HoursWorkedService>,
    pub locations: Arc<LocationService>,
    pub activities: Arc<TherapistActivityService>,
}

impl Services {
    pub fn new(stores: Stores) -> Self {
        let Stores { users, permissions, patients, events, hours_worked, locations, activities } = stores;
        Self {
            users: Arc::new(UserService::new(
                users.clone(),
                Arc::new(UserRules::new(
                    users.clone(),
                    permissions.clone(),
                    hours_worked.clone(),
                    events.clone(),
                )),
            )),
            permissions: Arc::new(PermissionService::new(
                permissions.clone(),
                Arc::new(PermissionRules::new(users.clone(), permissions.clone())),
            )),
            patients: Arc::new(PatientService::new(patients, Arc::new(PatientRules))),
            events: Arc::new(TherapistEventService::new(
                events,
                Arc::new(TherapistEventRules::new(users.clone(), permissions)),
            )),
            hours_worked: Arc::new(HoursWorkedService::new(hours_worked, Arc::new(HoursWorkedRules::new(users)))),
            locations: Arc::new(LocationService::without_rules(locations)),
            activities: Arc::new(TherapistActivityService::without_rules(activities)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Stores::in_memory())
    }
}
