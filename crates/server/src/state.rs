use std::sync::Arc;

use axum::extract::FromRef;

use service::hours_worked::HoursWorkedService;
use service::patient::PatientService;
use service::permission::PermissionService;
use service::registry::{LocationService, TherapistActivityService};
use service::therapist_event::TherapistEventService;
use service::user::UserService;
use service::Services;

/// Router state. Handlers extract the single service they need through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

macro_rules! service_from_state {
    ($ty:ty, $field:ident) => {
        impl FromRef<AppState> for Arc<$ty> {
            fn from_ref(state: &AppState) -> Self {
                state.services.$field.clone()
            }
        }
    };
}

service_from_state!(UserService, users);
service_from_state!(PermissionService, permissions);
service_from_state!(PatientService, patients);
service_from_state!(TherapistEventService, events);
service_from_state!(HoursWorkedService, hours_worked);
service_from_state!(LocationService, locations);
service_from_state!(TherapistActivityService, activities);
