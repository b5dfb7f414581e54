use chrono::NaiveDateTime;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Window for event queries. The body may also be `null`, which is rejected with 400.
#[derive(ToSchema)]
pub struct EventFilterDoc {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Required by the per-therapist query
    pub therapist_id: Option<i32>,
}

#[derive(ToSchema)]
pub struct CredentialsDoc { pub username: String, pub password: String }

/// User as returned by the API; the password hash is never included.
#[derive(ToSchema)]
pub struct UserDoc {
    pub user_id: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub username: String,
    pub active: bool,
    pub row_version: i32,
}

#[derive(ToSchema)]
pub struct PermissionDoc { pub permission_id: i32, pub user_id: i32, pub role: String, pub row_version: i32 }

#[derive(ToSchema)]
pub struct TherapistEventDoc {
    pub event_id: i32,
    pub therapist_id: i32,
    pub activity_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub notes: Option<String>,
    pub active: bool,
    pub row_version: i32,
}

#[derive(ToSchema)]
pub struct HoursWorkedDoc {
    pub hours_worked_id: i32,
    pub user_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub row_version: i32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::user::list_or_lookup,
        crate::routes::user::login,
        crate::routes::permission::for_user,
        crate::routes::therapist_event::range,
        crate::routes::therapist_event::by_therapist,
        crate::routes::hours_worked::for_user,
        crate::routes::hours_worked::owner,
    ),
    components(
        schemas(
            HealthResponse,
            EventFilterDoc,
            CredentialsDoc,
            UserDoc,
            PermissionDoc,
            TherapistEventDoc,
            HoursWorkedDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "user"),
        (name = "permission"),
        (name = "therapistevent"),
        (name = "hoursworked")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_entity_specific_endpoints() {
        let doc = ApiDoc::openapi();
        for path in ["/api/therapistevent/range", "/api/user/login", "/api/hoursworked/{id}/user"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
