use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use models::{hours_worked, user};
use service::hours_worked::{HoursWorkedService, HoursWorkedStore};

use super::crud::default_router;
use crate::errors::JsonApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    default_router::<hours_worked::Model, dyn HoursWorkedStore>()
        .route("/user/:user_id", get(for_user))
        .route("/:id/user", get(owner))
}

#[utoipa::path(
    get, path = "/api/hoursworked/user/{user_id}", tag = "hoursworked",
    params(("user_id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Time entries of the user", body = [crate::openapi::HoursWorkedDoc]))
)]
pub async fn for_user(
    State(svc): State<Arc<HoursWorkedService>>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<hours_worked::Model>>, JsonApiError> {
    Ok(Json(svc.list_for_user(user_id).await?))
}

#[utoipa::path(
    get, path = "/api/hoursworked/{id}/user", tag = "hoursworked",
    params(("id" = i32, Path, description = "Hours worked id")),
    responses(
        (status = 200, description = "The user the entry belongs to", body = crate::openapi::UserDoc),
        (status = 404, description = "Entry or user missing")
    )
)]
pub async fn owner(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<user::Model>, JsonApiError> {
    let services = &state.services;
    Ok(Json(services.hours_worked.user_for(id, &services.users).await?))
}
