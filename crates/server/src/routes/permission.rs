use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use models::permission;
use service::permission::{PermissionService, PermissionStore};

use super::crud::default_router;
use crate::errors::JsonApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    default_router::<permission::Model, dyn PermissionStore>().route("/user/:user_id", get(for_user))
}

#[utoipa::path(
    get, path = "/api/permission/user/{user_id}", tag = "permission",
    params(("user_id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Roles granted to the user", body = [crate::openapi::PermissionDoc]))
)]
pub async fn for_user(
    State(svc): State<Arc<PermissionService>>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<permission::Model>>, JsonApiError> {
    Ok(Json(svc.list_for_user(user_id).await?))
}
