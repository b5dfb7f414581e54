use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use models::user;
use service::user::{Credentials, UserService, UserStore};

use super::crud::crud_router;
use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsernameQuery {
    /// Exact username to look up
    pub username: Option<String>,
}

pub fn router() -> Router<AppState> {
    crud_router::<user::Model, dyn UserStore>(get(list_or_lookup)).route("/login", post(login))
}

/// `GET /api/user` lists everyone, inactive users included; with `?username=`
/// it returns that single user.
#[utoipa::path(
    get, path = "/api/user", tag = "user",
    params(UsernameQuery),
    responses(
        (status = 200, description = "All users, or the one matching `username`", body = crate::openapi::UserDoc),
        (status = 404, description = "No user with that username")
    )
)]
pub async fn list_or_lookup(
    State(svc): State<Arc<UserService>>,
    Query(q): Query<UsernameQuery>,
) -> Result<Response, JsonApiError> {
    match q.username {
        Some(name) => Ok(Json(svc.find_by_username(&name).await?).into_response()),
        None => Ok(Json(svc.list().await?).into_response()),
    }
}

#[utoipa::path(
    post, path = "/api/user/login", tag = "user",
    request_body = crate::openapi::CredentialsDoc,
    responses(
        (status = 200, description = "Credentials accepted", body = crate::openapi::UserDoc),
        (status = 404, description = "Unknown user, inactive user or wrong password")
    )
)]
pub async fn login(
    State(svc): State<Arc<UserService>>,
    Json(creds): Json<Credentials>,
) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(svc.login(creds).await?))
}
