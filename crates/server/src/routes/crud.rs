//! Handlers shared by every entity: list, create, read, update, delete.

use std::sync::Arc;

use axum::{
    extract::{FromRef, OriginalUri, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, MethodRouter},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};

use service::store::{EntityStore, Record};
use service::CrudService;

use crate::errors::JsonApiError;
use crate::state::AppState;

/// A record that can cross the HTTP boundary.
pub trait ApiRecord: Record + Serialize + DeserializeOwned {}

impl<T: Record + Serialize + DeserializeOwned> ApiRecord for T {}

pub async fn list<T, S>(State(svc): State<Arc<CrudService<T, S>>>) -> Result<Json<Vec<T>>, JsonApiError>
where
    T: ApiRecord,
    S: EntityStore<T> + ?Sized + 'static,
{
    Ok(Json(svc.list().await?))
}

pub async fn read<T, S>(State(svc): State<Arc<CrudService<T, S>>>, Path(id): Path<T::Id>) -> Result<Json<T>, JsonApiError>
where
    T: ApiRecord,
    S: EntityStore<T> + ?Sized + 'static,
{
    Ok(Json(svc.get(&id).await?))
}

/// 201 with the stored row and a `Location` pointing at it.
pub async fn create<T, S>(
    State(svc): State<Arc<CrudService<T, S>>>,
    OriginalUri(uri): OriginalUri,
    Json(record): Json<T>,
) -> Result<impl IntoResponse, JsonApiError>
where
    T: ApiRecord,
    S: EntityStore<T> + ?Sized + 'static,
{
    let created = svc.create(record).await?;
    let location = format!(
        "{}/{}",
        uri.path().trim_end_matches('/'),
        encode_segment(&created.id().to_string())
    );
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

/// Full replacement; 204 on success.
pub async fn update<T, S>(
    State(svc): State<Arc<CrudService<T, S>>>,
    Path(id): Path<T::Id>,
    Json(record): Json<T>,
) -> Result<StatusCode, JsonApiError>
where
    T: ApiRecord,
    S: EntityStore<T> + ?Sized + 'static,
{
    svc.update(&id, record).await.map_err(JsonApiError::on_update)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Responds with the removed row.
pub async fn remove<T, S>(State(svc): State<Arc<CrudService<T, S>>>, Path(id): Path<T::Id>) -> Result<Json<T>, JsonApiError>
where
    T: ApiRecord,
    S: EntityStore<T> + ?Sized + 'static,
{
    Ok(Json(svc.delete(&id).await?))
}

/// `/` (given method router plus POST create) and `/:id` (GET, PUT, DELETE).
pub fn crud_router<T, S>(root: MethodRouter<AppState>) -> Router<AppState>
where
    T: ApiRecord,
    S: EntityStore<T> + ?Sized + 'static,
    Arc<CrudService<T, S>>: FromRef<AppState>,
{
    Router::new()
        .route("/", root.post(create::<T, S>))
        .route("/:id", get(read::<T, S>).put(update::<T, S>).delete(remove::<T, S>))
}

/// `crud_router` with the plain list handler on `GET /`.
pub fn default_router<T, S>() -> Router<AppState>
where
    T: ApiRecord,
    S: EntityStore<T> + ?Sized + 'static,
    Arc<CrudService<T, S>>: FromRef<AppState>,
{
    crud_router::<T, S>(get(list::<T, S>))
}

// Identities are free text for some entities (activity names).
fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
