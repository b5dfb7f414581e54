use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use models::therapist_event;
use service::therapist_event::{EventFilter, TherapistEventService, TherapistEventStore};

use super::crud::crud_router;
use crate::errors::JsonApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    crud_router::<therapist_event::Model, dyn TherapistEventStore>(get(list_active))
        .route("/range", post(range))
        .route("/therapist", post(by_therapist))
}

/// Only active events are listed; inactive ones stay readable by id.
pub async fn list_active(
    State(svc): State<Arc<TherapistEventService>>,
) -> Result<Json<Vec<therapist_event::Model>>, JsonApiError> {
    Ok(Json(svc.list_active().await?))
}

#[utoipa::path(
    post, path = "/api/therapistevent/range", tag = "therapistevent",
    request_body = crate::openapi::EventFilterDoc,
    responses(
        (status = 200, description = "Active events overlapping the window", body = [crate::openapi::TherapistEventDoc]),
        (status = 400, description = "Filter missing")
    )
)]
pub async fn range(
    State(svc): State<Arc<TherapistEventService>>,
    Json(filter): Json<Option<EventFilter>>,
) -> Result<Json<Vec<therapist_event::Model>>, JsonApiError> {
    let rows = svc.query(filter).await?;
    info!(count = rows.len(), "therapist_event_range");
    Ok(Json(rows))
}

#[utoipa::path(
    post, path = "/api/therapistevent/therapist", tag = "therapistevent",
    request_body = crate::openapi::EventFilterDoc,
    responses(
        (status = 200, description = "The therapist's active events overlapping the window", body = [crate::openapi::TherapistEventDoc]),
        (status = 400, description = "Filter or therapist_id missing")
    )
)]
pub async fn by_therapist(
    State(svc): State<Arc<TherapistEventService>>,
    Json(filter): Json<Option<EventFilter>>,
) -> Result<Json<Vec<therapist_event::Model>>, JsonApiError> {
    Ok(Json(svc.query_for_therapist(filter).await?))
}
