use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use models::{location, patient, therapist_activity};
use service::store::EntityStore;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod crud;
pub mod hours_worked;
pub mod permission;
pub mod therapist_event;
pub mod user;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: entity APIs, health and API docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> axum::Router {
    let api = Router::new()
        .nest("/api/patient", crud::default_router::<patient::Model, dyn EntityStore<patient::Model>>())
        .nest("/api/user", user::router())
        .nest("/api/permission", permission::router())
        .nest("/api/therapistevent", therapist_event::router())
        .nest("/api/hoursworked", hours_worked::router())
        .nest("/api/location", crud::default_router::<location::Model, dyn EntityStore<location::Model>>())
        .nest(
            "/api/therapistactivity",
            crud::default_router::<therapist_activity::Model, dyn EntityStore<therapist_activity::Model>>(),
        );

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
