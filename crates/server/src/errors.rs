use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use service::ServiceError;

/// JSON error response: `{"error": title, "code": n, "detail": msg}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub code: u16,
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, code: 0, detail }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Mapping for PUT: every failure to resolve a referenced row is a bad request.
    pub fn on_update(err: ServiceError) -> Self {
        if err.is_reference_failure() {
            let code = err.code();
            return JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Reference", Some(err.to_string()))
                .with_code(code);
        }
        err.into()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        let (status, title) = match &err {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            ServiceError::IdentityMismatch { .. } => (StatusCode::BAD_REQUEST, "Identity Mismatch"),
            ServiceError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "Invalid Argument"),
            ServiceError::DuplicateIdentity(_) => (StatusCode::CONFLICT, "Duplicate Identity"),
            ServiceError::ReferencedEntityNotFound(_) => (StatusCode::NOT_FOUND, "Referenced Entity Not Found"),
            ServiceError::ReferencedEntityInactive(_) => (StatusCode::NOT_FOUND, "Referenced Entity Inactive"),
            ServiceError::RoleMismatch(_) => (StatusCode::BAD_REQUEST, "Role Mismatch"),
            ServiceError::ConstraintViolation(_) => (StatusCode::CONFLICT, "Constraint Violation"),
            ServiceError::ConcurrencyConflict(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Concurrency Conflict"),
            ServiceError::Hashing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Hashing Error"),
            ServiceError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Store Error"),
        };
        JsonApiError::new(status, title, Some(err.to_string())).with_code(err.code())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), code = self.code, detail = ?self.detail, "request failed");
        } else {
            warn!(status = self.status.as_u16(), code = self.code, detail = ?self.detail, "request rejected");
        }
        let body = ErrorBody { error: self.title, code: self.code, detail: self.detail.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migration failed: {0}")]
    Migration(String),
}
