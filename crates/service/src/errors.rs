use thiserror::Error;

use models::errors::ModelError;

use crate::store::StoreError;

/// Business errors shared by every entity service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("id in path ({path}) does not match id in body ({body})")]
    IdentityMismatch { path: String, body: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0} already exists")]
    DuplicateIdentity(String),
    #[error("referenced {0} does not exist")]
    ReferencedEntityNotFound(String),
    #[error("referenced {0} is not active")]
    ReferencedEntityInactive(String),
    #[error("role mismatch: {0}")]
    RoleMismatch(String),
    #[error("concurrency conflict: {0}")]
    ConcurrencyConflict(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("hashing error: {0}")]
    Hashing(String),
    #[error("store error: {0}")]
    Store(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str) -> Self {
        ServiceError::NotFound(entity)
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 2001,
            ServiceError::IdentityMismatch { .. } => 2002,
            ServiceError::InvalidArgument(_) => 2003,
            ServiceError::DuplicateIdentity(_) => 2004,
            ServiceError::ReferencedEntityNotFound(_) => 2101,
            ServiceError::ReferencedEntityInactive(_) => 2102,
            ServiceError::RoleMismatch(_) => 2103,
            ServiceError::ConcurrencyConflict(_) => 2201,
            ServiceError::ConstraintViolation(_) => 2202,
            ServiceError::Hashing(_) => 2301,
            ServiceError::Store(_) => 2400,
        }
    }

    /// True for the three failures raised while resolving a referenced row.
    pub fn is_reference_failure(&self) -> bool {
        matches!(
            self,
            ServiceError::ReferencedEntityNotFound(_)
                | ServiceError::ReferencedEntityInactive(_)
                | ServiceError::RoleMismatch(_)
        )
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => {
                ServiceError::ConcurrencyConflict("row changed or vanished since it was read".into())
            }
            StoreError::Constraint(msg) => ServiceError::ConstraintViolation(msg),
            StoreError::Backend(msg) => ServiceError::Store(msg),
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::InvalidArgument(msg),
        }
    }
}
