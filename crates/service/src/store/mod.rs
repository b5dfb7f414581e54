//! Persistence seam for the entity services.
//!
//! Every entity is stored through [`EntityStore`]; entity-specific lookups
//! (username, windows of events, rows by user) live in extension traits next to
//! the service that needs them. Two backends implement the trait family:
//! [`memory::MemoryStore`] and [`seaorm::SeaOrmStore`].

use std::fmt::{Debug, Display};
use std::hash::Hash;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod memory;
pub mod seaorm;

pub use memory::MemoryStore;
pub use seaorm::{SeaOrmRecord, SeaOrmStore};

/// Save failures reported by a backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The row was changed or removed since it was read.
    #[error("row version mismatch")]
    Conflict,
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("backend failure: {0}")]
    Backend(String),
}

/// A persisted row with a client-supplied identity and a store-managed
/// concurrency token.
pub trait Record: Clone + Debug + Send + Sync + 'static {
    type Id: Clone + Eq + Ord + Hash + Display + Debug + DeserializeOwned + Send + Sync + 'static;

    /// Human readable entity name used in errors and log fields.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
    fn row_version(&self) -> i32;
    fn set_row_version(&mut self, version: i32);
}

/// Per-entity persistence: find by key, list, add, conditional replace, remove.
#[async_trait]
pub trait EntityStore<T: Record>: Send + Sync {
    async fn find(&self, id: &T::Id) -> Result<Option<T>, StoreError>;

    /// All rows ordered by identity.
    async fn list(&self) -> Result<Vec<T>, StoreError>;

    /// Insert a new row with version 0. A taken identity is a `Constraint` error.
    async fn add(&self, record: T) -> Result<T, StoreError>;

    /// Replace the row only if its version still equals `expected_version`.
    /// The stored row gets `expected_version + 1`; zero matching rows is a `Conflict`.
    async fn replace(&self, record: T, expected_version: i32) -> Result<T, StoreError>;

    /// Remove and return the row, `None` if it was not there.
    async fn remove(&self, id: &T::Id) -> Result<Option<T>, StoreError>;
}
