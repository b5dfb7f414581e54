//! Service layer for the scheduling API.
//! - One generic CRUD service (`crud`) over an abstract store (`store`).
//! - Per-entity rules and queries in the entity modules.
//! - `registry` wires a backend's stores into the full service set.

pub mod crud;
pub mod errors;
pub mod hours_worked;
pub mod password;
pub mod patient;
pub mod permission;
mod records;
pub mod registry;
pub mod store;
pub mod therapist_event;
pub mod user;
#[cfg(test)]
pub mod test_support;

pub use crud::{CrudService, EntityRules, NoRules};
pub use errors::ServiceError;
pub use registry::{Services, Stores};
