//! Persisted rows of the scheduling database (SeaORM entities) plus the
//! field-level validators shared by the service layer.

pub mod errors;
pub mod db;
pub mod user;
pub mod permission;
pub mod patient;
pub mod therapist_event;
pub mod hours_worked;
pub mod location;
pub mod therapist_activity;

/// Serde default for `active` flags: rows are active unless a client says otherwise.
pub fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests;
