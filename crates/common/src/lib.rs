//! Shared building blocks for the scheduling workspace: logging setup
//! and small response types.

pub mod types;
pub mod utils;
