//! Service layer for business logic orchestration
//!
//! Keeps the resolve-then-write pipeline out of the CLI layer in main.rs.

pub mod update;

pub use update::{UpdateOptions, UpdateService};
