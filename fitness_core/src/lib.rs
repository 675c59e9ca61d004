#![forbid(unsafe_code)]

//! Core domain model and business logic for the Fittrack workout tracker.
//!
//! This crate provides:
//! - Domain types (users, workouts, exercises, logged entries)
//! - The record store (arena tables with JSON persistence)
//! - Exercise library seeding
//! - Aggregation engine (volume, frequency, personal records)
//! - Query/filter layer (search, muscle-group browse, per-exercise history)
//! - CSV export

pub mod types;
pub mod error;
pub mod store;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod stats;
pub mod query;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use store::Store;
pub use catalog::{default_library, seed_default_exercises};
pub use config::Config;
pub use stats::{compute_user_stats, personal_record, UserStats};
pub use query::{exercise_history, search_by_name, select_by_index, Selection};
pub use export::export_user_history;
