#![forbid(unsafe_code)]

//! Core domain model and planning logic for repcoach.
//!
//! This crate provides:
//! - Domain types (days, weeks, feedback, strategy ids)
//! - Progression analysis and plateau detection
//! - Strategy selection and the five day-prescription strategies
//! - The week planner and derived insights
//! - Persistence (JSON history, CSV export)

pub mod types;
pub mod error;
pub mod day_type;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod progression;
pub mod plateau;
pub mod selector;
pub mod strategies;
pub mod advice;
pub mod planner;
pub mod insights;
pub mod history;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, PlannerConfig};
pub use planner::{generate_week, WeekPlanner, WeekRequest};
pub use selector::Selection;
pub use history::{HistoryDocument, HistoryStore};
pub use export::write_program_csv;
