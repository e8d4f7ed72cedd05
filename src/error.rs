//! Error types for shift assignment

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::{Shift, WorkerId};

/// Failures surfaced to the caller of the engine.
///
/// A schedule that cannot be fully covered is not an error; it comes back as a
/// partial result. Everything here means "try again" or "fix the input".
#[derive(Debug, Error)]
pub enum AssignError {
    /// Bad weight settings or configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// The settings collaborator could not produce a snapshot
    #[error("Settings unavailable: {0}")]
    Settings(String),

    /// The worker context hosting the search failed
    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Invalid date range: {end} is before {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Worker {worker} has a CANT constraint on {shift}")]
    Conflict { worker: WorkerId, shift: Shift },
}

/// Result type alias for shift assignment operations
pub type Result<T> = std::result::Result<T, AssignError>;
