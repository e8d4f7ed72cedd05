//! Fair shift assignment: a greedy pass with a time-bounded backtracking fallback.

pub mod config;
pub mod data;
pub mod error;
pub mod greedy;
pub mod matcher;
pub mod roster;
pub mod search;
pub mod server;
pub mod solver;
pub mod weights;

pub use error::{AssignError, Result};
pub use solver::{AssignmentEngine, SettingsProvider};
