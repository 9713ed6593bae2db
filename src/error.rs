//! Error taxonomy.
//!
//! Every failure surfaces synchronously from the call that detected it.
//! Nothing is retried: the optimizer is a pure computation given its seed.

use thiserror::Error;

/// Errors raised while loading ratings, configuring, or running the optimizer.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Invalid parameter combination, detected before any generation runs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ratings table or seed schedule does not match the slot layout.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A schedule references a program absent from the ratings table.
    #[error("Unknown program: '{program}'")]
    UnknownProgram { program: String },

    /// A genetic operator produced a schedule that breaks its invariant.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The host deadline passed between generations.
    #[error("Deadline exceeded after {completed} generation(s)")]
    DeadlineExceeded { completed: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data error: {0}")]
    Data(#[from] polars::error::PolarsError),

    #[error("Settings error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
