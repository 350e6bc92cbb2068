//! Error types for pool loading

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors raised while reading or normalizing a player pool
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pool JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A row lacks a required column under every accepted spelling
    #[error("Row {index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Row {index}: unknown position '{value}'")]
    UnknownPosition { index: usize, value: String },

    #[error("Row {index}: field '{field}' is not a valid number: {value}")]
    InvalidNumber { index: usize, field: &'static str, value: String },

    #[error("Row {index}: field '{field}' is not a true/false flag: {value}")]
    InvalidFlag { index: usize, field: &'static str, value: String },

    #[error("No rows for gameweek {0}")]
    NoRowsForGameweek(u32),

    /// An `in_squad` column is present but no row is marked
    #[error("Rows carry in_squad but none is marked true")]
    EmptySquad,
}
