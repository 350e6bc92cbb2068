//! Error types for the lineup engine

use crate::types::{CandidateId, Position};
use thiserror::Error;

/// Result type alias for lineup engine operations
pub type Result<T> = std::result::Result<T, LineupError>;

/// Errors that can occur while building squads or picking lineups
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineupError {
    /// The same candidate id appears more than once in the input
    #[error("Duplicate candidate id {id}")]
    DuplicateId { id: CandidateId },

    /// A roster does not contain the expected number of players
    #[error("Roster must contain exactly {expected} players, got {actual}")]
    RosterSize { expected: usize, actual: usize },

    /// A roster has too few (or, for goalkeepers, too many) players at a position
    #[error("Roster needs {requirement} {position} players, found {found}")]
    PositionCount { position: Position, requirement: String, found: usize },

    /// A candidate field holds a value the engine cannot work with
    #[error("Invalid {field} for candidate {id}: {reason}")]
    InvalidField { id: CandidateId, field: &'static str, reason: String },

    /// Formation label is not one of the canonical formations
    #[error("Unknown formation: {0}")]
    UnknownFormation(String),

    /// Every formation in the enumeration was infeasible
    #[error("No feasible formation among {tried} tried")]
    NoFeasibleFormation { tried: usize },

    /// Not enough outfield players left over for the bench
    #[error("Bench requires {required} outfield players, only {available} available")]
    BenchShortfall { required: usize, available: usize },

    /// Captaincy needs at least two starters
    #[error("Captaincy requires at least 2 starters, got {0}")]
    CaptaincyUnavailable(usize),

    /// A produced lineup violated a structural invariant
    #[error("Lineup invariant violated: {0}")]
    Invariant(String),

    /// Policy misconfiguration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LineupError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invariant violation error
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Create a new invalid field error
    pub fn invalid_field(id: CandidateId, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField { id, field, reason: reason.into() }
    }

    /// Whether this error reports a feasibility problem rather than bad input
    pub fn is_feasibility(&self) -> bool {
        matches!(self, Self::NoFeasibleFormation { .. } | Self::BenchShortfall { .. })
    }
}
