//! # Lineup Engine
//!
//! Assembles and evaluates fantasy football rosters from a pool of candidate
//! players. Two entry points are exposed through [`LineupEngine`]:
//!
//! - **Squad building**: greedy assembly of a 15-player squad (2 GK, 5 DEF,
//!   5 MID, 3 FWD) under a budget ceiling and a per-club cap, guarded by a
//!   feasibility lookahead so the greedy pass never spends itself into a
//!   dead end.
//! - **Lineup picking**: given a fixed 15-player roster, choose the best
//!   formation and starting XI, assign captain and vice-captain, and order
//!   the substitutes.
//!
//! Every stage is a pure function over an immutable snapshot of candidates.
//! Identical input and configuration always produce identical output,
//! including list order.

pub mod bench;
pub mod captaincy;
pub mod config;
pub mod engine;
pub mod error;
pub mod formation;
pub mod lineup;
pub mod ordering;
pub mod presentation;
pub mod scoring;
pub mod squad_builder;
pub mod types;

#[cfg(test)]
mod test_support;


pub use config::{BenchConfig, CaptaincyConfig, ScoringConfig, SelectionConfig, SquadConfig};
pub use engine::{LineupEngine, PartialSquad, SquadOutcome, SquadPlan};
pub use error::{LineupError, Result};
pub use formation::{Formation, FormationEvaluation, FormationScore, CANONICAL_FORMATIONS};
pub use presentation::{format_lineup_table, LineupReport, LineupTable, PlayerEntry, SquadReport};
pub use scoring::Scored;
pub use squad_builder::{Shortfall, SquadBuild};
pub use types::{Candidate, CandidateId, Lineup, Position, PositionCounts, Roster};

/// Current version of the lineup engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tolerance used whenever spend is compared against the budget cap.
///
/// Prices are decimal amounts stored as `f64`; sums of a handful of prices
/// can land a few ulps above an exactly-reachable cap.
pub const BUDGET_EPSILON: f64 = 1e-9;

/// Number of players in a full squad
pub const SQUAD_SIZE: usize = 15;

/// Number of players in a starting XI
pub const XI_SIZE: usize = 11;

/// Number of outfield substitutes on the bench
pub const BENCH_OUTFIELD_SIZE: usize = 3;

/// Default captaincy near-tie window
pub const DEFAULT_CAPTAINCY_EPSILON: f64 = 0.05;

/// Default floor applied to start probability when weighting by reliability
pub const DEFAULT_RELIABILITY_FLOOR: f64 = 0.6;

/// Default squad budget
pub const DEFAULT_BUDGET_CAP: f64 = 100.0;

/// Default maximum number of squad players from one club
pub const DEFAULT_MAX_PER_CLUB: u32 = 3;
