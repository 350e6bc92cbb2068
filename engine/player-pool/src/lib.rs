//! Player Pool - Loads candidate players for the lineup engine
//!
//! Reads JSON exports (a bare array of rows or a `{ season, players }`
//! document), maps the many column spellings seen in fantasy data dumps onto
//! one record shape, and hands validated [`lineup_engine::Candidate`] values
//! to the engine.

pub mod error;
pub mod normalize;
pub mod pool;
pub mod types;

pub use error::{PoolError, Result};
pub use pool::PlayerPool;
pub use types::{PoolDocument, PoolRecord};
