use crate::error::{PoolError, Result};
use crate::normalize::normalize_row;
use crate::types::{PoolFile, PoolRecord};
use chrono::{DateTime, Utc};
use lineup_engine::Candidate;
use std::path::Path;
use tracing::{debug, info};

/// Player Pool - normalized candidate rows loaded from an export
///
/// Filtering consumes the pool and returns the narrowed one, so a load reads
/// as a pipeline: `load → filter_gameweek → squad_only → into_candidates`.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    records: Vec<PoolRecord>,
    season: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl PlayerPool {
    pub fn from_records(records: Vec<PoolRecord>) -> Self {
        Self { records, season: None, last_updated: None }
    }

    /// Load and normalize a JSON pool file
    pub async fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref();
        info!("Loading player pool from: {:?}", path);

        let json_content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PoolError::Io { path: path.to_path_buf(), source })?;
        let pool = Self::from_json_str(&json_content)?;

        info!("Loaded {} players from file", pool.len());
        Ok(pool)
    }

    /// Parse either a bare array of rows or a `{ season, players }` document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let (rows, season, last_updated) = match serde_json::from_str::<PoolFile>(json)? {
            PoolFile::Rows(rows) => (rows, None, None),
            PoolFile::Document(doc) => (doc.players, doc.season, doc.last_updated),
        };

        let records = rows
            .iter()
            .enumerate()
            .map(|(index, row)| normalize_row(index, row))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { records, season, last_updated })
    }

    pub fn records(&self) -> &[PoolRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn season(&self) -> Option<&str> {
        self.season.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Highest gameweek present in the rows
    pub fn latest_gameweek(&self) -> Option<u32> {
        self.records.iter().filter_map(|r| r.gameweek).max()
    }

    /// Keep rows of one gameweek: `gameweek`, or the latest present when `None`.
    ///
    /// Pools without any gameweek column pass through unchanged.
    pub fn filter_gameweek(mut self, gameweek: Option<u32>) -> Result<Self> {
        let Some(latest) = self.latest_gameweek() else {
            debug!("No gameweek column; keeping all {} rows", self.len());
            return Ok(self);
        };
        let target = gameweek.unwrap_or(latest);

        self.records.retain(|r| r.gameweek == Some(target));
        if self.records.is_empty() {
            return Err(PoolError::NoRowsForGameweek(target));
        }
        info!("Filtered to gameweek {}: {} rows", target, self.len());
        Ok(self)
    }

    /// Keep rows flagged `in_squad`.
    ///
    /// Pools without the flag pass through unchanged (the file is the squad).
    pub fn squad_only(mut self) -> Result<Self> {
        if self.records.iter().all(|r| r.in_squad.is_none()) {
            return Ok(self);
        }
        self.records.retain(|r| r.in_squad == Some(true));
        if self.records.is_empty() {
            return Err(PoolError::EmptySquad);
        }
        info!("Extracted squad via in_squad: {} players", self.len());
        Ok(self)
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.records.iter().map(PoolRecord::to_candidate).collect()
    }
}
