use chrono::{DateTime, Utc};
use lineup_engine::{Candidate, CandidateId, Position};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One normalized pool row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub id: CandidateId,

    /// Display name; the id when the source has no name column
    pub name: String,

    pub club: Option<String>,

    pub position: Position,

    /// Price in millions (tenths already converted)
    pub price: f64,

    pub predicted_score: f64,

    pub start_probability: Option<f64>,

    pub doubtful: bool,

    /// Last season's points per 90, used as a tie-break
    pub secondary_score: Option<f64>,

    pub gameweek: Option<u32>,

    /// Squad membership flag, when the export carries one
    pub in_squad: Option<bool>,
}

impl PoolRecord {
    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            id: self.id,
            name: self.name.clone(),
            club: self.club.clone(),
            position: self.position,
            price: self.price,
            predicted_score: self.predicted_score,
            start_probability: self.start_probability,
            doubtful: self.doubtful,
            secondary_score: self.secondary_score,
        }
    }
}

/// Pool document with metadata, as written by the export scripts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolDocument {
    /// Season label (e.g., "2025-26")
    #[serde(default)]
    pub season: Option<String>,

    /// When this data was last updated
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,

    /// Raw rows; column names vary between sources
    pub players: Vec<Map<String, Value>>,
}

/// Accepted top-level shapes of a pool file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PoolFile {
    Rows(Vec<Map<String, Value>>),
    Document(PoolDocument),
}
