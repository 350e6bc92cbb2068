use crate::error::{LineupError, Result};
use crate::formation::{Formation, CANONICAL_FORMATIONS};
use crate::{
    DEFAULT_BUDGET_CAP, DEFAULT_CAPTAINCY_EPSILON, DEFAULT_MAX_PER_CLUB, DEFAULT_RELIABILITY_FLOOR,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

/// Selection policy shared by every stage of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Priority score parameters
    pub scoring: ScoringConfig,

    /// Formations to try, in tie-break order
    pub formations: Vec<Formation>,

    /// Budget squad building
    pub squad: SquadConfig,

    /// Captain / vice-captain policy
    pub captaincy: CaptaincyConfig,

    /// Substitute ordering policy
    pub bench: BenchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiply predicted scores by (floored) start probability
    pub weight_by_reliability: bool,

    /// Lower clamp applied to start probability when weighting
    pub reliability_floor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadConfig {
    /// Maximum total spend for a 15-player squad
    pub budget_cap: f64,

    /// Maximum squad players from one club
    pub max_per_club: u32,

    /// Drop candidates below this start probability before building
    pub min_start_probability: Option<f64>,

    /// Retry once without `min_start_probability` when the build falls short
    pub relax_cutoff_on_shortfall: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptaincyConfig {
    /// Score gap treated as a near tie between the top two starters
    pub epsilon: f64,

    /// On a near tie, captain the starter more likely to play
    pub prefer_reliability_on_near_tie: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Fractional discount applied to doubtful substitutes (0 disables)
    pub doubtful_penalty: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            formations: CANONICAL_FORMATIONS.to_vec(),
            squad: SquadConfig::default(),
            captaincy: CaptaincyConfig::default(),
            bench: BenchConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { weight_by_reliability: false, reliability_floor: DEFAULT_RELIABILITY_FLOOR }
    }
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            budget_cap: DEFAULT_BUDGET_CAP,
            max_per_club: DEFAULT_MAX_PER_CLUB,
            min_start_probability: None,
            relax_cutoff_on_shortfall: true,
        }
    }
}

impl Default for CaptaincyConfig {
    fn default() -> Self {
        Self { epsilon: DEFAULT_CAPTAINCY_EPSILON, prefer_reliability_on_near_tie: false }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self { doubtful_penalty: 0.0 }
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(LineupError::config(format!("{name} must be within [0, 1], got {value}")));
    }
    Ok(())
}

impl SelectionConfig {
    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| LineupError::config(format!("Failed to parse configuration: {e}")))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LineupError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Apply `LINEUP_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment, test maps)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LINEUP_BUDGET_CAP") {
            self.squad.budget_cap = parse_override("LINEUP_BUDGET_CAP", &v)?;
        }
        if let Some(v) = lookup("LINEUP_MAX_PER_CLUB") {
            self.squad.max_per_club = parse_override("LINEUP_MAX_PER_CLUB", &v)?;
        }
        if let Some(v) = lookup("LINEUP_RELIABILITY_FLOOR") {
            self.scoring.reliability_floor = parse_override("LINEUP_RELIABILITY_FLOOR", &v)?;
        }
        if let Some(v) = lookup("LINEUP_WEIGHT_BY_RELIABILITY") {
            self.scoring.weight_by_reliability =
                parse_override("LINEUP_WEIGHT_BY_RELIABILITY", &v)?;
        }
        if let Some(v) = lookup("LINEUP_DOUBTFUL_PENALTY") {
            self.bench.doubtful_penalty = parse_override("LINEUP_DOUBTFUL_PENALTY", &v)?;
        }
        if let Some(v) = lookup("LINEUP_CAPTAINCY_EPSILON") {
            self.captaincy.epsilon = parse_override("LINEUP_CAPTAINCY_EPSILON", &v)?;
        }
        if let Some(v) = lookup("LINEUP_FORMATIONS") {
            self.formations = parse_formation_list(&v)?;
        }
        Ok(())
    }

    /// Reject policies the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.squad.validate()?;
        self.captaincy.validate()?;
        self.bench.validate()?;

        if self.formations.is_empty() {
            return Err(LineupError::config("at least one formation must be enabled"));
        }
        let mut seen = HashSet::new();
        for formation in &self.formations {
            if !seen.insert(*formation) {
                return Err(LineupError::config(format!("formation {formation} listed twice")));
            }
        }
        Ok(())
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("reliability_floor", self.reliability_floor)
    }
}

impl SquadConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.budget_cap.is_finite() || self.budget_cap < 0.0 {
            return Err(LineupError::config(format!(
                "budget_cap must be a finite non-negative number, got {}",
                self.budget_cap
            )));
        }
        if self.max_per_club == 0 {
            return Err(LineupError::config("max_per_club must be at least 1"));
        }
        if let Some(cutoff) = self.min_start_probability {
            check_unit_interval("min_start_probability", cutoff)?;
        }
        Ok(())
    }
}

impl CaptaincyConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(LineupError::config(format!(
                "captaincy epsilon must be a finite non-negative number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("doubtful_penalty", self.doubtful_penalty)
    }
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| LineupError::config(format!("{key}: cannot parse '{value}'")))
}

/// Parse a comma-separated formation list such as "3-4-3,4-4-2"
pub fn parse_formation_list(value: &str) -> Result<Vec<Formation>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Formation::from_str)
        .collect()
}
