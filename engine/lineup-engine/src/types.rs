//! Core data model: candidates, positions, rosters and lineups

use crate::error::{LineupError, Result};
use crate::formation::{Formation, FormationScore};
use crate::{BENCH_OUTFIELD_SIZE, SQUAD_SIZE, XI_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub type CandidateId = u32;

/// Playing position of a candidate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Gk,
    #[serde(rename = "DEF")]
    Def,
    #[serde(rename = "MID")]
    Mid,
    #[serde(rename = "FWD")]
    Fwd,
}

impl Position {
    /// All positions in display order
    pub const ALL: [Position; 4] = [Position::Gk, Position::Def, Position::Mid, Position::Fwd];

    /// Outfield positions in formation order (DEF-MID-FWD)
    pub const OUTFIELD: [Position; 3] = [Position::Def, Position::Mid, Position::Fwd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Gk => "GK",
            Position::Def => "DEF",
            Position::Mid => "MID",
            Position::Fwd => "FWD",
        }
    }

    pub fn is_outfield(&self) -> bool {
        !matches!(self, Position::Gk)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GK" => Ok(Position::Gk),
            "DEF" => Ok(Position::Def),
            "MID" => Ok(Position::Mid),
            "FWD" => Ok(Position::Fwd),
            other => Err(format!("unknown position '{other}'")),
        }
    }
}

/// Per-position player counts, used for quotas and roster shapes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCounts {
    pub gk: u32,
    pub def: u32,
    pub mid: u32,
    pub fwd: u32,
}

impl PositionCounts {
    /// Full squad quota: 2 GK, 5 DEF, 5 MID, 3 FWD
    pub const SQUAD: PositionCounts = PositionCounts { gk: 2, def: 5, mid: 5, fwd: 3 };

    pub const fn new(gk: u32, def: u32, mid: u32, fwd: u32) -> Self {
        Self { gk, def, mid, fwd }
    }

    pub fn get(&self, position: Position) -> u32 {
        match position {
            Position::Gk => self.gk,
            Position::Def => self.def,
            Position::Mid => self.mid,
            Position::Fwd => self.fwd,
        }
    }

    fn slot_mut(&mut self, position: Position) -> &mut u32 {
        match position {
            Position::Gk => &mut self.gk,
            Position::Def => &mut self.def,
            Position::Mid => &mut self.mid,
            Position::Fwd => &mut self.fwd,
        }
    }

    /// Remove one slot at `position`; no-op when the slot is already empty
    pub fn take(&mut self, position: Position) {
        let slot = self.slot_mut(position);
        *slot = slot.saturating_sub(1);
    }

    pub fn add(&mut self, position: Position) {
        *self.slot_mut(position) += 1;
    }

    pub fn total(&self) -> u32 {
        self.gk + self.def + self.mid + self.fwd
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Slot-wise subtraction, clamped at zero
    pub fn saturating_sub(&self, other: &PositionCounts) -> PositionCounts {
        PositionCounts {
            gk: self.gk.saturating_sub(other.gk),
            def: self.def.saturating_sub(other.def),
            mid: self.mid.saturating_sub(other.mid),
            fwd: self.fwd.saturating_sub(other.fwd),
        }
    }

    /// Count the positions of a set of candidates
    pub fn tally<'a>(candidates: impl IntoIterator<Item = &'a Candidate>) -> PositionCounts {
        let mut counts = PositionCounts::default();
        for candidate in candidates {
            counts.add(candidate.position);
        }
        counts
    }
}

impl fmt::Display for PositionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GK {} / DEF {} / MID {} / FWD {}", self.gk, self.def, self.mid, self.fwd)
    }
}

/// A player available for selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique player id
    pub id: CandidateId,

    /// Display name (e.g., "Salah")
    pub name: String,

    /// Club affiliation; players without a club never count toward a club quota
    #[serde(default)]
    pub club: Option<String>,

    pub position: Position,

    /// Price in millions, non-negative
    #[serde(default)]
    pub price: f64,

    /// Raw predicted points for the period
    pub predicted_score: f64,

    /// Probability of starting, in [0, 1]. `None` means no reliability signal.
    #[serde(default)]
    pub start_probability: Option<f64>,

    /// Flagged as doubtful (injury or fitness concern)
    #[serde(default)]
    pub doubtful: bool,

    /// Secondary quality metric used only to break score ties
    #[serde(default)]
    pub secondary_score: Option<f64>,
}

impl Candidate {
    /// Create a candidate with the required fields; everything else defaulted
    pub fn new(
        id: CandidateId,
        name: impl Into<String>,
        position: Position,
        predicted_score: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            club: None,
            position,
            price: 0.0,
            predicted_score,
            start_probability: None,
            doubtful: false,
            secondary_score: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_club(mut self, club: impl Into<String>) -> Self {
        self.club = Some(club.into());
        self
    }

    pub fn with_start_probability(mut self, probability: f64) -> Self {
        self.start_probability = Some(probability);
        self
    }

    pub fn with_doubtful(mut self, doubtful: bool) -> Self {
        self.doubtful = doubtful;
        self
    }

    pub fn with_secondary_score(mut self, secondary: f64) -> Self {
        self.secondary_score = Some(secondary);
        self
    }

    /// Start probability with the documented default of 1.0 when absent
    pub fn effective_start_probability(&self) -> f64 {
        self.start_probability.unwrap_or(1.0)
    }

    /// Check every numeric field is usable
    pub fn validate(&self) -> Result<()> {
        if !self.predicted_score.is_finite() {
            return Err(LineupError::invalid_field(self.id, "predicted_score", "must be finite"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(LineupError::invalid_field(
                self.id,
                "price",
                format!("must be a finite non-negative number, got {}", self.price),
            ));
        }
        if let Some(p) = self.start_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(LineupError::invalid_field(
                    self.id,
                    "start_probability",
                    format!("must be within [0, 1], got {p}"),
                ));
            }
        }
        if let Some(secondary) = self.secondary_score {
            if !secondary.is_finite() {
                return Err(LineupError::invalid_field(
                    self.id,
                    "secondary_score",
                    "must be finite",
                ));
            }
        }
        Ok(())
    }
}

/// Validate every candidate and reject duplicate ids
pub fn validate_candidates(candidates: &[Candidate]) -> Result<()> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for candidate in candidates {
        candidate.validate()?;
        if !seen.insert(candidate.id) {
            return Err(LineupError::DuplicateId { id: candidate.id });
        }
    }
    Ok(())
}

/// A fixed 15-player squad.
///
/// Holds exactly two goalkeepers, so that one starts and one sits on the
/// bench, and at least the smallest outfield counts any formation needs
/// (3 DEF, 3 MID, 1 FWD). Squads produced by the builder always have the
/// standard 2/5/5/3 shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roster {
    players: Vec<Candidate>,
}

impl Roster {
    /// Validate and wrap a squad
    pub fn new(players: Vec<Candidate>) -> Result<Self> {
        if players.len() != SQUAD_SIZE {
            return Err(LineupError::RosterSize { expected: SQUAD_SIZE, actual: players.len() });
        }
        validate_candidates(&players)?;

        let counts = PositionCounts::tally(&players);
        if counts.gk != 2 {
            return Err(LineupError::PositionCount {
                position: Position::Gk,
                requirement: "exactly 2".to_string(),
                found: counts.gk as usize,
            });
        }
        for (position, minimum) in [(Position::Def, 3), (Position::Mid, 3), (Position::Fwd, 1)] {
            let found = counts.get(position);
            if found < minimum {
                return Err(LineupError::PositionCount {
                    position,
                    requirement: format!("at least {minimum}"),
                    found: found as usize,
                });
            }
        }

        Ok(Self { players })
    }

    pub fn players(&self) -> &[Candidate] {
        &self.players
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn counts(&self) -> PositionCounts {
        PositionCounts::tally(&self.players)
    }

    /// Whether the squad matches the standard 2/5/5/3 shape
    pub fn is_standard_shape(&self) -> bool {
        self.counts() == PositionCounts::SQUAD
    }

    pub fn total_price(&self) -> f64 {
        self.players.iter().map(|p| p.price).sum()
    }

    pub fn into_players(self) -> Vec<Candidate> {
        self.players
    }
}

/// The selected starting XI, bench order and captaincy for one roster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineup {
    pub formation: Formation,

    /// Starting goalkeeper first, then DEF, MID, FWD in priority order
    pub xi_ids: Vec<CandidateId>,

    pub bench_gk_id: CandidateId,

    /// Outfield substitutes in substitution priority order (B1, B2, B3)
    pub bench_out_ids: Vec<CandidateId>,

    pub captain_id: CandidateId,
    pub vice_id: CandidateId,

    /// Sum of the priority scores of the XI (the quantity formations compete on)
    pub xi_score_sum: f64,

    /// Sum of the raw predicted scores of the XI
    pub xi_predicted_sum: f64,

    /// Per-formation diagnostics: every formation tried, in enumeration
    /// order, with its XI score. Infeasible formations carry `None`, which
    /// [`FormationScore::value`] reads as negative infinity.
    pub formation_scores: Vec<FormationScore>,
}

impl Lineup {
    /// All 15 ids: XI, bench goalkeeper, then bench outfield
    pub fn all_ids(&self) -> Vec<CandidateId> {
        let mut ids = self.xi_ids.clone();
        ids.push(self.bench_gk_id);
        ids.extend(&self.bench_out_ids);
        ids
    }

    /// Score recorded for `formation`, negative infinity when infeasible or not tried
    pub fn formation_score(&self, formation: Formation) -> f64 {
        self.formation_scores
            .iter()
            .find(|s| s.formation == formation)
            .map(FormationScore::value)
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// Check every structural invariant against the roster it was picked from
    pub fn validate(&self, roster: &Roster) -> Result<()> {
        if self.xi_ids.len() != XI_SIZE {
            return Err(LineupError::invariant(format!(
                "starting XI has {} players",
                self.xi_ids.len()
            )));
        }
        if self.bench_out_ids.len() != BENCH_OUTFIELD_SIZE {
            return Err(LineupError::invariant(format!(
                "bench has {} outfield players",
                self.bench_out_ids.len()
            )));
        }

        let all_ids = self.all_ids();
        let unique: HashSet<_> = all_ids.iter().collect();
        if unique.len() != SQUAD_SIZE {
            return Err(LineupError::invariant("lineup ids are not 15 distinct players"));
        }

        let lookup = |id: CandidateId| {
            roster
                .get(id)
                .ok_or_else(|| LineupError::invariant(format!("id {id} is not in the roster")))
        };

        let mut xi_counts = PositionCounts::default();
        for &id in &self.xi_ids {
            xi_counts.add(lookup(id)?.position);
        }
        if xi_counts != self.formation.starting_counts() {
            return Err(LineupError::invariant(format!(
                "starting XI ({xi_counts}) does not match formation {}",
                self.formation
            )));
        }
        if lookup(self.bench_gk_id)?.position != Position::Gk {
            return Err(LineupError::invariant("bench goalkeeper is not a goalkeeper"));
        }
        for &id in &self.bench_out_ids {
            if !lookup(id)?.position.is_outfield() {
                return Err(LineupError::invariant("goalkeeper on the outfield bench"));
            }
        }

        if self.captain_id == self.vice_id {
            return Err(LineupError::invariant("captain and vice-captain are the same player"));
        }
        if !self.xi_ids.contains(&self.captain_id) || !self.xi_ids.contains(&self.vice_id) {
            return Err(LineupError::invariant("captain and vice-captain must both start"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::standard_roster;

    #[test]
    fn test_position_parsing() {
        assert_eq!("gk".parse::<Position>().unwrap(), Position::Gk);
        assert_eq!(" FWD ".parse::<Position>().unwrap(), Position::Fwd);
        assert!("ST".parse::<Position>().is_err());
        assert_eq!(Position::Mid.to_string(), "MID");
    }

    #[test]
    fn test_position_counts() {
        let mut counts = PositionCounts::SQUAD;
        assert_eq!(counts.total(), 15);
        counts.take(Position::Fwd);
        counts.take(Position::Fwd);
        counts.take(Position::Fwd);
        counts.take(Position::Fwd);
        assert_eq!(counts.fwd, 0);
        assert_eq!(counts.total(), 12);

        let rest = PositionCounts::SQUAD.saturating_sub(&PositionCounts::new(1, 4, 4, 2));
        assert_eq!(rest, PositionCounts::new(1, 1, 1, 1));
    }

    #[test]
    fn test_candidate_validation() {
        let ok = Candidate::new(1, "A", Position::Mid, 5.0).with_price(7.5);
        assert!(ok.validate().is_ok());

        let negative_price = ok.clone().with_price(-1.0);
        assert!(matches!(
            negative_price.validate(),
            Err(LineupError::InvalidField { field: "price", .. })
        ));

        let bad_probability = ok.clone().with_start_probability(1.2);
        assert!(matches!(
            bad_probability.validate(),
            Err(LineupError::InvalidField { field: "start_probability", .. })
        ));

        let nan_score = Candidate::new(2, "B", Position::Def, f64::NAN);
        assert!(matches!(
            nan_score.validate(),
            Err(LineupError::InvalidField { field: "predicted_score", .. })
        ));
    }

    #[test]
    fn test_effective_start_probability_defaults_to_one() {
        let c = Candidate::new(1, "A", Position::Mid, 5.0);
        assert_eq!(c.effective_start_probability(), 1.0);
        assert_eq!(c.with_start_probability(0.4).effective_start_probability(), 0.4);
    }

    #[test]
    fn test_roster_rejects_wrong_size_and_duplicates() {
        let mut players = standard_roster().into_players();
        players.pop();
        assert_eq!(
            Roster::new(players.clone()),
            Err(LineupError::RosterSize { expected: 15, actual: 14 })
        );

        let duplicate = players[0].clone();
        players.push(duplicate);
        assert!(matches!(Roster::new(players), Err(LineupError::DuplicateId { .. })));
    }

    #[test]
    fn test_roster_requires_two_goalkeepers() {
        let mut players = standard_roster().into_players();
        let gk = players.iter_mut().find(|p| p.position == Position::Gk).unwrap();
        gk.position = Position::Def;
        assert!(matches!(
            Roster::new(players),
            Err(LineupError::PositionCount { position: Position::Gk, found: 1, .. })
        ));
    }

    #[test]
    fn test_roster_requires_a_forward() {
        let mut players = standard_roster().into_players();
        for p in players.iter_mut().filter(|p| p.position == Position::Fwd) {
            p.position = Position::Mid;
        }
        assert!(matches!(
            Roster::new(players),
            Err(LineupError::PositionCount { position: Position::Fwd, found: 0, .. })
        ));
    }

    #[test]
    fn test_standard_shape() {
        let roster = standard_roster();
        assert!(roster.is_standard_shape());
        assert_eq!(roster.counts(), PositionCounts::SQUAD);
    }
}
