//! Human-readable and serializable views of a lineup

use crate::engine::SquadOutcome;
use crate::error::{LineupError, Result};
use crate::formation::FormationScore;
use crate::squad_builder::Shortfall;
use crate::types::{Candidate, CandidateId, Lineup, Position, Roster};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

const RULE_WIDTH: usize = 70;

/// Plain-text table of the starting XI and bench
pub struct LineupTable<'a> {
    lineup: &'a Lineup,
    roster: &'a Roster,
}

impl<'a> LineupTable<'a> {
    pub fn new(lineup: &'a Lineup, roster: &'a Roster) -> Self {
        Self { lineup, roster }
    }

    fn marker(&self, id: CandidateId) -> &'static str {
        if id == self.lineup.captain_id {
            " (C)"
        } else if id == self.lineup.vice_id {
            " (VC)"
        } else {
            ""
        }
    }

    fn row(&self, f: &mut fmt::Formatter<'_>, prefix: &str, id: CandidateId) -> fmt::Result {
        match self.roster.get(id) {
            Some(p) => writeln!(
                f,
                "{prefix}{:<3} | {:<20}{:<5} | {:>5.2} pts | {:>3.0}% start",
                p.position.as_str(),
                p.name,
                self.marker(id),
                p.predicted_score,
                p.effective_start_probability() * 100.0
            ),
            None => writeln!(f, "{prefix}Player {id} (not found)"),
        }
    }
}

impl fmt::Display for LineupTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);
        let lineup = self.lineup;

        writeln!(f, "{heavy}")?;
        writeln!(
            f,
            "STARTING XI ({})  score {:.2}  predicted {:.2}",
            lineup.formation, lineup.xi_score_sum, lineup.xi_predicted_sum
        )?;
        writeln!(f, "{light}")?;
        for &id in &lineup.xi_ids {
            self.row(f, "  ", id)?;
        }

        writeln!(f, "{light}")?;
        writeln!(f, "BENCH")?;
        writeln!(f, "{light}")?;
        self.row(f, "  [GK]  ", lineup.bench_gk_id)?;
        for (i, &id) in lineup.bench_out_ids.iter().enumerate() {
            self.row(f, &format!("  [B{}]  ", i + 1), id)?;
        }
        write!(f, "{heavy}")
    }
}

/// Render the starting XI (captain and vice marked) and the ordered bench
pub fn format_lineup_table(lineup: &Lineup, roster: &Roster) -> String {
    LineupTable::new(lineup, roster).to_string()
}

/// One player in a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerEntry {
    pub id: CandidateId,
    pub name: String,
    pub position: Position,
    pub club: Option<String>,
    pub price: f64,
    pub predicted_score: f64,
    pub start_probability: f64,
    pub doubtful: bool,
}

impl PlayerEntry {
    fn lookup(roster: &Roster, id: CandidateId) -> Result<Self> {
        roster
            .get(id)
            .map(Self::from_candidate)
            .ok_or_else(|| LineupError::invariant(format!("id {id} is not in the roster")))
    }

    pub fn from_candidate(p: &Candidate) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            position: p.position,
            club: p.club.clone(),
            price: p.price,
            predicted_score: p.predicted_score,
            start_probability: p.effective_start_probability(),
            doubtful: p.doubtful,
        }
    }
}

/// Serializable lineup with names resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupReport {
    pub formation: String,
    pub starting_xi: Vec<PlayerEntry>,
    pub bench_gk: PlayerEntry,
    pub bench: Vec<PlayerEntry>,
    pub captain_id: CandidateId,
    pub vice_id: CandidateId,
    pub xi_score_sum: f64,
    pub xi_predicted_sum: f64,
    /// Infeasible formations serialize with a `null` score
    pub formation_scores: Vec<FormationScore>,
}

impl LineupReport {
    pub fn new(lineup: &Lineup, roster: &Roster) -> Result<Self> {
        let entries = |ids: &[CandidateId]| -> Result<Vec<PlayerEntry>> {
            ids.iter().map(|&id| PlayerEntry::lookup(roster, id)).collect()
        };
        Ok(Self {
            formation: lineup.formation.to_string(),
            starting_xi: entries(&lineup.xi_ids)?,
            bench_gk: PlayerEntry::lookup(roster, lineup.bench_gk_id)?,
            bench: entries(&lineup.bench_out_ids)?,
            captain_id: lineup.captain_id,
            vice_id: lineup.vice_id,
            xi_score_sum: lineup.xi_score_sum,
            xi_predicted_sum: lineup.xi_predicted_sum,
            formation_scores: lineup.formation_scores.clone(),
        })
    }
}

/// Budget side of a squad build, with the lineup when the squad is complete
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadReport {
    pub complete: bool,
    /// Every pick in acceptance order
    pub squad: Vec<PlayerEntry>,
    /// Absent when the build fell short
    pub lineup: Option<LineupReport>,
    pub build_formation: String,
    pub build_formation_scores: Vec<FormationScore>,
    pub total_spend: f64,
    pub budget_cap: f64,
    /// Players per club, clubless players excluded
    pub club_counts: BTreeMap<String, u32>,
    pub relaxed_cutoff: bool,
    pub shortfall: Option<Shortfall>,
}

impl SquadReport {
    pub fn new(outcome: &SquadOutcome, budget_cap: f64) -> Result<Self> {
        let build = outcome.build();

        let mut club_counts = BTreeMap::new();
        for player in &build.picks {
            if let Some(club) = &player.club {
                *club_counts.entry(club.clone()).or_insert(0) += 1;
            }
        }

        let lineup = match outcome {
            SquadOutcome::Planned(plan) => Some(LineupReport::new(&plan.lineup, &plan.roster)?),
            SquadOutcome::Shortfall(_) => None,
        };

        Ok(Self {
            complete: lineup.is_some(),
            squad: build.picks.iter().map(PlayerEntry::from_candidate).collect(),
            lineup,
            build_formation: outcome.build_formation().to_string(),
            build_formation_scores: outcome.build_formation_scores().to_vec(),
            total_spend: build.total_spend,
            budget_cap,
            club_counts,
            relaxed_cutoff: outcome.relaxed_cutoff(),
            shortfall: outcome.shortfall().cloned(),
        })
    }
}
