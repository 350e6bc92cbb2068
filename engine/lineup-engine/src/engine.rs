use crate::config::SelectionConfig;
use crate::error::{LineupError, Result};
use crate::formation::{evaluate_formations, Formation, FormationScore};
use crate::lineup::assemble;
use crate::squad_builder::{build_squad, Shortfall, SquadBuild};
use crate::types::{validate_candidates, Candidate, Lineup, Roster};
use tracing::{info, warn};

/// Outcome of building a squad from a pool and picking its lineup
#[derive(Debug, Clone)]
pub struct SquadPlan {
    pub roster: Roster,

    /// The winning build and the formation it was built for
    pub build: SquadBuild,
    pub build_formation: Formation,

    pub lineup: Lineup,

    /// Starter score of the build for every formation tried
    pub build_formation_scores: Vec<FormationScore>,

    /// The start-probability cutoff had to be dropped to complete the squad
    pub relaxed_cutoff: bool,
}

/// Best effort when no formation yields a full squad within budget
#[derive(Debug, Clone)]
pub struct PartialSquad {
    /// Formation whose build left the fewest slots open
    pub build_formation: Formation,

    /// Partial picks; `build.shortfall` says what is missing
    pub build: SquadBuild,

    /// Every formation tried, all infeasible
    pub build_formation_scores: Vec<FormationScore>,

    pub relaxed_cutoff: bool,
}

/// Result of [`LineupEngine::plan_squad`]
#[derive(Debug, Clone)]
pub enum SquadOutcome {
    Planned(SquadPlan),
    Shortfall(PartialSquad),
}

impl SquadOutcome {
    pub fn plan(&self) -> Option<&SquadPlan> {
        match self {
            SquadOutcome::Planned(plan) => Some(plan),
            SquadOutcome::Shortfall(_) => None,
        }
    }

    pub fn into_plan(self) -> Option<SquadPlan> {
        match self {
            SquadOutcome::Planned(plan) => Some(plan),
            SquadOutcome::Shortfall(_) => None,
        }
    }

    /// The build behind the outcome, complete or not
    pub fn build(&self) -> &SquadBuild {
        match self {
            SquadOutcome::Planned(plan) => &plan.build,
            SquadOutcome::Shortfall(partial) => &partial.build,
        }
    }

    pub fn build_formation(&self) -> Formation {
        match self {
            SquadOutcome::Planned(plan) => plan.build_formation,
            SquadOutcome::Shortfall(partial) => partial.build_formation,
        }
    }

    pub fn build_formation_scores(&self) -> &[FormationScore] {
        match self {
            SquadOutcome::Planned(plan) => &plan.build_formation_scores,
            SquadOutcome::Shortfall(partial) => &partial.build_formation_scores,
        }
    }

    pub fn shortfall(&self) -> Option<&Shortfall> {
        self.build().shortfall.as_ref()
    }

    pub fn relaxed_cutoff(&self) -> bool {
        match self {
            SquadOutcome::Planned(plan) => plan.relaxed_cutoff,
            SquadOutcome::Shortfall(partial) => partial.relaxed_cutoff,
        }
    }

    fn mark_relaxed(&mut self) {
        match self {
            SquadOutcome::Planned(plan) => plan.relaxed_cutoff = true,
            SquadOutcome::Shortfall(partial) => partial.relaxed_cutoff = true,
        }
    }
}

/// Entry point tying scoring, building, formation choice, captaincy and
/// bench ordering to one validated configuration
#[derive(Debug, Clone)]
pub struct LineupEngine {
    config: SelectionConfig,
}

impl LineupEngine {
    /// Create an engine, rejecting an invalid configuration up front
    pub fn new(config: SelectionConfig) -> Result<Self> {
        config.validate()?;
        info!(
            formations = config.formations.len(),
            weight_by_reliability = config.scoring.weight_by_reliability,
            "🔧 Lineup engine ready"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Pick the lineup for a fixed 15-player squad
    pub fn pick_lineup(&self, players: &[Candidate]) -> Result<Lineup> {
        let roster = Roster::new(players.to_vec())?;
        self.pick_for_roster(&roster)
    }

    pub fn pick_for_roster(&self, roster: &Roster) -> Result<Lineup> {
        assemble(roster, &self.config)
    }

    /// Build a full squad (no formation phase, no reliability cutoff).
    /// A shortfall is reported on the result.
    pub fn build_squad(&self, pool: &[Candidate]) -> Result<SquadBuild> {
        build_squad(pool, &self.config.scoring, &self.config.squad, None)
    }

    /// Build the best squad over all formations and pick its lineup.
    ///
    /// When no formation can be completed the closest partial build comes
    /// back as [`SquadOutcome::Shortfall`]. With `min_start_probability` set
    /// the pool is filtered first; if that falls short and
    /// `relax_cutoff_on_shortfall` is on, the plan is retried once on the
    /// unfiltered pool.
    pub fn plan_squad(&self, pool: &[Candidate]) -> Result<SquadOutcome> {
        validate_candidates(pool)?;

        let Some(cutoff) = self.config.squad.min_start_probability else {
            return self.plan_from(pool);
        };

        let filtered: Vec<Candidate> = pool
            .iter()
            .filter(|c| c.effective_start_probability() >= cutoff)
            .cloned()
            .collect();
        info!(cutoff, kept = filtered.len(), total = pool.len(), "Applied start probability cutoff");

        let outcome = self.plan_from(&filtered)?;
        if outcome.plan().is_none() && self.config.squad.relax_cutoff_on_shortfall {
            warn!(cutoff, "⚠️ Squad infeasible with cutoff, retrying without it");
            let mut relaxed = self.plan_from(pool)?;
            relaxed.mark_relaxed();
            return Ok(relaxed);
        }
        Ok(outcome)
    }

    fn plan_from(&self, pool: &[Candidate]) -> Result<SquadOutcome> {
        let mut partials: Vec<(Formation, SquadBuild)> = Vec::new();
        let evaluation = evaluate_formations(&self.config.formations, |formation| {
            let build =
                build_squad(pool, &self.config.scoring, &self.config.squad, Some(formation))?;
            if build.is_complete() {
                Ok(Some((build.xi_score, build)))
            } else {
                partials.push((formation, build));
                Ok(None)
            }
        });

        let evaluation = match evaluation {
            Ok(evaluation) => evaluation,
            Err(LineupError::NoFeasibleFormation { .. }) => return self.closest_partial(partials),
            Err(err) => return Err(err),
        };

        let build = evaluation.outcome;
        let roster = Roster::new(build.picks.clone()).map_err(|e| {
            LineupError::invariant(format!("completed build is not a valid roster: {e}"))
        })?;
        let lineup = self.pick_for_roster(&roster)?;

        info!(
            build_formation = %evaluation.formation,
            spend = build.total_spend,
            budget_cap = self.config.squad.budget_cap,
            "✅ Squad planned"
        );

        Ok(SquadOutcome::Planned(SquadPlan {
            roster,
            build,
            build_formation: evaluation.formation,
            lineup,
            build_formation_scores: evaluation.scores,
            relaxed_cutoff: false,
        }))
    }

    /// Fewest open slots wins; ties keep the earlier formation
    fn closest_partial(&self, partials: Vec<(Formation, SquadBuild)>) -> Result<SquadOutcome> {
        let build_formation_scores: Vec<FormationScore> = partials
            .iter()
            .map(|(formation, _)| FormationScore { formation: *formation, score: None })
            .collect();
        let tried = partials.len();

        let (build_formation, build) = partials
            .into_iter()
            .min_by_key(|(_, build)| build.shortfall.as_ref().map_or(0, |s| s.missing.total()))
            .ok_or(LineupError::NoFeasibleFormation { tried })?;

        warn!(
            build_formation = %build_formation,
            picked = build.picks.len(),
            spend = build.total_spend,
            "⚠️ No formation completes a squad within budget"
        );

        Ok(SquadOutcome::Shortfall(PartialSquad {
            build_formation,
            build,
            build_formation_scores,
            relaxed_cutoff: false,
        }))
    }
}
