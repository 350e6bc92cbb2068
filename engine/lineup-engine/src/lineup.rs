//! Lineup assembly for a fixed 15-player roster

use crate::bench::order_bench;
use crate::captaincy::select_captains;
use crate::config::SelectionConfig;
use crate::error::{LineupError, Result};
use crate::formation::{evaluate_formations, Formation};
use crate::ordering::sort_by_priority;
use crate::scoring::{score_all, Scored};
use crate::types::{Lineup, Position, Roster};
use tracing::info;

/// A roster split by position, each bucket in selection priority order
struct Buckets<'a> {
    goalkeepers: Vec<Scored<'a>>,
    outfield: [Vec<Scored<'a>>; 3],
}

impl<'a> Buckets<'a> {
    fn new(ranked: &[Scored<'a>]) -> Self {
        let mut buckets = Buckets { goalkeepers: Vec::new(), outfield: Default::default() };
        for entry in ranked {
            match entry.candidate.position {
                Position::Gk => buckets.goalkeepers.push(*entry),
                Position::Def => buckets.outfield[0].push(*entry),
                Position::Mid => buckets.outfield[1].push(*entry),
                Position::Fwd => buckets.outfield[2].push(*entry),
            }
        }
        buckets
    }

    /// Top-N outfield starters for a formation, or `None` if a bucket is short
    fn outfield_starters(&self, formation: Formation) -> Option<Vec<Scored<'a>>> {
        let mut starters = Vec::with_capacity(10);
        for (bucket, position) in self.outfield.iter().zip(Position::OUTFIELD) {
            let needed = formation.count(position) as usize;
            if bucket.len() < needed {
                return None;
            }
            starters.extend_from_slice(&bucket[..needed]);
        }
        Some(starters)
    }
}

/// Choose formation, XI, captaincy and bench for a validated roster
pub fn assemble(roster: &Roster, config: &SelectionConfig) -> Result<Lineup> {
    config.validate()?;
    let mut ranked = score_all(roster.players(), &config.scoring);
    sort_by_priority(&mut ranked);
    let buckets = Buckets::new(&ranked);

    // Roster validation guarantees exactly two goalkeepers
    let (starting_gk, bench_gk) = match buckets.goalkeepers.as_slice() {
        [first, second] => (*first, *second),
        other => {
            return Err(LineupError::invariant(format!(
                "expected 2 goalkeepers, found {}",
                other.len()
            )))
        }
    };

    let evaluation = evaluate_formations(&config.formations, |formation| {
        Ok(buckets.outfield_starters(formation).map(|outfield| {
            let score = starting_gk.score + outfield.iter().map(|s| s.score).sum::<f64>();
            (score, outfield)
        }))
    })?;

    let mut xi = Vec::with_capacity(crate::XI_SIZE);
    xi.push(starting_gk);
    xi.extend(evaluation.outcome.iter().copied());

    let mut bench_pool: Vec<Scored<'_>> = buckets
        .outfield
        .iter()
        .flatten()
        .filter(|entry| !xi.iter().any(|s| s.candidate.id == entry.candidate.id))
        .copied()
        .collect();
    sort_by_priority(&mut bench_pool);

    let captaincy = select_captains(&xi, &config.captaincy)?;
    let bench = order_bench(&bench_pool, &config.bench)?;

    let lineup = Lineup {
        formation: evaluation.formation,
        xi_ids: xi.iter().map(|s| s.candidate.id).collect(),
        bench_gk_id: bench_gk.candidate.id,
        bench_out_ids: bench.iter().map(|s| s.candidate.id).collect(),
        captain_id: captaincy.captain_id,
        vice_id: captaincy.vice_id,
        xi_score_sum: evaluation.score,
        xi_predicted_sum: xi.iter().map(|s| s.candidate.predicted_score).sum(),
        formation_scores: evaluation.scores,
    };
    lineup.validate(roster)?;

    info!(
        formation = %lineup.formation,
        xi_score = lineup.xi_score_sum,
        captain = lineup.captain_id,
        vice = lineup.vice_id,
        "Lineup selected"
    );
    Ok(lineup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{roster_from, standard_roster};

    #[test]
    fn test_standard_roster_produces_valid_lineup() {
        let roster = standard_roster();
        let lineup = assemble(&roster, &SelectionConfig::default()).unwrap();

        assert_eq!(lineup.xi_ids.len(), 11);
        assert_eq!(lineup.bench_out_ids.len(), 3);
        assert_eq!(lineup.formation_scores.len(), 7);
        assert!(lineup.validate(&roster).is_ok());
    }

    #[test]
    fn test_better_goalkeeper_starts() {
        let roster = roster_from([3.0, 4.5], [5.0; 5], [5.0; 5], [5.0; 3]);
        let lineup = assemble(&roster, &SelectionConfig::default()).unwrap();
        assert_eq!(lineup.xi_ids[0], 2);
        assert_eq!(lineup.bench_gk_id, 1);
    }

    #[test]
    fn test_xi_ids_grouped_by_position() {
        let roster = standard_roster();
        let lineup = assemble(&roster, &SelectionConfig::default()).unwrap();
        let positions: Vec<Position> =
            lineup.xi_ids.iter().map(|id| roster.get(*id).unwrap().position).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let roster = standard_roster();
        let mut config = SelectionConfig::default();
        config.scoring.weight_by_reliability = true;
        config.scoring.reliability_floor = 1.5;
        assert!(matches!(assemble(&roster, &config), Err(LineupError::Config(_))));
    }

    #[test]
    fn test_restricted_formations() {
        let roster = standard_roster();
        let config = SelectionConfig {
            formations: vec!["5-4-1".parse().unwrap()],
            ..SelectionConfig::default()
        };
        let lineup = assemble(&roster, &config).unwrap();
        assert_eq!(lineup.formation.to_string(), "5-4-1");
        assert_eq!(lineup.formation_scores.len(), 1);
    }

    #[test]
    fn test_short_buckets_score_negative_infinity() {
        // Three defenders only: every 4- and 5-at-the-back shape is infeasible
        let mut players = standard_roster().into_players();
        let mut demoted = 0;
        for p in players.iter_mut().filter(|p| p.position == Position::Def) {
            if demoted < 2 {
                p.position = Position::Mid;
                demoted += 1;
            }
        }
        let roster = Roster::new(players).unwrap();
        let lineup = assemble(&roster, &SelectionConfig::default()).unwrap();

        assert_eq!(lineup.formation.def(), 3);
        for score in &lineup.formation_scores {
            if score.formation.def() > 3 {
                assert_eq!(score.value(), f64::NEG_INFINITY);
            }
        }
    }
}
