//! Budget-constrained greedy squad builder
//!
//! Candidates are visited once in selection priority order. A candidate is
//! accepted only when the cheapest club-respecting way to fill every slot
//! still open after taking it keeps total spend within the budget cap.

use crate::config::{ScoringConfig, SquadConfig};
use crate::error::Result;
use crate::formation::Formation;
use crate::ordering::sort_by_priority;
use crate::scoring::score_all;
use crate::types::{validate_candidates, Candidate, CandidateId, Position, PositionCounts};
use crate::BUDGET_EPSILON;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

/// Slots the builder could not fill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortfall {
    pub missing: PositionCounts,
    pub spent: f64,
    pub budget_cap: f64,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} slots unfilled ({}) after spending {:.1} of {:.1}",
            self.missing.total(),
            self.missing,
            self.spent,
            self.budget_cap
        )
    }
}

/// Result of one build: possibly partial, never over budget
#[derive(Debug, Clone, PartialEq)]
pub struct SquadBuild {
    /// Accepted players in acceptance order
    pub picks: Vec<Candidate>,

    /// Players accepted into the formation's starting slots (empty when no
    /// formation was given)
    pub starter_ids: Vec<CandidateId>,

    /// Sum of starter priority scores
    pub xi_score: f64,

    pub total_spend: f64,

    /// `Some` when the squad could not be completed
    pub shortfall: Option<Shortfall>,
}

impl SquadBuild {
    pub fn is_complete(&self) -> bool {
        self.shortfall.is_none()
    }
}

/// Candidates per position, cheapest first
struct PriceIndex<'a> {
    by_position: [Vec<&'a Candidate>; 4],
    fill_orders: Vec<[Position; 4]>,
}

impl<'a> PriceIndex<'a> {
    fn new(pool: &'a [Candidate]) -> Self {
        let mut by_position: [Vec<&'a Candidate>; 4] = Default::default();
        for candidate in pool {
            by_position[slot(candidate.position)].push(candidate);
        }
        for bucket in &mut by_position {
            bucket.sort_by(|a, b| a.price.total_cmp(&b.price).then_with(|| a.id.cmp(&b.id)));
        }
        Self { by_position, fill_orders: fill_orders() }
    }

    fn cheapest(&self, position: Position) -> &[&'a Candidate] {
        &self.by_position[slot(position)]
    }
}

fn slot(position: Position) -> usize {
    match position {
        Position::Gk => 0,
        Position::Def => 1,
        Position::Mid => 2,
        Position::Fwd => 3,
    }
}

/// Every ordering of the four positions, `Position::ALL` first
fn fill_orders() -> Vec<[Position; 4]> {
    let mut orders = Vec::with_capacity(24);
    for a in Position::ALL {
        for b in Position::ALL {
            for c in Position::ALL {
                for d in Position::ALL {
                    let order = [a, b, c, d];
                    if (1..4).all(|i| !order[..i].contains(&order[i])) {
                        orders.push(order);
                    }
                }
            }
        }
    }
    orders
}

/// Fill `open` position by position in `order`, cheapest eligible first.
/// Club counts accumulate across positions, so the result is a legal
/// completion; `None` if some slot stays empty.
fn fill_cost<'a>(
    index: &PriceIndex<'a>,
    order: &[Position; 4],
    open: PositionCounts,
    used: &HashSet<CandidateId>,
    club_counts: &HashMap<&'a str, u32>,
    max_per_club: u32,
) -> Option<f64> {
    let mut clubs = club_counts.clone();
    let mut total = 0.0;

    for &position in order {
        let mut needed = open.get(position);
        for candidate in index.cheapest(position) {
            if needed == 0 {
                break;
            }
            if used.contains(&candidate.id) {
                continue;
            }
            if let Some(club) = candidate.club.as_deref() {
                let count = clubs.entry(club).or_insert(0);
                if *count >= max_per_club {
                    continue;
                }
                *count += 1;
            }
            total += candidate.price;
            needed -= 1;
        }
        if needed > 0 {
            return None;
        }
    }
    Some(total)
}

/// Cheapest cost of filling `open` from unused candidates without breaking
/// the club cap, or `None` when no fill order completes it.
///
/// A cheap player taken for one position can use up the club slot another
/// position depends on, so every position order is tried and the cheapest
/// legal completion wins.
fn minimal_cost_to_complete<'a>(
    index: &PriceIndex<'a>,
    open: PositionCounts,
    used: &HashSet<CandidateId>,
    club_counts: &HashMap<&'a str, u32>,
    max_per_club: u32,
) -> Option<f64> {
    if open.is_empty() {
        return Some(0.0);
    }
    index
        .fill_orders
        .iter()
        .filter_map(|order| fill_cost(index, order, open, used, club_counts, max_per_club))
        .min_by(f64::total_cmp)
}

/// Build a 15-player squad under the budget and club cap.
///
/// With a formation, its starting slots are filled first and the remaining
/// squad slots second; the lookahead always covers every open squad slot.
/// A shortfall is reported in the result, not as an error.
pub fn build_squad(
    pool: &[Candidate],
    scoring: &ScoringConfig,
    config: &SquadConfig,
    formation: Option<Formation>,
) -> Result<SquadBuild> {
    scoring.validate()?;
    config.validate()?;
    validate_candidates(pool)?;

    let mut ranked = score_all(pool, scoring);
    sort_by_priority(&mut ranked);
    let index = PriceIndex::new(pool);

    let phases = match formation {
        Some(f) => {
            let starters = f.starting_counts();
            vec![starters, PositionCounts::SQUAD.saturating_sub(&starters)]
        }
        None => vec![PositionCounts::SQUAD],
    };

    let cap = config.budget_cap;
    let max_per_club = config.max_per_club;
    let mut open = PositionCounts::SQUAD;
    let mut used: HashSet<CandidateId> = HashSet::new();
    let mut club_counts: HashMap<&str, u32> = HashMap::new();
    let mut spent = 0.0;
    let mut picks = Vec::with_capacity(crate::SQUAD_SIZE);
    let mut starter_ids = Vec::new();
    let mut xi_score = 0.0;

    for (phase_index, mut quota) in phases.into_iter().enumerate() {
        let starter_phase = formation.is_some() && phase_index == 0;

        // An acceptance can make an earlier reject affordable, so rescan
        // until a full pass accepts nobody.
        let mut pass = 0;
        loop {
            pass += 1;
            let mut accepted = 0;

            for entry in &ranked {
                if quota.is_empty() {
                    break;
                }
                let candidate = entry.candidate;
                if used.contains(&candidate.id) || quota.get(candidate.position) == 0 {
                    continue;
                }
                let club = candidate.club.as_deref();
                if let Some(club) = club {
                    if club_counts.get(club).copied().unwrap_or(0) >= max_per_club {
                        debug!(id = candidate.id, club, "Rejected: club cap reached");
                        continue;
                    }
                }

                let mut open_after = open;
                open_after.take(candidate.position);
                used.insert(candidate.id);
                if let Some(club) = club {
                    *club_counts.entry(club).or_insert(0) += 1;
                }

                let rest =
                    minimal_cost_to_complete(&index, open_after, &used, &club_counts, max_per_club);
                let affordable = rest
                    .map(|rest| spent + candidate.price + rest <= cap + BUDGET_EPSILON)
                    .unwrap_or(false);

                if !affordable {
                    used.remove(&candidate.id);
                    if let Some(club) = club {
                        if let Some(count) = club_counts.get_mut(club) {
                            *count -= 1;
                        }
                    }
                    debug!(
                        id = candidate.id,
                        price = candidate.price,
                        spent,
                        remaining_cost = ?rest,
                        "Rejected: squad could not be completed within budget"
                    );
                    continue;
                }

                debug!(
                    id = candidate.id,
                    price = candidate.price,
                    score = entry.score,
                    pass,
                    "Accepted"
                );
                accepted += 1;
                spent += candidate.price;
                open = open_after;
                quota.take(candidate.position);
                if starter_phase {
                    starter_ids.push(candidate.id);
                    xi_score += entry.score;
                }
                picks.push(candidate.clone());
            }

            if accepted == 0 || quota.is_empty() {
                break;
            }
        }
    }

    let shortfall = if open.is_empty() {
        None
    } else {
        let shortfall = Shortfall { missing: open, spent, budget_cap: cap };
        warn!(
            formation = ?formation.map(|f| f.to_string()),
            "Squad build fell short: {}",
            shortfall
        );
        Some(shortfall)
    };

    debug!(
        formation = ?formation.map(|f| f.to_string()),
        picked = picks.len(),
        spent,
        budget_cap = cap,
        "Squad build finished"
    );

    Ok(SquadBuild { picks, starter_ids, xi_score, total_spend: spent, shortfall })
}
