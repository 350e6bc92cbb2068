//! Formations and the formation evaluator

use crate::error::{LineupError, Result};
use crate::types::{Position, PositionCounts};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Outfield shape of a starting XI (one goalkeeper is implied)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Formation {
    def: u32,
    mid: u32,
    fwd: u32,
}

/// Allowed formations in tie-break order. Earlier entries win exact ties.
pub const CANONICAL_FORMATIONS: [Formation; 7] = [
    Formation::canonical(3, 4, 3),
    Formation::canonical(3, 5, 2),
    Formation::canonical(4, 4, 2),
    Formation::canonical(4, 3, 3),
    Formation::canonical(4, 5, 1),
    Formation::canonical(5, 3, 2),
    Formation::canonical(5, 4, 1),
];

impl Formation {
    const fn canonical(def: u32, mid: u32, fwd: u32) -> Self {
        Self { def, mid, fwd }
    }

    /// Look up a canonical formation by its outfield counts
    pub fn from_counts(def: u32, mid: u32, fwd: u32) -> Result<Self> {
        let candidate = Self { def, mid, fwd };
        if CANONICAL_FORMATIONS.contains(&candidate) {
            Ok(candidate)
        } else {
            Err(LineupError::UnknownFormation(candidate.to_string()))
        }
    }

    pub fn def(&self) -> u32 {
        self.def
    }

    pub fn mid(&self) -> u32 {
        self.mid
    }

    pub fn fwd(&self) -> u32 {
        self.fwd
    }

    /// Starters required at `position`
    pub fn count(&self, position: Position) -> u32 {
        match position {
            Position::Gk => 1,
            Position::Def => self.def,
            Position::Mid => self.mid,
            Position::Fwd => self.fwd,
        }
    }

    /// Position counts of the full starting XI
    pub fn starting_counts(&self) -> PositionCounts {
        PositionCounts::new(1, self.def, self.mid, self.fwd)
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.def, self.mid, self.fwd)
    }
}

impl FromStr for Formation {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self> {
        let unknown = || LineupError::UnknownFormation(s.to_string());
        let parts: Vec<u32> = s
            .trim()
            .split('-')
            .map(|part| part.trim().parse::<u32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| unknown())?;

        match parts.as_slice() {
            [def, mid, fwd] => Self::from_counts(*def, *mid, *fwd).map_err(|_| unknown()),
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for Formation {
    type Error = LineupError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Formation> for String {
    fn from(formation: Formation) -> Self {
        formation.to_string()
    }
}

/// Score recorded for one formation; `None` means infeasible
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormationScore {
    pub formation: Formation,
    pub score: Option<f64>,
}

impl FormationScore {
    /// Score with infeasible formations mapped to negative infinity
    pub fn value(&self) -> f64 {
        self.score.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn is_feasible(&self) -> bool {
        self.score.is_some()
    }
}

/// Winner of a formation evaluation plus the full diagnostic score list
#[derive(Debug, Clone)]
pub struct FormationEvaluation<T> {
    pub formation: Formation,
    pub score: f64,
    pub outcome: T,
    pub scores: Vec<FormationScore>,
}

/// Try every formation in order and keep the strictly best one.
///
/// `evaluate` returns `Ok(None)` when a formation is infeasible. Exact ties
/// keep the earlier formation. Errors from `evaluate` abort the evaluation.
pub fn evaluate_formations<T, F>(
    formations: &[Formation],
    mut evaluate: F,
) -> Result<FormationEvaluation<T>>
where
    F: FnMut(Formation) -> Result<Option<(f64, T)>>,
{
    let mut scores = Vec::with_capacity(formations.len());
    let mut best: Option<(Formation, f64, T)> = None;

    for &formation in formations {
        let result = evaluate(formation)?;
        let score = result.as_ref().map(|(score, _)| *score);
        debug!(formation = %formation, score = ?score, "Evaluated formation");
        scores.push(FormationScore { formation, score });

        if let Some((score, outcome)) = result {
            let improves = match &best {
                None => true,
                Some((_, best_score, _)) => score > *best_score,
            };
            if improves {
                best = Some((formation, score, outcome));
            }
        }
    }

    match best {
        Some((formation, score, outcome)) => {
            Ok(FormationEvaluation { formation, score, outcome, scores })
        }
        None => Err(LineupError::NoFeasibleFormation { tried: formations.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_formations_fill_ten_outfield_slots() {
        for formation in CANONICAL_FORMATIONS {
            assert_eq!(formation.def() + formation.mid() + formation.fwd(), 10);
            assert_eq!(formation.starting_counts().total(), 11);
        }
    }

    #[test]
    fn test_parse_and_display() {
        let formation: Formation = "3-5-2".parse().unwrap();
        assert_eq!(formation.mid(), 5);
        assert_eq!(formation.to_string(), "3-5-2");
        assert_eq!(" 4-4-2 ".parse::<Formation>().unwrap().to_string(), "4-4-2");

        assert!(matches!("2-5-3".parse::<Formation>(), Err(LineupError::UnknownFormation(_))));
        assert!(matches!("4-4".parse::<Formation>(), Err(LineupError::UnknownFormation(_))));
        assert!(matches!("a-b-c".parse::<Formation>(), Err(LineupError::UnknownFormation(_))));
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&CANONICAL_FORMATIONS[3]).unwrap();
        assert_eq!(json, "\"4-3-3\"");
        let back: Formation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CANONICAL_FORMATIONS[3]);
        assert!(serde_json::from_str::<Formation>("\"6-2-2\"").is_err());
    }

    #[test]
    fn test_evaluator_prefers_strictly_greater_score() {
        let result = evaluate_formations(&CANONICAL_FORMATIONS, |f| {
            Ok(Some((f.mid() as f64, f.to_string())))
        })
        .unwrap();
        // 3-5-2 and 4-5-1 both score 5; the earlier one wins
        assert_eq!(result.formation.to_string(), "3-5-2");
        assert_eq!(result.outcome, "3-5-2");
        assert_eq!(result.scores.len(), 7);
    }

    #[test]
    fn test_evaluator_records_infeasible_formations() {
        let result = evaluate_formations(&CANONICAL_FORMATIONS, |f| {
            Ok((f.def() == 5).then(|| (1.0, ())))
        })
        .unwrap();
        assert_eq!(result.formation.to_string(), "5-3-2");
        assert_eq!(result.scores[0].value(), f64::NEG_INFINITY);
        assert!(!result.scores[0].is_feasible());
        assert_eq!(result.scores.iter().filter(|s| s.is_feasible()).count(), 2);
    }

    #[test]
    fn test_evaluator_fails_when_nothing_is_feasible() {
        let result = evaluate_formations::<(), _>(&CANONICAL_FORMATIONS, |_| Ok(None));
        assert_eq!(result.unwrap_err(), LineupError::NoFeasibleFormation { tried: 7 });
    }
}
