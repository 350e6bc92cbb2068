//! Priority scoring
//!
//! Every stage ranks candidates by the same priority score; it is computed
//! here and nowhere else.

use crate::config::ScoringConfig;
use crate::types::Candidate;

/// A candidate paired with its priority score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<'a> {
    pub candidate: &'a Candidate,
    pub score: f64,
}

impl<'a> Scored<'a> {
    pub fn new(candidate: &'a Candidate, config: &ScoringConfig) -> Self {
        Self { candidate, score: priority_score(candidate, config) }
    }
}

/// Priority score of a candidate.
///
/// Without reliability weighting, or when the candidate carries no start
/// probability, this is the raw predicted score. Otherwise the prediction is
/// scaled by the start probability clamped to `[reliability_floor, 1]`.
/// Floors outside `[0, 1]` are rejected by [`ScoringConfig::validate`];
/// here they only saturate.
pub fn priority_score(candidate: &Candidate, config: &ScoringConfig) -> f64 {
    match candidate.start_probability {
        Some(p) if config.weight_by_reliability => {
            candidate.predicted_score * p.max(config.reliability_floor).min(1.0)
        }
        _ => candidate.predicted_score,
    }
}

/// Score a whole pool, preserving input order
pub fn score_all<'a>(candidates: &'a [Candidate], config: &ScoringConfig) -> Vec<Scored<'a>> {
    candidates.iter().map(|c| Scored::new(c, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn weighted() -> ScoringConfig {
        ScoringConfig { weight_by_reliability: true, reliability_floor: 0.6 }
    }

    #[test]
    fn test_unweighted_score_is_prediction() {
        let c = Candidate::new(1, "A", Position::Mid, 10.0).with_start_probability(0.2);
        assert_eq!(priority_score(&c, &ScoringConfig::default()), 10.0);
    }

    #[test]
    fn test_weighted_score_applies_floor() {
        let low = Candidate::new(1, "A", Position::Mid, 10.0).with_start_probability(0.55);
        let high = Candidate::new(2, "B", Position::Mid, 9.0).with_start_probability(0.95);
        assert!((priority_score(&low, &weighted()) - 6.0).abs() < 1e-12);
        assert!((priority_score(&high, &weighted()) - 8.55).abs() < 1e-12);
    }

    #[test]
    fn test_missing_probability_is_not_weighted() {
        let c = Candidate::new(1, "A", Position::Fwd, 7.5);
        assert_eq!(priority_score(&c, &weighted()), 7.5);
    }

    #[test]
    fn test_out_of_range_floor_saturates() {
        let c = Candidate::new(1, "A", Position::Mid, 10.0).with_start_probability(0.5);
        let config = ScoringConfig { weight_by_reliability: true, reliability_floor: 1.5 };
        assert_eq!(priority_score(&c, &config), 10.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_score_all_preserves_order() {
        let pool = vec![
            Candidate::new(3, "C", Position::Def, 1.0),
            Candidate::new(1, "A", Position::Def, 3.0),
        ];
        let scored = score_all(&pool, &ScoringConfig::default());
        assert_eq!(scored[0].candidate.id, 3);
        assert_eq!(scored[1].score, 3.0);
    }
}
