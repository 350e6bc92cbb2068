//! Substitute ordering

use crate::config::BenchConfig;
use crate::error::{LineupError, Result};
use crate::ordering::bench_order;
use crate::scoring::Scored;
use crate::BENCH_OUTFIELD_SIZE;

/// Score used for substitute priority; doubtful players are discounted
/// when a penalty is configured.
pub fn bench_score(entry: &Scored<'_>, config: &BenchConfig) -> f64 {
    if entry.candidate.doubtful && config.doubtful_penalty > 0.0 {
        entry.score * (1.0 - config.doubtful_penalty)
    } else {
        entry.score
    }
}

/// Order the outfield substitutes and keep the first three (B1..B3).
///
/// Only the order of the given set changes; membership of the XI is decided
/// before this runs.
pub fn order_bench<'a>(pool: &[Scored<'a>], config: &BenchConfig) -> Result<Vec<Scored<'a>>> {
    config.validate()?;
    if pool.len() < BENCH_OUTFIELD_SIZE {
        return Err(LineupError::BenchShortfall {
            required: BENCH_OUTFIELD_SIZE,
            available: pool.len(),
        });
    }

    let mut entries: Vec<(Scored<'a>, f64)> =
        pool.iter().map(|entry| (*entry, bench_score(entry, config))).collect();
    entries.sort_by(bench_order);

    Ok(entries.into_iter().take(BENCH_OUTFIELD_SIZE).map(|(entry, _)| entry).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::types::{Candidate, Position};

    fn ids(entries: &[Scored<'_>]) -> Vec<u32> {
        entries.iter().map(|e| e.candidate.id).collect()
    }

    fn bench_pool() -> Vec<Candidate> {
        vec![
            Candidate::new(1, "Doubt", Position::Mid, 5.0).with_doubtful(true),
            Candidate::new(2, "Fit", Position::Def, 4.0),
            Candidate::new(3, "Spare", Position::Fwd, 3.0),
        ]
    }

    #[test]
    fn test_no_penalty_orders_by_score() {
        let pool = bench_pool();
        let scored: Vec<_> = pool.iter().map(|c| Scored::new(c, &ScoringConfig::default())).collect();
        let order = order_bench(&scored, &BenchConfig::default()).unwrap();
        assert_eq!(ids(&order), vec![1, 2, 3]);
    }

    #[test]
    fn test_doubtful_penalty_demotes() {
        let pool = bench_pool();
        let scored: Vec<_> = pool.iter().map(|c| Scored::new(c, &ScoringConfig::default())).collect();
        let order = order_bench(&scored, &BenchConfig { doubtful_penalty: 0.5 }).unwrap();
        // 5.0 * 0.5 = 2.5 drops below both fit players
        assert_eq!(ids(&order), vec![2, 3, 1]);
    }

    #[test]
    fn test_bench_score() {
        let c = Candidate::new(1, "A", Position::Mid, 8.0).with_doubtful(true);
        let entry = Scored::new(&c, &ScoringConfig::default());
        assert_eq!(bench_score(&entry, &BenchConfig { doubtful_penalty: 0.25 }), 6.0);
        assert_eq!(bench_score(&entry, &BenchConfig::default()), 8.0);
    }

    #[test]
    fn test_too_few_substitutes() {
        let pool = bench_pool();
        let scored: Vec<_> =
            pool.iter().take(2).map(|c| Scored::new(c, &ScoringConfig::default())).collect();
        assert_eq!(
            order_bench(&scored, &BenchConfig::default()),
            Err(LineupError::BenchShortfall { required: 3, available: 2 })
        );
    }
}
