//! Deterministic tie-break comparators

use crate::scoring::Scored;
use std::cmp::Ordering;

/// Selection priority: score desc, secondary metric desc (missing last),
/// price desc, id asc.
pub fn priority_order(a: &Scored<'_>, b: &Scored<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| cmp_secondary(a, b))
        .then_with(|| b.candidate.price.total_cmp(&a.candidate.price))
        .then_with(|| a.candidate.id.cmp(&b.candidate.id))
}

fn cmp_secondary(a: &Scored<'_>, b: &Scored<'_>) -> Ordering {
    match (a.candidate.secondary_score, b.candidate.secondary_score) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort scored candidates into selection priority order
pub fn sort_by_priority(scored: &mut [Scored<'_>]) {
    scored.sort_by(priority_order);
}

/// Substitute order: bench score desc, start probability desc, price desc,
/// name asc. Ids are the final key so distinct players never compare equal.
pub fn bench_order(a: &(Scored<'_>, f64), b: &(Scored<'_>, f64)) -> Ordering {
    let (sa, bench_a) = a;
    let (sb, bench_b) = b;
    bench_b
        .total_cmp(bench_a)
        .then_with(|| {
            sb.candidate
                .effective_start_probability()
                .total_cmp(&sa.candidate.effective_start_probability())
        })
        .then_with(|| sb.candidate.price.total_cmp(&sa.candidate.price))
        .then_with(|| sa.candidate.name.cmp(&sb.candidate.name))
        .then_with(|| sa.candidate.id.cmp(&sb.candidate.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::types::{Candidate, Position};

    fn ids(scored: &[Scored<'_>]) -> Vec<u32> {
        scored.iter().map(|s| s.candidate.id).collect()
    }

    #[test]
    fn test_priority_order_keys() {
        let pool = vec![
            Candidate::new(5, "E", Position::Mid, 6.0).with_price(5.0),
            Candidate::new(4, "D", Position::Mid, 6.0).with_price(5.0),
            Candidate::new(3, "C", Position::Mid, 6.0).with_price(7.0),
            Candidate::new(2, "B", Position::Mid, 6.0).with_price(4.0).with_secondary_score(2.0),
            Candidate::new(1, "A", Position::Mid, 8.0).with_price(4.0),
        ];
        let config = ScoringConfig::default();
        let mut scored: Vec<_> = pool.iter().map(|c| Scored::new(c, &config)).collect();
        sort_by_priority(&mut scored);

        // score, then secondary, then price, then id
        assert_eq!(ids(&scored), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_bench_order_keys() {
        let pool = vec![
            Candidate::new(1, "Zed", Position::Def, 4.0).with_price(4.0),
            Candidate::new(2, "Amy", Position::Def, 4.0).with_price(4.0),
            Candidate::new(3, "Bob", Position::Def, 4.0).with_price(4.5),
            Candidate::new(4, "Cat", Position::Def, 4.0).with_start_probability(1.0),
            Candidate::new(5, "Dan", Position::Def, 4.0).with_start_probability(0.7),
        ];
        let config = ScoringConfig::default();
        let mut entries: Vec<_> = pool
            .iter()
            .map(|c| {
                let s = Scored::new(c, &config);
                (s, s.score)
            })
            .collect();
        entries.sort_by(bench_order);
        let order: Vec<_> = entries.iter().map(|(s, _)| s.candidate.id).collect();

        // Equal bench scores: probability, then price, then name
        assert_eq!(order, vec![3, 2, 1, 4, 5]);
    }
}
