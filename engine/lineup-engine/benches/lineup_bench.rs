use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lineup_engine::{Candidate, LineupEngine, Position, SelectionConfig};

const CLUBS: [&str; 20] = [
    "ARS", "AVL", "BOU", "BRE", "BHA", "BUR", "CHE", "CRY", "EVE", "FUL", "LEE", "LIV", "MCI",
    "MUN", "NEW", "NFO", "SUN", "TOT", "WHU", "WOL",
];

fn pool(size: u32) -> Vec<Candidate> {
    (1..=size)
        .map(|id| {
            let position = match id % 10 {
                0 => Position::Gk,
                1..=3 => Position::Def,
                4..=7 => Position::Mid,
                _ => Position::Fwd,
            };
            let price = 4.0 + f64::from((id * 37) % 90) / 10.0;
            let score = price * 0.5 + f64::from((id * 13) % 7);
            Candidate::new(id, format!("Player {id}"), position, score)
                .with_price(price)
                .with_club(CLUBS[(id % 20) as usize])
                .with_start_probability(0.5 + f64::from(id % 6) / 10.0)
        })
        .collect()
}

fn squad() -> Vec<Candidate> {
    let layout = [(Position::Gk, 2), (Position::Def, 5), (Position::Mid, 5), (Position::Fwd, 3)];
    let mut players = Vec::with_capacity(15);
    let mut id = 0;
    for (position, n) in layout {
        for k in 0..n {
            id += 1;
            players.push(Candidate::new(id, format!("Player {id}"), position, 3.0 + f64::from(k)));
        }
    }
    players
}

fn bench_pick_lineup(c: &mut Criterion) {
    let engine = LineupEngine::new(SelectionConfig::default()).unwrap();
    let squad = squad();

    c.bench_function("pick_lineup", |b| {
        b.iter(|| {
            black_box(engine.pick_lineup(black_box(&squad))).unwrap();
        });
    });
}

fn bench_build_squad(c: &mut Criterion) {
    let engine = LineupEngine::new(SelectionConfig::default()).unwrap();
    let pool = pool(600);

    c.bench_function("build_squad_600", |b| {
        b.iter(|| {
            black_box(engine.build_squad(black_box(&pool))).unwrap();
        });
    });
}

fn bench_plan_squad(c: &mut Criterion) {
    let engine = LineupEngine::new(SelectionConfig::default()).unwrap();
    let pool = pool(600);

    c.bench_function("plan_squad_600", |b| {
        b.iter(|| {
            black_box(engine.plan_squad(black_box(&pool))).unwrap();
        });
    });
}

criterion_group!(benches, bench_pick_lineup, bench_build_squad, bench_plan_squad);
criterion_main!(benches);
