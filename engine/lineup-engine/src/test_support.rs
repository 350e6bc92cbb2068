//! Shared fixtures for unit and integration tests

use crate::types::{Candidate, CandidateId, Position, Roster};

pub fn priced(
    id: CandidateId,
    position: Position,
    price: f64,
    score: f64,
    club: Option<&str>,
) -> Candidate {
    let mut candidate = Candidate::new(id, format!("P{id}"), position, score).with_price(price);
    candidate.club = club.map(str::to_string);
    candidate
}

/// Squad candidates with ids 1-2 GK, 3-7 DEF, 8-12 MID, 13-15 FWD
pub fn squad_from(gk: [f64; 2], def: [f64; 5], mid: [f64; 5], fwd: [f64; 3]) -> Vec<Candidate> {
    let mut players = Vec::with_capacity(15);
    let mut id = 0;
    let groups: [(Position, &[f64]); 4] =
        [(Position::Gk, &gk), (Position::Def, &def), (Position::Mid, &mid), (Position::Fwd, &fwd)];
    for (position, scores) in groups {
        for (i, &score) in scores.iter().enumerate() {
            id += 1;
            players.push(
                Candidate::new(id, format!("{}{}", position.as_str(), i + 1), position, score)
                    .with_price(5.0),
            );
        }
    }
    players
}

pub fn roster_from(gk: [f64; 2], def: [f64; 5], mid: [f64; 5], fwd: [f64; 3]) -> Roster {
    Roster::new(squad_from(gk, def, mid, fwd)).expect("fixture roster is valid")
}

/// Midfield-heavy squad with distinct scores everywhere
pub fn standard_roster() -> Roster {
    roster_from(
        [4.5, 3.8],
        [5.5, 5.2, 5.0, 4.5, 4.0],
        [9.5, 9.2, 9.0, 8.8, 8.5],
        [7.0, 6.5, 6.0],
    )
}

/// A 36-player pool spread over eight clubs; its cheapest legal squad costs
/// a little under 80.
pub fn club_pool() -> Vec<Candidate> {
    const CLUBS: [&str; 8] = ["ARS", "AVL", "BHA", "CHE", "EVE", "LIV", "MCI", "TOT"];
    let layout = [
        (Position::Gk, 4, 4.0, 1.5),
        (Position::Def, 12, 4.0, 3.0),
        (Position::Mid, 12, 4.5, 8.0),
        (Position::Fwd, 8, 4.5, 7.0),
    ];

    let mut pool = Vec::new();
    let mut id: CandidateId = 0;
    for (position, n, floor, spread) in layout {
        for k in 0..n {
            id += 1;
            let price = round1(floor + spread * k as f64 / (n - 1) as f64);
            let score = round1(2.0 + price * 0.6 + ((id * 7) % 5) as f64 * 0.3);
            pool.push(priced(id, position, price, score, Some(CLUBS[id as usize % CLUBS.len()])));
        }
    }
    pool
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
