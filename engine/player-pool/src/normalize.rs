//! Column alias resolution and value normalization for raw pool rows

use crate::error::{PoolError, Result};
use crate::types::PoolRecord;
use lineup_engine::{CandidateId, Position};
use serde_json::{Map, Value};

// Accepted spellings per field, first match wins
const ID_KEYS: &[&str] = &["player_id", "element", "id"];
const NAME_KEYS: &[&str] = &["web_name", "player_name", "name", "second_name", "first_name"];
const CLUB_KEYS: &[&str] = &["team_name", "team", "club", "squad", "team_short"];
const POSITION_KEYS: &[&str] = &["position", "element_type", "pos"];
const PRICE_KEYS: &[&str] = &["now_cost", "price", "value", "cost"];
const SCORE_KEYS: &[&str] = &["pred_points", "predicted_score", "points"];
const START_KEYS: &[&str] = &["p_start", "start_probability"];
const DOUBTFUL_KEYS: &[&str] = &["doubtful", "availability_flag"];
const SECONDARY_KEYS: &[&str] = &["p90_last", "secondary_score"];
const GAMEWEEK_KEYS: &[&str] = &["gw", "gameweek", "round"];
const IN_SQUAD_KEYS: &[&str] = &["in_squad"];

/// Prices above this are in tenths of a million (e.g., `now_cost` 55 = 5.5)
pub const TENTHS_PRICE_THRESHOLD: f64 = 25.0;

fn lookup<'a>(row: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find(|value| !value.is_null() && value.as_str().map_or(true, |s| !s.trim().is_empty()))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number(index: usize, field: &'static str, value: &Value) -> Result<f64> {
    let invalid = || PoolError::InvalidNumber { index, field, value: render(value) };
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).ok_or_else(invalid)
}

fn whole_number(index: usize, field: &'static str, value: &Value) -> Result<u32> {
    let raw = number(index, field, value)?;
    if raw < 0.0 || raw.fract() != 0.0 || raw > f64::from(u32::MAX) {
        return Err(PoolError::InvalidNumber { index, field, value: render(value) });
    }
    Ok(raw as u32)
}

fn flag(index: usize, field: &'static str, value: &Value) -> Result<bool> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Some(true),
            "false" | "0" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| PoolError::InvalidFlag { index, field, value: render(value) })
}

/// Map a position code onto a position.
///
/// Accepts FPL `element_type` codes 1-4 and the usual text spellings.
pub fn parse_position(value: &Value) -> Option<Position> {
    match value {
        Value::Number(n) => match n.as_u64()? {
            1 => Some(Position::Gk),
            2 => Some(Position::Def),
            3 => Some(Position::Mid),
            4 => Some(Position::Fwd),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_uppercase().as_str() {
            "1" | "GK" | "GKP" | "G" | "GOALKEEPER" => Some(Position::Gk),
            "2" | "DEF" | "D" | "DF" | "DEFENDER" => Some(Position::Def),
            "3" | "MID" | "M" | "MF" | "MIDFIELDER" => Some(Position::Mid),
            "4" | "FWD" | "F" | "FW" | "ST" | "FORWARD" => Some(Position::Fwd),
            _ => None,
        },
        _ => None,
    }
}

/// Convert prices given in tenths to millions
pub fn normalize_price(raw: f64) -> f64 {
    if raw > TENTHS_PRICE_THRESHOLD {
        raw / 10.0
    } else {
        raw
    }
}

/// Normalize one raw row; `index` is its position in the file for error messages
pub fn normalize_row(index: usize, row: &Map<String, Value>) -> Result<PoolRecord> {
    let required = |keys: &[&str], field: &'static str| {
        lookup(row, keys).ok_or(PoolError::MissingField { index, field })
    };

    let id: CandidateId = whole_number(index, "player_id", required(ID_KEYS, "player_id")?)?;

    let position_value = required(POSITION_KEYS, "position")?;
    let position = parse_position(position_value)
        .ok_or_else(|| PoolError::UnknownPosition { index, value: render(position_value) })?;

    let predicted_score = number(index, "pred_points", required(SCORE_KEYS, "pred_points")?)?;

    let name = lookup(row, NAME_KEYS).map(render).unwrap_or_else(|| id.to_string());
    let club = lookup(row, CLUB_KEYS).map(render);

    let price = match lookup(row, PRICE_KEYS) {
        Some(v) => normalize_price(number(index, "price", v)?),
        None => 0.0,
    };
    let start_probability =
        lookup(row, START_KEYS).map(|v| number(index, "p_start", v)).transpose()?;
    let doubtful = match lookup(row, DOUBTFUL_KEYS) {
        Some(v) => flag(index, "doubtful", v)?,
        None => false,
    };
    let secondary_score =
        lookup(row, SECONDARY_KEYS).map(|v| number(index, "p90_last", v)).transpose()?;
    let gameweek = lookup(row, GAMEWEEK_KEYS).map(|v| whole_number(index, "gw", v)).transpose()?;
    let in_squad = lookup(row, IN_SQUAD_KEYS).map(|v| flag(index, "in_squad", v)).transpose()?;

    Ok(PoolRecord {
        id,
        name,
        club,
        position,
        price,
        predicted_score,
        start_probability,
        doubtful,
        secondary_score,
        gameweek,
        in_squad,
    })
}
