//! Cross-feed key reconciliation.
//!
//! The upstream feeds disagree on field naming: the roster CDN uses
//! `personId`/`id`, the stats tables use `PERSON_ID`/`PLAYER_ID`, and
//! team ids appear as `TEAM_ID`, `teamId`, or `team_id`. Everything here
//! folds those variants into one canonical integer id, tolerating values
//! delivered as numbers or numeric strings.

use serde_json::Value;

/// Field aliases tried, in order, when resolving a player id.
const PLAYER_ID_ALIASES: &[&str] = &["id", "personId", "PERSON_ID", "PLAYER_ID"];

/// Field aliases tried, in order, when resolving a team id.
const TEAM_ID_ALIASES: &[&str] = &["TEAM_ID", "teamId", "team_id"];

/// A record carried none of the known player-id aliases.
#[derive(Debug, thiserror::Error)]
#[error("record has no player id under any of {aliases:?}")]
pub struct ReconcileError {
    pub aliases: &'static [&'static str],
}

/// Resolve the canonical integer player id from a feed record.
///
/// Tries each alias in order and returns the first present, non-null
/// value. Callers are expected to catch the error, count the record as
/// skipped, and continue.
pub fn canonical_player_id(record: &Value) -> Result<i64, ReconcileError> {
    PLAYER_ID_ALIASES
        .iter()
        .find_map(|key| record.get(key).and_then(value_as_i64))
        .ok_or(ReconcileError {
            aliases: PLAYER_ID_ALIASES,
        })
}

/// Resolve the canonical team id from a feed record, if any.
///
/// A missing field or an id of `0` (the upstream's "no team" marker)
/// yields `None`.
pub fn canonical_team_id(record: &Value) -> Option<i64> {
    TEAM_ID_ALIASES
        .iter()
        .find_map(|key| record.get(key).and_then(value_as_i64))
        .filter(|&id| id != 0)
}

/// Parse an upstream `"F-I"` height string into `(feet, inches)`.
///
/// Anything that is not two integers joined by a single `-` yields
/// `(None, None)`; malformed heights are never an error.
pub fn parse_height(height: Option<&str>) -> (Option<i64>, Option<i64>) {
    let Some(raw) = height else {
        return (None, None);
    };
    let Some((feet, inches)) = raw.split_once('-') else {
        return (None, None);
    };
    match (feet.trim().parse(), inches.trim().parse()) {
        (Ok(f), Ok(i)) => (Some(f), Some(i)),
        _ => (None, None),
    }
}

/// Coerce a JSON value to an integer id.
///
/// The stats tables serve ids as numbers, occasionally as floats (a
/// tabular-export artifact), and the per-player endpoints as strings.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerce a JSON value to a float, accepting numeric strings.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Borrow a JSON value as a non-empty string.
pub fn value_as_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}
