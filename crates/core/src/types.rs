//! Shared domain types.
//!
//! Typed views over the row-oriented upstream payloads. Each `from_*`
//! constructor takes the loosely-shaped JSON record a feed delivered and
//! produces a fixed-shape struct; unknown or malformed fields degrade to
//! `None` rather than failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reconcile::{
    canonical_player_id, canonical_team_id, parse_height, value_as_f64, value_as_i64,
    value_as_str, ReconcileError,
};

/// One player from the bulk roster feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub team_id: Option<i64>,
    pub position: Option<String>,
}

impl PlayerRecord {
    /// Build from a roster-feed record. The CDN feed camelCases its
    /// fields; the fallback static list snake_cases them.
    pub fn from_roster_value(record: &Value) -> Result<Self, ReconcileError> {
        let id = canonical_player_id(record)?;
        Ok(Self {
            id,
            first_name: string_field(record, &["firstName", "first_name"]),
            last_name: string_field(record, &["lastName", "last_name"]),
            is_active: bool_field(record, &["isActive", "is_active"]),
            team_id: canonical_team_id(record),
            position: string_field(record, &["pos", "position"]),
        })
    }

    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
    }
}

/// Static team lookup entry: id plus both display forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: i64,
    pub abbreviation: String,
    pub full_name: String,
}

/// Per-game season averages from the league stat table.
///
/// Counting stats default to zero for players without a stat row;
/// percentages and minutes stay `None` so the caller can tell "didn't
/// play" apart from "shot 0%".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonAverages {
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub fg_pct: Option<f64>,
    pub fg3_pct: Option<f64>,
    pub ft_pct: Option<f64>,
    pub min: Option<f64>,
}

impl SeasonAverages {
    pub fn from_stats_row(row: &Value) -> Self {
        let num = |key: &str| row.get(key).and_then(value_as_f64);
        Self {
            pts: num("PTS").unwrap_or(0.0),
            reb: num("REB").unwrap_or(0.0),
            ast: num("AST").unwrap_or(0.0),
            stl: num("STL").unwrap_or(0.0),
            blk: num("BLK").unwrap_or(0.0),
            fg_pct: num("FG_PCT"),
            fg3_pct: num("FG3_PCT"),
            ft_pct: num("FT_PCT"),
            min: num("MIN"),
        }
    }
}

/// A player's current entry on the league injury report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjuryStatus {
    pub injury_type: Option<String>,
    pub status: Option<String>,
}

impl InjuryStatus {
    pub fn from_report_row(row: &Value) -> Self {
        Self {
            injury_type: string_field(row, &["INJURY_DESC", "DESCRIPTION"]),
            status: string_field(row, &["STATUS", "INJURY_STATUS"]),
        }
    }
}

/// Height and weight from the per-player info endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerBio {
    pub height_feet: Option<i64>,
    pub height_inches: Option<i64>,
    pub weight_pounds: Option<i64>,
}

impl PlayerBio {
    pub fn from_info_row(row: &Value) -> Self {
        let (height_feet, height_inches) =
            parse_height(row.get("HEIGHT").and_then(value_as_str));
        let weight_pounds = row
            .get("WEIGHT")
            .and_then(value_as_i64)
            .filter(|&w| w != 0);
        Self {
            height_feet,
            height_inches,
            weight_pounds,
        }
    }
}

/// The unit of output of the summary pipeline: one roster player fused
/// with stats, team, and injury data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: i64,
    pub full_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub team_id: Option<i64>,
    pub team_abbreviation: Option<String>,
    pub team_full_name: Option<String>,
    pub position: Option<String>,
    pub height_feet: Option<i64>,
    pub height_inches: Option<i64>,
    pub weight_pounds: Option<i64>,
    pub headshot_url: String,
    pub season_averages: SeasonAverages,
    pub current_injury: Option<InjuryStatus>,
}

/// The league headshot CDN URL is a pure function of the player id.
pub fn headshot_url(player_id: i64) -> String {
    format!("https://cdn.nba.com/headshots/nba/latest/1040x760/{player_id}.png")
}

/// One attempt from the shot-chart feed. Field names mirror the
/// upstream columns except `made`, which replaces the raw
/// `SHOT_MADE_FLAG` integer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotRecord {
    #[serde(rename = "LOC_X")]
    pub loc_x: Option<f64>,
    #[serde(rename = "LOC_Y")]
    pub loc_y: Option<f64>,
    #[serde(rename = "SHOT_DISTANCE")]
    pub shot_distance: Option<f64>,
    #[serde(rename = "ACTION_TYPE")]
    pub action_type: Option<String>,
    #[serde(rename = "SHOT_TYPE")]
    pub shot_type: Option<String>,
    pub made: bool,
}

impl ShotRecord {
    pub fn from_row(row: &Value) -> Self {
        let num = |key: &str| row.get(key).and_then(value_as_f64);
        Self {
            loc_x: num("LOC_X"),
            loc_y: num("LOC_Y"),
            shot_distance: num("SHOT_DISTANCE"),
            action_type: string_field(row, &["ACTION_TYPE"]),
            shot_type: string_field(row, &["SHOT_TYPE"]),
            made: row
                .get("SHOT_MADE_FLAG")
                .and_then(value_as_i64)
                .unwrap_or(0)
                != 0,
        }
    }
}

fn string_field(record: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|key| record.get(key).and_then(value_as_str))
        .map(str::to_owned)
}

fn bool_field(record: &Value, aliases: &[&str]) -> bool {
    aliases
        .iter()
        .find_map(|key| record.get(key).and_then(Value::as_bool))
        .unwrap_or(false)
}
