//! Per-player endpoints: info, career, injury history, gamelog, and the
//! season-fallback shot chart.

use axum::extract::{Path, Query, State};
use axum::Json;
use courtside_core::reconcile::{canonical_player_id, value_as_i64};
use courtside_core::season::{previous_season, season_for_instant};
use courtside_core::types::{PlayerBio, ShotRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppResult;
use crate::state::AppState;

/// Columns projected out of a raw gamelog row.
const GAMELOG_COLUMNS: &[&str] = &[
    "GAME_DATE",
    "MATCHUP",
    "PTS",
    "REB",
    "AST",
    "STL",
    "BLK",
    "PLUS_MINUS",
];

#[derive(Debug, Serialize)]
pub struct PlayerInfoResponse {
    pub player_id: i64,
    #[serde(flatten)]
    pub bio: PlayerBio,
}

#[derive(Debug, Serialize)]
pub struct InjuryHistoryResponse {
    pub player_id: i64,
    pub injuries: Vec<InjuryEvent>,
}

/// One event from the league injury report, renamed for the dashboard.
#[derive(Debug, Serialize)]
pub struct InjuryEvent {
    pub date: Option<String>,
    pub injury_type: Option<String>,
    pub games_missed: i64,
    pub severity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GamelogQuery {
    /// Season string (default: current season).
    pub season: Option<String>,
    /// How many most-recent games to return.
    #[serde(default = "default_last_n")]
    pub last_n: usize,
}

#[derive(Debug, Serialize)]
pub struct GamelogResponse {
    pub player_id: i64,
    pub games: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ShotChartQuery {
    pub season: Option<String>,
}

fn default_last_n() -> usize {
    10
}

/// GET /player/{id}/info -- height and weight for a single player.
pub async fn get_player_info(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> AppResult<Json<PlayerInfoResponse>> {
    let row = state.feeds.player_info(player_id).await?;
    Ok(Json(PlayerInfoResponse {
        player_id,
        bio: PlayerBio::from_info_row(&row),
    }))
}

/// GET /player/{id}/career -- raw career stat payload, untouched.
pub async fn get_player_career(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.feeds.player_career(player_id).await?))
}

/// GET /player/{id}/injury-history -- this player's rows from the
/// league injury report. An unreachable report degrades to an empty
/// list, never an error.
pub async fn get_injury_history(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
) -> Json<InjuryHistoryResponse> {
    let rows = match state.feeds.injury_report().await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!(player_id, error = %err, "Injury report unavailable");
            Vec::new()
        }
    };

    let injuries = rows
        .iter()
        .filter(|row| canonical_player_id(row).ok() == Some(player_id))
        .map(|row| InjuryEvent {
            date: string_column(row, &["GAME_DATE"]),
            injury_type: string_column(row, &["INJURY_DESC", "DESCRIPTION"]),
            games_missed: row
                .get("GAMES_MISSED")
                .and_then(value_as_i64)
                .unwrap_or(0),
            severity: string_column(row, &["STATUS", "INJURY_STATUS"]),
        })
        .collect();

    Json(InjuryHistoryResponse {
        player_id,
        injuries,
    })
}

/// GET /player/{id}/gamelog -- the last N games with basic statistics.
pub async fn get_gamelog(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
    Query(query): Query<GamelogQuery>,
) -> AppResult<Json<GamelogResponse>> {
    let season = query
        .season
        .unwrap_or_else(|| season_for_instant(state.clock.now()));
    let rows = state.feeds.player_gamelog(player_id, &season).await?;

    let games = rows
        .iter()
        .take(query.last_n)
        .map(|row| project_columns(row, GAMELOG_COLUMNS))
        .collect();

    Ok(Json(GamelogResponse { player_id, games }))
}

/// GET /player/{id}/shotchart -- cached shot coordinates with a
/// three-step season fallback.
///
/// Fallback order is deliberate and preserved from the observed feed
/// behavior: requested (or current) season first; if that errors or
/// comes back empty, the previous season; if the feed errored both
/// times, an unconstrained query letting the upstream pick its default.
/// Only when every step fails or is empty does the response degrade to
/// an empty array.
pub async fn get_shot_chart(
    State(state): State<AppState>,
    Path(player_id): Path<i64>,
    Query(query): Query<ShotChartQuery>,
) -> Json<Vec<ShotRecord>> {
    let season = query
        .season
        .unwrap_or_else(|| season_for_instant(state.clock.now()));
    let now = state.clock.now();

    if let Some(cached) = state.shot_charts.get(player_id, &season, now).await {
        return Json(cached);
    }

    let mut rows = try_shot_fetch(&state, player_id, Some(&season)).await;

    if rows.as_ref().is_none_or(|r| r.is_empty()) {
        if let Some(prev) = previous_season(&season) {
            rows = try_shot_fetch(&state, player_id, Some(&prev)).await;
        }
    }
    if rows.is_none() {
        rows = try_shot_fetch(&state, player_id, None).await;
    }

    let shots: Vec<ShotRecord> = rows
        .unwrap_or_default()
        .iter()
        .map(ShotRecord::from_row)
        .collect();

    state
        .shot_charts
        .insert(player_id, &season, shots.clone(), now)
        .await;
    Json(shots)
}

/// One shot-chart attempt; errors degrade to `None` so the fallback
/// chain can continue.
async fn try_shot_fetch(
    state: &AppState,
    player_id: i64,
    season: Option<&str>,
) -> Option<Vec<Value>> {
    match state.feeds.shot_chart(player_id, season).await {
        Ok(rows) => Some(rows),
        Err(err) => {
            tracing::warn!(player_id, ?season, error = %err, "Shot chart fetch failed");
            None
        }
    }
}

fn string_column(row: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|key| row.get(key).and_then(Value::as_str))
        .map(str::to_owned)
}

/// Project a raw row down to the named columns, keeping upstream
/// column names. Missing columns become nulls.
fn project_columns(row: &Value, columns: &[&str]) -> Value {
    let mut projected = Map::new();
    for &column in columns {
        projected.insert(
            column.to_string(),
            row.get(column).cloned().unwrap_or(Value::Null),
        );
    }
    Value::Object(projected)
}
