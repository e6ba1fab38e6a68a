//! Handlers for the roster endpoints: `/players`, `/players/detailed`,
//! and the cached `/players/summary` pipeline.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use courtside_core::reconcile::canonical_player_id;
use courtside_core::types::{InjuryStatus, PlayerBio, PlayerRecord, PlayerSummary};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for `/players`.
#[derive(Debug, Deserialize)]
pub struct PlayersQuery {
    /// Restrict to active players (default: true).
    #[serde(default = "default_true")]
    pub active_only: bool,
    /// Truncate the list; 0 means no limit.
    #[serde(default)]
    pub limit: usize,
}

/// Query parameters for `/players/detailed`.
#[derive(Debug, Deserialize)]
pub struct DetailedQuery {
    #[serde(default = "default_true")]
    pub active_only: bool,
    /// Per-player enrichment is expensive, so the default is bounded.
    #[serde(default = "default_detailed_limit")]
    pub limit: usize,
}

/// Query parameters for `/players/summary`.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Bypass both cache tiers and rebuild.
    #[serde(default)]
    pub force: bool,
    /// Season string like `2024-25` (default: current season).
    pub season: Option<String>,
}

/// A roster record enriched with bio and injury data.
#[derive(Debug, Serialize)]
pub struct DetailedPlayer {
    #[serde(flatten)]
    pub player: PlayerRecord,
    #[serde(flatten)]
    pub bio: PlayerBio,
    pub current_injury: Option<InjuryStatus>,
}

fn default_true() -> bool {
    true
}

fn default_detailed_limit() -> usize {
    500
}

/// GET /players -- roster pass-through.
pub async fn list_players(
    State(state): State<AppState>,
    Query(query): Query<PlayersQuery>,
) -> AppResult<Json<Vec<PlayerRecord>>> {
    let roster = state.feeds.active_roster().await?;
    let mut players: Vec<PlayerRecord> = roster
        .iter()
        .filter_map(|record| PlayerRecord::from_roster_value(record).ok())
        .filter(|player| !query.active_only || player.is_active)
        .collect();
    if query.limit > 0 {
        players.truncate(query.limit);
    }
    Ok(Json(players))
}

/// GET /players/detailed -- roster plus height/weight and injury status.
///
/// The injury report is fetched once and joined by canonical id; a
/// failed report degrades to "no injuries". Each player then gets a bio
/// lookup, with individual failures degrading to empty bio fields.
pub async fn list_players_detailed(
    State(state): State<AppState>,
    Query(query): Query<DetailedQuery>,
) -> AppResult<Json<Vec<DetailedPlayer>>> {
    let roster = state.feeds.active_roster().await?;
    let mut players: Vec<PlayerRecord> = roster
        .iter()
        .filter_map(|record| PlayerRecord::from_roster_value(record).ok())
        .filter(|player| !query.active_only || player.is_active)
        .collect();
    players.truncate(query.limit);

    let injuries: HashMap<i64, InjuryStatus> = match state.feeds.injury_report().await {
        Ok(rows) => rows
            .iter()
            .filter_map(|row| {
                canonical_player_id(row)
                    .ok()
                    .map(|id| (id, InjuryStatus::from_report_row(row)))
            })
            .collect(),
        Err(err) => {
            tracing::warn!(error = %err, "Injury report unavailable for detailed listing");
            HashMap::new()
        }
    };

    let mut detailed = Vec::with_capacity(players.len());
    for player in players {
        let bio = match state.feeds.player_info(player.id).await {
            Ok(row) => PlayerBio::from_info_row(&row),
            Err(err) => {
                tracing::warn!(player_id = player.id, error = %err, "Bio lookup failed");
                PlayerBio::from_info_row(&serde_json::Value::Null)
            }
        };
        let current_injury = injuries.get(&player.id).cloned();
        detailed.push(DetailedPlayer {
            player,
            bio,
            current_injury,
        });
    }
    Ok(Json(detailed))
}

/// GET /players/summary -- the cached fused-summary pipeline.
pub async fn players_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<Vec<PlayerSummary>>> {
    let summaries = state
        .summary
        .get(query.season.as_deref(), query.force)
        .await?;
    Ok(Json(summaries.as_ref().clone()))
}
