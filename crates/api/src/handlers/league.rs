//! League-level pass-through endpoints: teams and scoreboard.

use axum::extract::{Query, State};
use axum::Json;
use courtside_core::types::TeamInfo;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreboardQuery {
    /// `YYYY-MM-DD`; omitted means today's board.
    pub game_date: Option<String>,
}

/// GET /teams -- the league team table.
pub async fn list_teams(State(state): State<AppState>) -> AppResult<Json<Vec<TeamInfo>>> {
    Ok(Json(state.feeds.teams().await?))
}

/// GET /scoreboard -- raw scoreboard payload pass-through.
pub async fn get_scoreboard(
    State(state): State<AppState>,
    Query(query): Query<ScoreboardQuery>,
) -> AppResult<Json<Value>> {
    let board = state.feeds.scoreboard(query.game_date.as_deref()).await?;
    Ok(Json(board))
}
