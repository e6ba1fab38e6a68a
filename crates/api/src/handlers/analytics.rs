//! League analytics endpoints.

use axum::extract::State;
use axum::Json;
use courtside_core::analytics::{factor_scores, FactorScores};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /analytics/league-trends -- league-wide injury trend snapshot.
///
/// Static editorial data; none of the feeds expose trend aggregates.
pub async fn league_trends() -> Json<Value> {
    Json(json!({
        "average_injury_rate": 0.285,
        "trending_up": ["Ankle injuries", "Load management"],
        "trending_down": ["ACL tears", "Concussions"],
        "high_risk_positions": ["C", "PF"],
        "seasonal_trends": {
            "early_season": 0.22,
            "mid_season": 0.31,
            "late_season": 0.38,
            "playoffs": 0.28,
        },
        "team_injury_rates": {
            "LAL": 0.24,
            "GSW": 0.29,
            "MIL": 0.21,
            "BOS": 0.26,
            "PHX": 0.33,
        },
    }))
}

/// GET /analytics/factors -- aggregate 0-100 factor scores for the
/// radar chart, folded from whatever bulk predictions are cached.
/// Neutral midpoints when nothing is cached yet, so the UI still
/// renders.
pub async fn get_factor_scores(State(state): State<AppState>) -> Json<FactorScores> {
    let predictions = state.predictions.snapshot().await;
    Json(factor_scores(predictions.values()))
}
