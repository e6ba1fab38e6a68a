//! Injury-risk prediction endpoints.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use courtside_core::risk::{assess, RiskAssessment, RiskInputs};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /predict_injury -- stateless scoring for one player.
///
/// Inputs arrive as query parameters with defaults, so the dashboard
/// can call this without building a body.
pub async fn predict_injury(
    State(state): State<AppState>,
    Query(inputs): Query<RiskInputs>,
) -> Json<RiskAssessment> {
    Json(assess(&inputs, state.clock.now()))
}

/// POST /predict_injury/bulk -- predictions for many players at once,
/// merge-cached.
///
/// A fresh cache covering every requested id is returned as-is. When
/// the cache is fresh but incomplete, only the missing ids are scored
/// and merged in; cached entries are reused, not recomputed. A stale
/// cache is rebuilt for the requested ids.
pub async fn predict_injury_bulk(
    State(state): State<AppState>,
    Json(player_ids): Json<Vec<i64>>,
) -> AppResult<Json<HashMap<i64, RiskAssessment>>> {
    let now = state.clock.now();

    if let Some(hit) = state.predictions.cached_subset(&player_ids, now).await {
        return Ok(Json(hit));
    }

    let existing = state.predictions.fresh_map(now).await.unwrap_or_default();
    let computed: HashMap<i64, RiskAssessment> = player_ids
        .iter()
        .filter(|id| !existing.contains_key(id))
        .map(|&id| (id, assess(&RiskInputs::for_player(id), now)))
        .collect();

    state.predictions.merge(computed.clone(), now).await;

    let response = player_ids
        .iter()
        .filter_map(|id| {
            existing
                .get(id)
                .or_else(|| computed.get(id))
                .map(|pred| (*id, pred.clone()))
        })
        .collect();
    Ok(Json(response))
}
