pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /players                          active roster
/// /players/detailed                 roster + bio + injury status
/// /players/summary                  full season summary (cached)
/// /teams                            static franchise table
///
/// /player/{id}/info                 bio for one player
/// /player/{id}/career               raw career totals payload
/// /player/{id}/injury-history       past injury report entries
/// /player/{id}/gamelog              recent game log
/// /player/{id}/shotchart            shot locations (cached, with fallback)
///
/// /predict_injury                   single risk assessment (POST)
/// /predict_injury/bulk              batched risk assessments (POST)
///
/// /weather/{city}                   current conditions near an arena
/// /scoreboard                       today's (or a given date's) games
///
/// /analytics/league-trends          league-wide injury trend payload
/// /analytics/factors                averaged contributing-factor scores
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // -- Roster ------------------------------------------------------
        .route("/players", get(handlers::players::list_players))
        .route(
            "/players/detailed",
            get(handlers::players::list_players_detailed),
        )
        .route("/players/summary", get(handlers::players::players_summary))
        .route("/teams", get(handlers::league::list_teams))
        // -- Per-player --------------------------------------------------
        .route("/player/{id}/info", get(handlers::player::get_player_info))
        .route(
            "/player/{id}/career",
            get(handlers::player::get_player_career),
        )
        .route(
            "/player/{id}/injury-history",
            get(handlers::player::get_injury_history),
        )
        .route("/player/{id}/gamelog", get(handlers::player::get_gamelog))
        .route(
            "/player/{id}/shotchart",
            get(handlers::player::get_shot_chart),
        )
        // -- Predictions -------------------------------------------------
        .route(
            "/predict_injury",
            post(handlers::predictions::predict_injury),
        )
        .route(
            "/predict_injury/bulk",
            post(handlers::predictions::predict_injury_bulk),
        )
        // -- Context feeds -----------------------------------------------
        .route("/weather/{city}", get(handlers::weather::get_weather))
        .route("/scoreboard", get(handlers::league::get_scoreboard))
        // -- Analytics ---------------------------------------------------
        .route(
            "/analytics/league-trends",
            get(handlers::analytics::league_trends),
        )
        .route(
            "/analytics/factors",
            get(handlers::analytics::get_factor_scores),
        )
}
