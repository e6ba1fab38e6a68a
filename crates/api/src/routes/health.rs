use axum::{routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET / -- service banner.
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Courtside API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health -- liveness probe. The upstream feeds are not polled
/// here; a dead feed should not make the process look dead.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Mount the root-level service routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
