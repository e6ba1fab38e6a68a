//! Weather pass-through for game-day environmental context.

use axum::extract::{Path, State};
use axum::Json;
use courtside_upstream::weather::WeatherReport;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /weather/{city} -- current conditions from OpenWeather.
///
/// Fails with a configuration error when no API key is set; upstream
/// failures forward the origin's status and body verbatim.
pub async fn get_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> AppResult<Json<WeatherReport>> {
    let key = state.config.openweather_key.as_deref().ok_or_else(|| {
        AppError::Configuration("OPENWEATHER_KEY not set in environment".to_string())
    })?;

    let report = state.weather.current(&city, key).await?;
    Ok(Json(report))
}
