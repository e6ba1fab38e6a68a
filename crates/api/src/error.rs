use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use courtside_upstream::weather::WeatherError;
use courtside_upstream::UpstreamError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Only fatal error categories appear here: degraded feeds are absorbed
/// inside the summary builder and never reach the HTTP layer.
/// Implements [`IntoResponse`] to produce consistent JSON error bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required upstream feed was unreachable or returned a non-2xx
    /// status.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The weather feed rejected the request; its status and body are
    /// forwarded to the caller verbatim.
    #[error("weather feed returned status {status}")]
    WeatherUpstream { status: u16, body: String },

    /// A required secret or setting is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Status { status, body } => AppError::WeatherUpstream { status, body },
            WeatherError::Request(source) => AppError::Internal(source.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Upstream(err) => {
                tracing::error!(feed = %err.feed(), error = %err, "Upstream feed failure");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
            }

            // Forward the weather origin's own status so the dashboard
            // can distinguish "unknown city" from "feed down".
            AppError::WeatherUpstream { status, body } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "WEATHER_UPSTREAM",
                body.clone(),
            ),

            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }

            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
