//! OpenWeather client for the weather pass-through endpoint.

use serde::{Deserialize, Serialize};

use crate::client::UPSTREAM_TIMEOUT;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Errors from the weather feed. Upstream statuses are preserved so the
/// HTTP layer can forward them verbatim.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather feed returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Flattened weather record for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature: f64,
    pub humidity: f64,
    pub description: String,
    pub wind_speed: f64,
    pub pressure: f64,
}

#[derive(Deserialize)]
struct OpenWeatherPayload {
    main: OpenWeatherMain,
    #[serde(default)]
    weather: Vec<OpenWeatherCondition>,
    #[serde(default)]
    wind: OpenWeatherWind,
}

#[derive(Deserialize)]
struct OpenWeatherMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Deserialize)]
struct OpenWeatherCondition {
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, Default)]
struct OpenWeatherWind {
    #[serde(default)]
    speed: f64,
}

/// Thin client over the OpenWeather current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Fetch current conditions for a city in imperial units.
    ///
    /// A non-200 upstream response becomes [`WeatherError::Status`] with
    /// the raw body, which the HTTP layer forwards as-is.
    pub async fn current(&self, city: &str, api_key: &str) -> Result<WeatherReport, WeatherError> {
        let response = self
            .client
            .get(OPENWEATHER_URL)
            .query(&[("q", city), ("appid", api_key), ("units", "imperial")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: OpenWeatherPayload = response.json().await?;
        Ok(WeatherReport {
            city: city.to_string(),
            temperature: payload.main.temp,
            humidity: payload.main.humidity,
            description: title_case(
                payload
                    .weather
                    .first()
                    .map(|c| c.description.as_str())
                    .unwrap_or(""),
            ),
            wind_speed: payload.wind.speed,
            pressure: payload.main.pressure,
        })
    }
}

/// Capitalize each word ("scattered clouds" -> "Scattered Clouds").
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
