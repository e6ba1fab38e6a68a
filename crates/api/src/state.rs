use std::sync::Arc;

use courtside_upstream::weather::WeatherClient;
use courtside_upstream::StatsFeed;

use crate::cache::predictions::BulkPredictionCache;
use crate::cache::shots::ShotChartCache;
use crate::cache::SharedClock;
use crate::config::ServerConfig;
use crate::summary::SummaryService;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable; everything mutable sits behind an `Arc` owned by a
/// cache service. No globals: tests build their own state with a mock
/// feed and a manual clock.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The external stats feeds (real client or test mock).
    pub feeds: Arc<dyn StatsFeed>,
    /// OpenWeather client.
    pub weather: Arc<WeatherClient>,
    /// Injected time source for cache freshness decisions.
    pub clock: SharedClock,
    /// The cached summary pipeline.
    pub summary: Arc<SummaryService>,
    /// Bulk injury-prediction cache.
    pub predictions: Arc<BulkPredictionCache>,
    /// Shot-chart cache.
    pub shot_charts: Arc<ShotChartCache>,
}
