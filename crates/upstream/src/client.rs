//! Low-level HTTP plumbing for the league stats feeds.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use serde_json::Value;

/// Bound on every upstream call. There are no retries anywhere: a feed
/// is attempted exactly once per logical request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// The stats origin rejects non-browser clients, so we send a standard
/// browser header set.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ROSTER_URL: &str = "https://cdn.nba.com/static/json/staticData/squad/active_players.json";
const SCOREBOARD_URL: &str =
    "https://cdn.nba.com/static/json/liveData/scoreboard/todaysScoreboard_00.json";
const STATS_BASE_URL: &str = "https://stats.nba.com/stats";
const INJURY_REPORT_URL: &str = "https://site.web.api.digital.nba.com/stats/injuryreport";

/// Which upstream feed an error came from. Callers use this to decide
/// whether a failure is fatal or degrades gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Roster,
    SeasonStats,
    InjuryReport,
    Scoreboard,
    PlayerInfo,
    PlayerCareer,
    GameLog,
    ShotChart,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Roster => "roster",
            Self::SeasonStats => "season-stats",
            Self::InjuryReport => "injury-report",
            Self::Scoreboard => "scoreboard",
            Self::PlayerInfo => "player-info",
            Self::PlayerCareer => "player-career",
            Self::GameLog => "gamelog",
            Self::ShotChart => "shot-chart",
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the stats feed layer, tagged with the originating feed.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("{feed} request failed: {source}")]
    Request {
        feed: FeedKind,
        #[source]
        source: reqwest::Error,
    },

    /// The feed returned a non-2xx status code.
    #[error("{feed} returned status {status}: {body}")]
    Status {
        feed: FeedKind,
        status: u16,
        body: String,
    },
}

impl UpstreamError {
    pub fn feed(&self) -> FeedKind {
        match self {
            Self::Request { feed, .. } | Self::Status { feed, .. } => *feed,
        }
    }
}

/// HTTP client for the league data endpoints.
///
/// One instance is shared across all handlers; the inner
/// [`reqwest::Client`] pools connections.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: reqwest::Client,
}

impl Default for StatsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsClient {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(REFERER, HeaderValue::from_static("https://stats.nba.com/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://stats.nba.com"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    pub(crate) fn roster_url(&self) -> &'static str {
        ROSTER_URL
    }

    pub(crate) fn scoreboard_url(&self) -> &'static str {
        SCOREBOARD_URL
    }

    pub(crate) fn injury_report_url(&self) -> &'static str {
        INJURY_REPORT_URL
    }

    pub(crate) fn stats_endpoint(&self, endpoint: &str) -> String {
        format!("{STATS_BASE_URL}/{endpoint}")
    }

    /// Issue a GET and decode the JSON body, mapping transport failures
    /// and non-2xx statuses to [`UpstreamError`] tagged with `feed`.
    pub(crate) async fn get_json(
        &self,
        feed: FeedKind,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, UpstreamError> {
        tracing::debug!(%feed, url, "Fetching upstream feed");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| UpstreamError::Request { feed, source })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%feed, status = status.as_u16(), "Upstream feed returned error status");
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(UpstreamError::Status {
                feed,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| UpstreamError::Request { feed, source })
    }
}
