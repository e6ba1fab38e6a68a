//! Shared test harness: a scriptable mock feed, a manually advanced
//! clock, and the same router construction production uses.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use courtside_api::cache::predictions::BulkPredictionCache;
use courtside_api::cache::shots::ShotChartCache;
use courtside_api::cache::{Clock, SharedClock};
use courtside_api::config::ServerConfig;
use courtside_api::router::build_app_router;
use courtside_api::state::AppState;
use courtside_api::summary::SummaryService;
use courtside_core::types::TeamInfo;
use courtside_upstream::weather::WeatherClient;
use courtside_upstream::{FeedKind, StatsFeed, UpstreamError};

// ---------------------------------------------------------------------------
// Manual clock
// ---------------------------------------------------------------------------

/// A clock the test advances by hand. Starts at a fixed instant so
/// season derivation is stable regardless of when the tests run.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

/// 2025-11-15 is mid-season: the current season is "2025-26".
pub const TEST_EPOCH: &str = "2025-11-15T12:00:00Z";

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(TEST_EPOCH.parse().unwrap()),
        })
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Mock feed
// ---------------------------------------------------------------------------

/// What one shot-chart call should produce.
#[derive(Clone)]
pub enum ShotOutcome {
    Rows(Vec<Value>),
    Fail,
}

/// A scriptable [`StatsFeed`]. Fields are set at construction; counters
/// record how many times each feed was hit.
pub struct MockFeed {
    pub roster: Vec<Value>,
    pub stats: Vec<Value>,
    pub injuries: Vec<Value>,
    pub infos: HashMap<i64, Value>,
    pub gamelog: Vec<Value>,
    /// Outcome per season parameter; an unscripted season yields an
    /// empty row set.
    pub shots: HashMap<Option<String>, ShotOutcome>,

    pub fail_roster: bool,
    pub fail_stats: bool,
    pub fail_injuries: bool,

    pub roster_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
    pub injury_calls: AtomicUsize,
    pub info_calls: AtomicUsize,
    /// Season parameters of every shot-chart call, in order.
    pub shot_calls: Mutex<Vec<Option<String>>>,
}

impl Default for MockFeed {
    fn default() -> Self {
        Self {
            roster: Vec::new(),
            stats: Vec::new(),
            injuries: Vec::new(),
            infos: HashMap::new(),
            gamelog: Vec::new(),
            shots: HashMap::new(),
            fail_roster: false,
            fail_stats: false,
            fail_injuries: false,
            roster_calls: AtomicUsize::new(0),
            stats_calls: AtomicUsize::new(0),
            injury_calls: AtomicUsize::new(0),
            info_calls: AtomicUsize::new(0),
            shot_calls: Mutex::new(Vec::new()),
        }
    }
}

fn feed_down(feed: FeedKind) -> UpstreamError {
    UpstreamError::Status {
        feed,
        status: 503,
        body: "service unavailable".to_string(),
    }
}

#[async_trait]
impl StatsFeed for MockFeed {
    async fn active_roster(&self) -> Result<Vec<Value>, UpstreamError> {
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_roster {
            return Err(feed_down(FeedKind::Roster));
        }
        Ok(self.roster.clone())
    }

    async fn league_player_stats(&self, _season: &str) -> Result<Vec<Value>, UpstreamError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stats {
            return Err(feed_down(FeedKind::SeasonStats));
        }
        Ok(self.stats.clone())
    }

    async fn injury_report(&self) -> Result<Vec<Value>, UpstreamError> {
        self.injury_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_injuries {
            return Err(feed_down(FeedKind::InjuryReport));
        }
        Ok(self.injuries.clone())
    }

    async fn scoreboard(&self, _game_date: Option<&str>) -> Result<Value, UpstreamError> {
        Ok(json!({"scoreboard": {"games": []}}))
    }

    async fn player_info(&self, player_id: i64) -> Result<Value, UpstreamError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.infos.get(&player_id).cloned().unwrap_or(Value::Null))
    }

    async fn player_career(&self, player_id: i64) -> Result<Value, UpstreamError> {
        Ok(json!({"resultSets": [], "playerId": player_id}))
    }

    async fn player_gamelog(
        &self,
        _player_id: i64,
        _season: &str,
    ) -> Result<Vec<Value>, UpstreamError> {
        Ok(self.gamelog.clone())
    }

    async fn shot_chart(
        &self,
        _player_id: i64,
        season: Option<&str>,
    ) -> Result<Vec<Value>, UpstreamError> {
        let key = season.map(str::to_owned);
        self.shot_calls.lock().unwrap().push(key.clone());
        match self.shots.get(&key) {
            Some(ShotOutcome::Rows(rows)) => Ok(rows.clone()),
            Some(ShotOutcome::Fail) => Err(feed_down(FeedKind::ShotChart)),
            None => Ok(Vec::new()),
        }
    }

    async fn teams(&self) -> Result<Vec<TeamInfo>, UpstreamError> {
        Ok(vec![
            TeamInfo {
                id: 1610612747,
                abbreviation: "LAL".to_string(),
                full_name: "Los Angeles Lakers".to_string(),
            },
            TeamInfo {
                id: 1610612744,
                abbreviation: "GSW".to_string(),
                full_name: "Golden State Warriors".to_string(),
            },
        ])
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A roster record in the CDN feed's shape.
pub fn roster_record(id: i64, first: &str, last: &str, team_id: i64) -> Value {
    json!({
        "personId": id,
        "firstName": first,
        "lastName": last,
        "isActive": true,
        "teamId": team_id,
        "pos": "G",
    })
}

/// A league stat-table row for one player.
pub fn stats_row(id: i64, team_id: i64, pts: f64) -> Value {
    json!({
        "PLAYER_ID": id,
        "TEAM_ID": team_id,
        "GP": 12,
        "PTS": pts,
        "REB": 5.0,
        "AST": 4.0,
        "STL": 1.0,
        "BLK": 0.5,
        "FG_PCT": 0.48,
        "MIN": 34.0,
        "PLAYER_HEIGHT": "6-6",
        "PLAYER_WEIGHT": "215",
    })
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub fn test_config(cache_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cache_dir: cache_dir.to_path_buf(),
        openweather_key: None,
    }
}

/// Build the full application router around a mock feed and a manual
/// clock. Mirrors the wiring in `main.rs` so tests exercise the same
/// middleware stack production uses.
pub fn build_test_app(feed: Arc<MockFeed>, clock: Arc<ManualClock>, cache_dir: &Path) -> Router {
    let config = test_config(cache_dir);
    let feeds: Arc<dyn StatsFeed> = feed;
    let shared_clock: SharedClock = clock;

    let summary = Arc::new(SummaryService::new(
        Arc::clone(&feeds),
        Arc::clone(&shared_clock),
        config.cache_dir.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        feeds,
        weather: Arc::new(WeatherClient::new()),
        clock: shared_clock,
        summary,
        predictions: Arc::new(BulkPredictionCache::new()),
        shot_charts: Arc::new(ShotChartCache::new()),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Like [`post_json`] but without a request body, for the endpoints
/// that take query parameters on POST.
pub async fn post(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the standard error envelope and return its message.
pub async fn assert_error_body(response: Response<Body>, code: &str) -> String {
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error code: {json}");
    json["error"].as_str().unwrap_or_default().to_string()
}

/// Convenience wrapper asserting a status before decoding.
pub async fn get_ok(app: Router, uri: &str) -> Value {
    let response = get(app, uri).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    body_json(response).await
}
