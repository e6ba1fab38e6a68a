//! Error envelope and degradation behaviour across the API surface.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{get, MockFeed};

// ---------------------------------------------------------------------------
// Test: a dead roster feed turns into 502 UPSTREAM_ERROR
// ---------------------------------------------------------------------------

#[tokio::test]
async fn roster_failure_returns_upstream_error() {
    let dir = tempfile::tempdir().unwrap();
    let feed = Arc::new(MockFeed {
        fail_roster: true,
        ..MockFeed::default()
    });
    let app = common::build_test_app(feed, common::ManualClock::new(), dir.path());

    let response = get(app, "/players").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let message = common::assert_error_body(response, "UPSTREAM_ERROR").await;
    assert!(
        message.contains("roster"),
        "message should name the feed: {message}"
    );
}

// ---------------------------------------------------------------------------
// Test: the weather endpoint without a key is a configuration error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn weather_without_key_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(
        Arc::new(MockFeed::default()),
        common::ManualClock::new(),
        dir.path(),
    );

    let response = get(app, "/weather/Boston").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let message = common::assert_error_body(response, "CONFIGURATION_ERROR").await;
    assert!(message.contains("OPENWEATHER_KEY"));
}

// ---------------------------------------------------------------------------
// Test: a non-numeric player id path is rejected, not a panic
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_player_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(
        Arc::new(MockFeed::default()),
        common::ManualClock::new(),
        dir.path(),
    );

    let response = get(app, "/player/not-a-number/info").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: error responses still carry the request id header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_responses_carry_request_id() {
    let dir = tempfile::tempdir().unwrap();
    let feed = Arc::new(MockFeed {
        fail_roster: true,
        ..MockFeed::default()
    });
    let app = common::build_test_app(feed, common::ManualClock::new(), dir.path());

    let response = get(app, "/players").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.headers().get("x-request-id").is_some());
}
