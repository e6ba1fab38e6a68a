use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courtside_api::cache::clock::SystemClock;
use courtside_api::cache::predictions::BulkPredictionCache;
use courtside_api::cache::shots::ShotChartCache;
use courtside_api::config::ServerConfig;
use courtside_api::router::build_app_router;
use courtside_api::state::AppState;
use courtside_api::summary::SummaryService;
use courtside_api::{background, cache::SharedClock};
use courtside_upstream::weather::WeatherClient;
use courtside_upstream::{StatsClient, StatsFeed};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courtside_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    std::fs::create_dir_all(&config.cache_dir).expect("Failed to create cache directory");
    tracing::info!(dir = %config.cache_dir.display(), "Cache directory ready");

    // --- Upstream clients ---
    let feeds: Arc<dyn StatsFeed> = Arc::new(StatsClient::new());
    let weather = Arc::new(WeatherClient::new());

    // --- Caches ---
    let clock: SharedClock = Arc::new(SystemClock);
    let summary = Arc::new(SummaryService::new(
        Arc::clone(&feeds),
        Arc::clone(&clock),
        config.cache_dir.clone(),
    ));
    let predictions = Arc::new(BulkPredictionCache::new());
    let shot_charts = Arc::new(ShotChartCache::new());

    // --- Injury archive job ---
    let archive_cancel = tokio_util::sync::CancellationToken::new();
    let archive_handle = tokio::spawn(background::injury_archive::run(
        Arc::clone(&feeds),
        config.cache_dir.clone(),
        archive_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        feeds,
        weather,
        clock,
        summary,
        predictions,
        shot_charts,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    archive_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), archive_handle).await;
    tracing::info!("Injury archive job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
