//! Daily snapshot of the league injury report.
//!
//! The upstream injury feed only exposes the current report, so trend
//! analysis needs its own history. This job fetches the report once per
//! interval and appends the rows, stamped with the archive date, to
//! `injury_archive.json` under the cache directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use courtside_upstream::StatsFeed;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;

/// Default archive cadence: once a day.
const DEFAULT_INTERVAL_SECS: u64 = 86_400;

/// File the snapshots accumulate in, relative to the cache directory.
const ARCHIVE_FILE: &str = "injury_archive.json";

/// Key added to every archived row.
const ARCHIVE_DATE_KEY: &str = "ARCHIVE_DATE";

/// Run the injury archive loop.
///
/// Fetches the current injury report every `INJURY_ARCHIVE_INTERVAL_SECS`
/// seconds (default one day) and appends it to the archive file. Runs
/// until `cancel` is triggered.
pub async fn run(feeds: Arc<dyn StatsFeed>, cache_dir: PathBuf, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("INJURY_ARCHIVE_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(interval_secs, "Injury archive job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Injury archive job stopping");
                break;
            }
            _ = interval.tick() => {
                match archive_once(feeds.as_ref(), &cache_dir).await {
                    Ok(appended) => {
                        tracing::info!(appended, "Injury archive: snapshot written");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Injury archive: snapshot failed");
                    }
                }
            }
        }
    }
}

/// Fetch the current injury report and append it to the archive file.
///
/// Returns the number of rows appended. A missing or unreadable archive
/// file starts a fresh array rather than failing the snapshot.
pub async fn archive_once(feeds: &dyn StatsFeed, cache_dir: &Path) -> Result<usize, AppError> {
    let rows = feeds.injury_report().await?;
    let today = Utc::now().format("%Y-%m-%d").to_string();

    let path = cache_dir.join(ARCHIVE_FILE);
    let mut archive = read_archive(&path);

    let appended = rows.len();
    for mut row in rows {
        if let Value::Object(map) = &mut row {
            map.insert(ARCHIVE_DATE_KEY.to_string(), Value::String(today.clone()));
        }
        archive.push(row);
    }

    let body = serde_json::to_vec(&archive).map_err(|e| AppError::Internal(e.to_string()))?;
    tokio::fs::write(&path, body)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(appended)
}

/// Load the existing archive, or an empty array if the file is missing
/// or corrupt. Corruption is logged and the archive restarts; losing
/// history beats wedging the job.
fn read_archive(path: &Path) -> Vec<Value> {
    match std::fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(Value::Array(rows)) => rows,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %path.display(), "Injury archive file unreadable, restarting");
                Vec::new()
            }
        },
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use courtside_core::types::TeamInfo;
    use courtside_upstream::{FeedKind, UpstreamError};
    use serde_json::json;

    struct FixedReportFeed(Vec<Value>);

    #[async_trait]
    impl StatsFeed for FixedReportFeed {
        async fn active_roster(&self) -> Result<Vec<Value>, UpstreamError> {
            Ok(Vec::new())
        }
        async fn league_player_stats(&self, _season: &str) -> Result<Vec<Value>, UpstreamError> {
            Ok(Vec::new())
        }
        async fn injury_report(&self) -> Result<Vec<Value>, UpstreamError> {
            Ok(self.0.clone())
        }
        async fn scoreboard(&self, _game_date: Option<&str>) -> Result<Value, UpstreamError> {
            Ok(Value::Null)
        }
        async fn player_info(&self, _player_id: i64) -> Result<Value, UpstreamError> {
            Ok(Value::Null)
        }
        async fn player_career(&self, _player_id: i64) -> Result<Value, UpstreamError> {
            Ok(Value::Null)
        }
        async fn player_gamelog(
            &self,
            _player_id: i64,
            _season: &str,
        ) -> Result<Vec<Value>, UpstreamError> {
            Ok(Vec::new())
        }
        async fn shot_chart(
            &self,
            _player_id: i64,
            _season: Option<&str>,
        ) -> Result<Vec<Value>, UpstreamError> {
            Ok(Vec::new())
        }
        async fn teams(&self) -> Result<Vec<TeamInfo>, UpstreamError> {
            Ok(Vec::new())
        }
    }

    struct FailingFeed;

    #[async_trait]
    impl StatsFeed for FailingFeed {
        async fn active_roster(&self) -> Result<Vec<Value>, UpstreamError> {
            Ok(Vec::new())
        }
        async fn league_player_stats(&self, _season: &str) -> Result<Vec<Value>, UpstreamError> {
            Ok(Vec::new())
        }
        async fn injury_report(&self) -> Result<Vec<Value>, UpstreamError> {
            Err(UpstreamError::Status {
                feed: FeedKind::InjuryReport,
                status: 503,
                body: "unavailable".into(),
            })
        }
        async fn scoreboard(&self, _game_date: Option<&str>) -> Result<Value, UpstreamError> {
            Ok(Value::Null)
        }
        async fn player_info(&self, _player_id: i64) -> Result<Value, UpstreamError> {
            Ok(Value::Null)
        }
        async fn player_career(&self, _player_id: i64) -> Result<Value, UpstreamError> {
            Ok(Value::Null)
        }
        async fn player_gamelog(
            &self,
            _player_id: i64,
            _season: &str,
        ) -> Result<Vec<Value>, UpstreamError> {
            Ok(Vec::new())
        }
        async fn shot_chart(
            &self,
            _player_id: i64,
            _season: Option<&str>,
        ) -> Result<Vec<Value>, UpstreamError> {
            Ok(Vec::new())
        }
        async fn teams(&self) -> Result<Vec<TeamInfo>, UpstreamError> {
            Ok(Vec::new())
        }
    }

    fn report_row(id: i64, status: &str) -> Value {
        json!({ "PLAYER_ID": id, "STATUS": status })
    }

    #[tokio::test]
    async fn snapshot_appends_tagged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let feed = FixedReportFeed(vec![report_row(1, "Out"), report_row(2, "Questionable")]);

        let appended = archive_once(&feed, dir.path()).await.unwrap();
        assert_eq!(appended, 2);

        let archive = read_archive(&dir.path().join(ARCHIVE_FILE));
        assert_eq!(archive.len(), 2);
        let today = Utc::now().format("%Y-%m-%d").to_string();
        for row in &archive {
            assert_eq!(row[ARCHIVE_DATE_KEY], Value::String(today.clone()));
        }
    }

    #[tokio::test]
    async fn snapshots_accumulate_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let feed = FixedReportFeed(vec![report_row(1, "Out")]);

        archive_once(&feed, dir.path()).await.unwrap();
        archive_once(&feed, dir.path()).await.unwrap();

        let archive = read_archive(&dir.path().join(ARCHIVE_FILE));
        assert_eq!(archive.len(), 2);
    }

    #[tokio::test]
    async fn corrupt_archive_restarts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ARCHIVE_FILE), b"not json").unwrap();

        let feed = FixedReportFeed(vec![report_row(1, "Out")]);
        archive_once(&feed, dir.path()).await.unwrap();

        let archive = read_archive(&dir.path().join(ARCHIVE_FILE));
        assert_eq!(archive.len(), 1);
    }

    #[tokio::test]
    async fn feed_failure_leaves_archive_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let feed = FixedReportFeed(vec![report_row(1, "Out")]);
        archive_once(&feed, dir.path()).await.unwrap();

        assert!(archive_once(&FailingFeed, dir.path()).await.is_err());

        let archive = read_archive(&dir.path().join(ARCHIVE_FILE));
        assert_eq!(archive.len(), 1);
    }
}
