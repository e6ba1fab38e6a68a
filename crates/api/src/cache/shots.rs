//! Shot-chart cache: keyed by (player, season), independent expiry.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use courtside_core::types::ShotRecord;
use tokio::sync::Mutex;

use super::Stamped;

/// Shot charts change slowly; cache them twice as long as summaries.
const SHOT_CHART_TTL_HOURS: i64 = 12;

pub struct ShotChartCache {
    inner: Mutex<HashMap<(i64, String), Stamped<Vec<ShotRecord>>>>,
    ttl: Duration,
}

impl Default for ShotChartCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ShotChartCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl: Duration::hours(SHOT_CHART_TTL_HOURS),
        }
    }

    pub async fn get(
        &self,
        player_id: i64,
        season: &str,
        now: DateTime<Utc>,
    ) -> Option<Vec<ShotRecord>> {
        let map = self.inner.lock().await;
        map.get(&(player_id, season.to_string()))
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    pub async fn insert(
        &self,
        player_id: i64,
        season: &str,
        shots: Vec<ShotRecord>,
        now: DateTime<Utc>,
    ) {
        let mut map = self.inner.lock().await;
        map.insert((player_id, season.to_string()), Stamped::new(shots, now));
    }
}
