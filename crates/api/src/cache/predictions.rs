//! Bulk-prediction cache: one global bucket with incremental merge.
//!
//! A bulk request is a cache hit only when the bucket is fresh AND every
//! requested id is present. While the bucket stays fresh, newly computed
//! predictions merge into it without touching existing entries (and
//! without resetting its timestamp); a stale bucket is replaced
//! wholesale. `force` is deliberately not honored here.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use courtside_core::risk::RiskAssessment;
use tokio::sync::Mutex;

use super::Stamped;

/// Bulk predictions go stale after this long.
const BULK_PREDICTION_TTL_HOURS: i64 = 6;

pub struct BulkPredictionCache {
    inner: Mutex<Option<Stamped<HashMap<i64, RiskAssessment>>>>,
    ttl: Duration,
}

impl Default for BulkPredictionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkPredictionCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
            ttl: Duration::hours(BULK_PREDICTION_TTL_HOURS),
        }
    }

    /// The cached map, if the bucket is still fresh.
    pub async fn fresh_map(&self, now: DateTime<Utc>) -> Option<HashMap<i64, RiskAssessment>> {
        let guard = self.inner.lock().await;
        guard
            .as_ref()
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Cache hit: fresh and covering every requested id.
    pub async fn cached_subset(
        &self,
        ids: &[i64],
        now: DateTime<Utc>,
    ) -> Option<HashMap<i64, RiskAssessment>> {
        let map = self.fresh_map(now).await?;
        if ids.iter().all(|id| map.contains_key(id)) {
            Some(
                ids.iter()
                    .filter_map(|id| map.get(id).map(|pred| (*id, pred.clone())))
                    .collect(),
            )
        } else {
            None
        }
    }

    /// Fold new predictions in. A fresh bucket keeps its timestamp and
    /// its existing entries; a stale or empty bucket is replaced.
    pub async fn merge(&self, predictions: HashMap<i64, RiskAssessment>, now: DateTime<Utc>) {
        let mut guard = self.inner.lock().await;
        match guard.as_mut() {
            Some(entry) if entry.is_fresh(now, self.ttl) => {
                entry.value.extend(predictions);
            }
            _ => {
                *guard = Some(Stamped::new(predictions, now));
            }
        }
    }

    /// Whatever is cached, fresh or not. Factor-score aggregation reads
    /// this: stale labels are still labels.
    pub async fn snapshot(&self) -> HashMap<i64, RiskAssessment> {
        let guard = self.inner.lock().await;
        guard
            .as_ref()
            .map(|entry| entry.value.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::risk::{assess_with_rng, RiskInputs};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn t0() -> DateTime<Utc> {
        "2025-11-01T00:00:00Z".parse().unwrap()
    }

    fn prediction(id: i64, seed: u64) -> RiskAssessment {
        assess_with_rng(
            &RiskInputs::for_player(id),
            t0(),
            &mut StdRng::seed_from_u64(seed),
        )
    }

    fn preds(pairs: &[(i64, u64)]) -> HashMap<i64, RiskAssessment> {
        pairs.iter().map(|&(id, seed)| (id, prediction(id, seed))).collect()
    }

    #[tokio::test]
    async fn covering_request_hits_a_fresh_bucket() {
        let cache = BulkPredictionCache::new();
        cache.merge(preds(&[(1, 1), (2, 2)]), t0()).await;

        let hit = cache
            .cached_subset(&[1, 2], t0() + Duration::hours(5))
            .await
            .unwrap();
        assert_eq!(hit.len(), 2);
    }

    #[tokio::test]
    async fn uncovered_id_misses_even_when_fresh() {
        let cache = BulkPredictionCache::new();
        cache.merge(preds(&[(1, 1), (2, 2)]), t0()).await;

        assert!(cache.cached_subset(&[2, 3], t0()).await.is_none());
    }

    #[tokio::test]
    async fn fresh_merge_keeps_existing_entries_unchanged() {
        let cache = BulkPredictionCache::new();
        cache.merge(preds(&[(1, 1), (2, 2)]), t0()).await;
        let original_two = cache.snapshot().await[&2].injury_risk;

        // A later request computed only the missing id.
        cache.merge(preds(&[(3, 3)]), t0() + Duration::hours(1)).await;

        let map = cache.snapshot().await;
        assert_eq!(map.len(), 3);
        assert_eq!(map[&2].injury_risk, original_two);
    }

    #[tokio::test]
    async fn fresh_merge_does_not_reset_the_timestamp() {
        let cache = BulkPredictionCache::new();
        cache.merge(preds(&[(1, 1)]), t0()).await;
        cache.merge(preds(&[(2, 2)]), t0() + Duration::hours(5)).await;

        // The bucket was built at t0, so it expires 6h later even
        // though an entry merged at t0+5h.
        assert!(cache.fresh_map(t0() + Duration::hours(7)).await.is_none());
    }

    #[tokio::test]
    async fn stale_bucket_is_replaced_wholesale() {
        let cache = BulkPredictionCache::new();
        cache.merge(preds(&[(1, 1), (2, 2)]), t0()).await;

        let later = t0() + Duration::hours(7);
        cache.merge(preds(&[(9, 9)]), later).await;

        let map = cache.snapshot().await;
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&9));
        assert!(cache.fresh_map(later).await.is_some());
    }

    #[tokio::test]
    async fn snapshot_serves_stale_data_for_aggregation() {
        let cache = BulkPredictionCache::new();
        cache.merge(preds(&[(1, 1)]), t0()).await;

        // Long past the TTL, the snapshot still exposes the labels.
        assert_eq!(cache.snapshot().await.len(), 1);
    }
}
