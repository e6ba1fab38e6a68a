//! Read-through, time-to-live caching primitives.
//!
//! Three cache instances front the expensive flows: the summary cache
//! (two tiers, per-season single-flight, lives in [`crate::summary`]),
//! the bulk-prediction cache, and the shot-chart cache. The shared
//! pieces here are a timestamped value wrapper and a per-key lock map.

pub mod clock;
pub mod predictions;
pub mod shots;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use clock::{Clock, SharedClock, SystemClock};

/// A built value plus its construction timestamp.
///
/// Serializes as `{ built_at, value }` so the on-disk summary tier
/// carries its own freshness information across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stamped<T> {
    pub built_at: DateTime<Utc>,
    pub value: T,
}

impl<T> Stamped<T> {
    pub fn new(value: T, built_at: DateTime<Utc>) -> Self {
        Self { built_at, value }
    }

    /// Validity is `now - built_at < ttl`, strictly.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.built_at < ttl
    }
}

/// Lazily created per-key mutual-exclusion guards.
///
/// One async mutex per cache key collapses concurrent builds for that
/// key into a single flight, while builds for different keys proceed
/// independently (no head-of-line blocking between seasons).
#[derive(Default)]
pub struct KeyedLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch (or create) the guard for `key`. The caller locks the
    /// returned mutex; dropping the guard releases the flight.
    pub fn lock_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().expect("lock map poisoned");
        Arc::clone(
            map.entry(key.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}
