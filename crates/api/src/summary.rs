//! The cached player-summary pipeline.
//!
//! Fuses four upstream sources (roster, league stat table, injury
//! report, live scoreboard) into one ordered `PlayerSummary` sequence,
//! patches missing height/weight with per-player lookups, and memoizes
//! the result in two tiers: an in-process map and one JSON file per
//! season under the cache directory. Concurrent rebuilds for the same
//! season collapse into a single flight via a per-season guard.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use courtside_core::reconcile::{
    canonical_player_id, canonical_team_id, parse_height, value_as_i64, value_as_str,
};
use courtside_core::season::{season_file_stem, season_for_instant};
use courtside_core::types::{
    headshot_url, InjuryStatus, PlayerBio, PlayerRecord, PlayerSummary, SeasonAverages, TeamInfo,
};
use courtside_upstream::{StatsFeed, UpstreamError};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::cache::{KeyedLocks, SharedClock, Stamped};

/// Summaries go stale after this long.
const SUMMARY_TTL_HOURS: i64 = 6;

pub struct SummaryService {
    feeds: Arc<dyn StatsFeed>,
    clock: SharedClock,
    cache_dir: PathBuf,
    ttl: Duration,
    memory: Mutex<HashMap<String, Stamped<Arc<Vec<PlayerSummary>>>>>,
    locks: KeyedLocks,
}

impl SummaryService {
    pub fn new(feeds: Arc<dyn StatsFeed>, clock: SharedClock, cache_dir: PathBuf) -> Self {
        Self {
            feeds,
            clock,
            cache_dir,
            ttl: Duration::hours(SUMMARY_TTL_HOURS),
            memory: Mutex::new(HashMap::new()),
            locks: KeyedLocks::new(),
        }
    }

    /// Serve the summary for a season (default: current), rebuilding on
    /// miss, expiry, or `force`.
    pub async fn get(
        &self,
        season: Option<&str>,
        force: bool,
    ) -> Result<Arc<Vec<PlayerSummary>>, UpstreamError> {
        let season = season
            .map(str::to_owned)
            .unwrap_or_else(|| season_for_instant(self.clock.now()));

        if !force {
            if let Some(hit) = self.memory_fresh(&season).await {
                return Ok(hit);
            }
            if let Some(hit) = self.promote_disk_hit(&season).await {
                return Ok(hit);
            }
        }

        // Single flight per season: concurrent requesters queue here and
        // re-check freshness once the winner has populated the cache.
        let guard = self.locks.lock_for(&season);
        let _flight = guard.lock().await;

        if !force {
            if let Some(hit) = self.memory_fresh(&season).await {
                return Ok(hit);
            }
        }

        let summaries = Arc::new(self.build(&season).await?);
        let now = self.clock.now();
        self.memory
            .lock()
            .await
            .insert(season.clone(), Stamped::new(Arc::clone(&summaries), now));
        self.write_disk(&season, &summaries).await;
        Ok(summaries)
    }

    async fn memory_fresh(&self, season: &str) -> Option<Arc<Vec<PlayerSummary>>> {
        let now = self.clock.now();
        let map = self.memory.lock().await;
        map.get(season)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Second tier: read the per-season file, treat anything unreadable
    /// or stale as a miss, and promote a hit into the memory tier.
    async fn promote_disk_hit(&self, season: &str) -> Option<Arc<Vec<PlayerSummary>>> {
        let path = self.cache_file(season);
        let raw = tokio::fs::read_to_string(&path).await.ok()?;
        let entry: Stamped<Vec<PlayerSummary>> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Corrupt summary cache file, ignoring");
                return None;
            }
        };
        if !entry.is_fresh(self.clock.now(), self.ttl) {
            return None;
        }

        let summaries = Arc::new(entry.value);
        self.memory.lock().await.insert(
            season.to_string(),
            Stamped::new(Arc::clone(&summaries), entry.built_at),
        );
        tracing::debug!(season, "Summary served from disk cache");
        Some(summaries)
    }

    async fn write_disk(&self, season: &str, summaries: &Arc<Vec<PlayerSummary>>) {
        let path = self.cache_file(season);
        let entry = Stamped::new(summaries.as_ref(), self.clock.now());
        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize summary cache");
                return;
            }
        };
        if let Err(err) = tokio::fs::write(&path, json).await {
            // A failed persist only costs the next restart a rebuild.
            tracing::warn!(path = %path.display(), error = %err, "Failed to persist summary cache");
        }
    }

    fn cache_file(&self, season: &str) -> PathBuf {
        self.cache_dir
            .join(format!("players_{}.json", season_file_stem(season)))
    }

    /// The full rebuild: steps 1-3 are required feeds (their failure
    /// aborts), 4-5 degrade, and the patch pass in step 7 skips
    /// individual failures.
    async fn build(&self, season: &str) -> Result<Vec<PlayerSummary>, UpstreamError> {
        let roster = self.feeds.active_roster().await?;
        let stats_rows = self.feeds.league_player_stats(season).await?;
        let team_lookup: HashMap<i64, TeamInfo> = self
            .feeds
            .teams()
            .await?
            .into_iter()
            .map(|team| (team.id, team))
            .collect();

        let injuries: HashMap<i64, InjuryStatus> = match self.feeds.injury_report().await {
            Ok(rows) => rows
                .iter()
                .filter_map(|row| {
                    canonical_player_id(row)
                        .ok()
                        .map(|id| (id, InjuryStatus::from_report_row(row)))
                })
                .collect(),
            Err(err) => {
                tracing::warn!(error = %err, "Injury report unavailable, building without it");
                HashMap::new()
            }
        };

        // Fetched once per build for parity with the other feeds; the
        // board is not folded into the summary payload.
        if let Err(err) = self.feeds.scoreboard(None).await {
            tracing::warn!(error = %err, "Scoreboard unavailable for this build");
        }

        let stats_by_id: HashMap<i64, Value> = stats_rows
            .into_iter()
            .filter_map(|row| canonical_player_id(&row).ok().map(|id| (id, row)))
            .collect();

        let mut summaries = Vec::new();
        let mut skipped = 0usize;
        for record in &roster {
            let player = match PlayerRecord::from_roster_value(record) {
                Ok(player) => player,
                Err(err) => {
                    skipped += 1;
                    tracing::warn!(error = %err, "Skipping unreconcilable roster record");
                    continue;
                }
            };
            if !player.is_active {
                continue;
            }
            summaries.push(assemble(&player, stats_by_id.get(&player.id), &team_lookup, &injuries));
        }
        if skipped > 0 {
            tracing::warn!(skipped, "Roster records skipped during reconciliation");
        }

        let patched = self.patch_missing_bio(&mut summaries).await;
        tracing::info!(
            season,
            players = summaries.len(),
            skipped,
            patched,
            "Summary build complete"
        );
        Ok(summaries)
    }

    /// Step 7: per-player lookups for summaries the bulk feed left
    /// without height or weight. Sequential and best-effort.
    async fn patch_missing_bio(&self, summaries: &mut [PlayerSummary]) -> usize {
        let mut patched = 0usize;
        for index in 0..summaries.len() {
            if summaries[index].height_feet.is_some() && summaries[index].weight_pounds.is_some() {
                continue;
            }
            let player_id = summaries[index].id;
            match self.feeds.player_info(player_id).await {
                Ok(row) => {
                    let bio = PlayerBio::from_info_row(&row);
                    let summary = &mut summaries[index];
                    if bio.height_feet.is_some() {
                        summary.height_feet = bio.height_feet;
                        summary.height_inches = bio.height_inches;
                    }
                    if bio.weight_pounds.is_some() {
                        summary.weight_pounds = bio.weight_pounds;
                    }
                    patched += 1;
                }
                Err(err) => {
                    tracing::warn!(player_id, error = %err, "Bio patch lookup failed, skipping");
                }
            }
        }
        patched
    }
}

/// Join one roster player against the stat, team, and injury lookups.
fn assemble(
    player: &PlayerRecord,
    stats: Option<&Value>,
    team_lookup: &HashMap<i64, TeamInfo>,
    injuries: &HashMap<i64, InjuryStatus>,
) -> PlayerSummary {
    // The stat row's team assignment wins: it reflects trades faster
    // than the roster CDN.
    let team_id = stats
        .and_then(canonical_team_id)
        .or(player.team_id);
    let team = team_id.and_then(|id| team_lookup.get(&id));

    let (height_feet, height_inches) = parse_height(
        stats
            .and_then(|row| row.get("PLAYER_HEIGHT"))
            .and_then(value_as_str),
    );
    let weight_pounds = stats
        .and_then(|row| {
            row.get("PLAYER_WEIGHT")
                .or_else(|| row.get("PLAYER_WEIGHT_LBS"))
        })
        .and_then(value_as_i64)
        .filter(|&w| w != 0);

    let position = player.position.clone().or_else(|| {
        stats.and_then(|row| {
            ["POSITION", "PLAYER_POSITION"]
                .iter()
                .find_map(|key| row.get(key).and_then(value_as_str))
                .map(str::to_owned)
        })
    });

    PlayerSummary {
        id: player.id,
        full_name: player.full_name(),
        first_name: player.first_name.clone(),
        last_name: player.last_name.clone(),
        is_active: true,
        team_id,
        team_abbreviation: team.map(|t| t.abbreviation.clone()),
        team_full_name: team.map(|t| t.full_name.clone()),
        position,
        height_feet,
        height_inches,
        weight_pounds,
        headshot_url: headshot_url(player.id),
        season_averages: stats
            .map(SeasonAverages::from_stats_row)
            .unwrap_or_default(),
        current_injury: injuries.get(&player.id).cloned(),
    }
}
