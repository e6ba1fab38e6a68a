//! The feed trait the rest of the system depends on.
//!
//! [`StatsFeed`] is the injection seam: the API server holds an
//! `Arc<dyn StatsFeed>` so integration tests can swap in a mock and
//! simulate feed failures without network calls.

use async_trait::async_trait;
use courtside_core::reconcile::value_as_f64;
use courtside_core::types::TeamInfo;
use serde_json::Value;

use crate::client::{FeedKind, StatsClient, UpstreamError};
use crate::resultset::rows_from_result_sets;
use crate::teams;

/// Async operations over the external basketball feeds.
///
/// Every call is attempted exactly once; no retries. Which failures are
/// fatal is the caller's decision, not this trait's.
#[async_trait]
pub trait StatsFeed: Send + Sync {
    /// Bulk active-roster feed (one record per rostered player).
    async fn active_roster(&self) -> Result<Vec<Value>, UpstreamError>;

    /// League per-game stat table for a season. Players with zero games
    /// played are excluded, matching the upstream's own filtering.
    async fn league_player_stats(&self, season: &str) -> Result<Vec<Value>, UpstreamError>;

    /// Current league-wide injury report rows.
    async fn injury_report(&self) -> Result<Vec<Value>, UpstreamError>;

    /// Live scoreboard payload, today's by default.
    async fn scoreboard(&self, game_date: Option<&str>) -> Result<Value, UpstreamError>;

    /// Single-player info record (height, weight, position). `Null` if
    /// the feed knows nothing about the id.
    async fn player_info(&self, player_id: i64) -> Result<Value, UpstreamError>;

    /// Raw career stat payload, passed through untouched.
    async fn player_career(&self, player_id: i64) -> Result<Value, UpstreamError>;

    /// Game-by-game rows for a player and season, most recent first.
    async fn player_gamelog(&self, player_id: i64, season: &str)
        -> Result<Vec<Value>, UpstreamError>;

    /// Shot-chart rows. `None` season leaves the season unconstrained
    /// and lets the upstream pick its default.
    async fn shot_chart(
        &self,
        player_id: i64,
        season: Option<&str>,
    ) -> Result<Vec<Value>, UpstreamError>;

    /// Team lookup table.
    async fn teams(&self) -> Result<Vec<TeamInfo>, UpstreamError>;
}

#[async_trait]
impl StatsFeed for StatsClient {
    async fn active_roster(&self) -> Result<Vec<Value>, UpstreamError> {
        let payload = self
            .get_json(FeedKind::Roster, self.roster_url(), &[])
            .await?;
        let players = payload
            .pointer("/league/standard")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(players)
    }

    async fn league_player_stats(&self, season: &str) -> Result<Vec<Value>, UpstreamError> {
        let payload = self
            .get_json(
                FeedKind::SeasonStats,
                &self.stats_endpoint("leaguedashplayerstats"),
                &[
                    ("Season", season),
                    ("PerMode", "PerGame"),
                    ("SeasonType", "Regular Season"),
                    ("MeasureType", "Base"),
                    ("LeagueID", "00"),
                ],
            )
            .await?;

        // Zero-game players carry no usable averages; drop them here so
        // the summary builder's "missing row" path handles them.
        let rows = rows_from_result_sets(&payload)
            .into_iter()
            .filter(|row| {
                row.get("GP")
                    .and_then(value_as_f64)
                    .is_some_and(|gp| gp > 0.0)
            })
            .collect();
        Ok(rows)
    }

    async fn injury_report(&self) -> Result<Vec<Value>, UpstreamError> {
        let payload = self
            .get_json(FeedKind::InjuryReport, self.injury_report_url(), &[])
            .await?;
        Ok(rows_from_result_sets(&payload))
    }

    async fn scoreboard(&self, game_date: Option<&str>) -> Result<Value, UpstreamError> {
        match game_date {
            None => {
                self.get_json(FeedKind::Scoreboard, self.scoreboard_url(), &[])
                    .await
            }
            Some(date) => {
                self.get_json(
                    FeedKind::Scoreboard,
                    &self.stats_endpoint("scoreboardv2"),
                    &[("GameDate", date), ("LeagueID", "00"), ("DayOffset", "0")],
                )
                .await
            }
        }
    }

    async fn player_info(&self, player_id: i64) -> Result<Value, UpstreamError> {
        let id = player_id.to_string();
        let payload = self
            .get_json(
                FeedKind::PlayerInfo,
                &self.stats_endpoint("commonplayerinfo"),
                &[("PlayerID", id.as_str()), ("LeagueID", "00")],
            )
            .await?;
        Ok(rows_from_result_sets(&payload)
            .into_iter()
            .next()
            .unwrap_or(Value::Null))
    }

    async fn player_career(&self, player_id: i64) -> Result<Value, UpstreamError> {
        let id = player_id.to_string();
        self.get_json(
            FeedKind::PlayerCareer,
            &self.stats_endpoint("playercareerstats"),
            &[("PlayerID", id.as_str()), ("PerMode", "Totals")],
        )
        .await
    }

    async fn player_gamelog(
        &self,
        player_id: i64,
        season: &str,
    ) -> Result<Vec<Value>, UpstreamError> {
        let id = player_id.to_string();
        let payload = self
            .get_json(
                FeedKind::GameLog,
                &self.stats_endpoint("playergamelog"),
                &[
                    ("PlayerID", id.as_str()),
                    ("Season", season),
                    ("SeasonType", "Regular Season"),
                ],
            )
            .await?;
        Ok(rows_from_result_sets(&payload))
    }

    async fn shot_chart(
        &self,
        player_id: i64,
        season: Option<&str>,
    ) -> Result<Vec<Value>, UpstreamError> {
        let id = player_id.to_string();
        let payload = self
            .get_json(
                FeedKind::ShotChart,
                &self.stats_endpoint("shotchartdetail"),
                &[
                    ("PlayerID", id.as_str()),
                    ("TeamID", "0"),
                    ("SeasonNullable", season.unwrap_or("")),
                    ("SeasonType", "Regular Season"),
                    ("ContextMeasure", "FGA"),
                    ("LeagueID", "00"),
                ],
            )
            .await?;
        Ok(rows_from_result_sets(&payload))
    }

    async fn teams(&self) -> Result<Vec<TeamInfo>, UpstreamError> {
        Ok(teams::all_teams())
    }
}
