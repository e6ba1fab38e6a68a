//! HTTP clients for the external basketball data feeds.
//!
//! Wraps the league stats endpoints (roster CDN, league stat table,
//! injury report, live scoreboard, per-player lookups, shot charts) and
//! the OpenWeather API behind typed clients. The [`feeds::StatsFeed`]
//! trait is the seam the API server and its tests inject through.

pub mod client;
pub mod feeds;
pub mod resultset;
pub mod teams;
pub mod weather;

pub use client::{FeedKind, StatsClient, UpstreamError};
pub use feeds::StatsFeed;
