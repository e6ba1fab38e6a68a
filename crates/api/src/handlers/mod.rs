//! HTTP handler implementations, grouped by surface area.

pub mod analytics;
pub mod league;
pub mod player;
pub mod players;
pub mod predictions;
pub mod weather;
