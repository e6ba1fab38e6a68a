//! Courtside domain logic.
//!
//! Pure, I/O-free building blocks shared by the API server: player and
//! team types, season-string derivation, cross-feed key reconciliation,
//! the heuristic injury-risk scorer, and factor-score aggregation.

pub mod analytics;
pub mod reconcile;
pub mod risk;
pub mod season;
pub mod types;
