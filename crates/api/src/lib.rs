//! Courtside API server library.
//!
//! Exposes the building blocks (config, state, error handling, caches,
//! the summary pipeline, routes) so integration tests and the binary
//! entrypoint can both access them.

pub mod background;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
pub mod summary;
