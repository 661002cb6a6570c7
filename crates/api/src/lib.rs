//! Superheroes API server library.
//!
//! Exposes config, state, error handling, routes and the catalog ingestion
//! pipeline so integration tests and both binaries share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod router;
pub mod routes;
pub mod state;
