//! Domain types and pure logic for the superheroes service.
//!
//! Nothing in this crate touches the network or the database. It holds the
//! raw catalog record shape, the per-table projections, the normalizer that
//! maps one onto the other, and validation of update payloads.

pub mod error;
pub mod hero;
pub mod normalizer;
pub mod types;
pub mod update;
