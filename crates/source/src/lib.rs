//! Read-only client for the external superhero catalog.

pub mod client;

pub use client::{HeroSelector, HeroSourceClient, SourceError, DEFAULT_API_URL};
