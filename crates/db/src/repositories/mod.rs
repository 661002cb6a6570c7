//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod hero_query_repo;
pub mod hero_repo;

pub use hero_query_repo::HeroQueryRepo;
pub use hero_repo::HeroRepo;
