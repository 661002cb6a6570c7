//! Initial load of the hero catalog into the database.
//!
//! Fetches raw records, normalizes each with [`to_all`] and writes the three
//! tables in dependency order: `hero`, then `hero_stats`, then
//! `hero_affiliation`. The three writes are separate transactions.

use superheroes_core::hero::{
    AffiliationRecord, HeroRecord, RawHero, StatsRecord, TABLE_HERO, TABLE_HERO_AFFILIATION,
    TABLE_HERO_STATS,
};
use superheroes_core::normalizer::to_all;
use superheroes_db::models::hero::TableRows;
use superheroes_db::repositories::HeroRepo;
use superheroes_db::{DbError, DbPool};
use superheroes_source::{HeroSelector, HeroSourceClient, SourceError};

/// Errors from a catalog load.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for IngestError {
    fn from(err: sqlx::Error) -> Self {
        IngestError::Db(DbError::Sqlx(err))
    }
}

/// Rows written per table by one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub heroes: u64,
    pub stats: u64,
    pub affiliations: u64,
}

/// Fetch `selector` from the catalog and store every record.
pub async fn load_catalog(
    pool: &DbPool,
    client: &HeroSourceClient,
    selector: HeroSelector,
) -> Result<LoadSummary, IngestError> {
    let raw = client.fetch(selector).await?;
    tracing::info!(records = raw.len(), "Fetched hero catalog");

    Ok(store_heroes(pool, &raw).await?)
}

/// Normalize raw records and bulk insert them into the three tables.
///
/// Not atomic across tables: if a later insert fails, earlier tables keep
/// their rows.
pub async fn store_heroes(pool: &DbPool, raw: &[RawHero]) -> Result<LoadSummary, DbError> {
    let mut heroes: Vec<HeroRecord> = Vec::with_capacity(raw.len());
    let mut stats: Vec<StatsRecord> = Vec::with_capacity(raw.len());
    let mut affiliations: Vec<AffiliationRecord> = Vec::new();

    for record in raw {
        let normalized = to_all(record);
        heroes.push(normalized.hero);
        stats.push(normalized.stats);
        affiliations.extend(normalized.affiliations);
    }

    let heroes = HeroRepo::bulk_insert(pool, TABLE_HERO, TableRows::Hero(&heroes)).await?;
    let stats = HeroRepo::bulk_insert(pool, TABLE_HERO_STATS, TableRows::Stats(&stats)).await?;
    let affiliations = HeroRepo::bulk_insert(
        pool,
        TABLE_HERO_AFFILIATION,
        TableRows::Affiliation(&affiliations),
    )
    .await?;

    let summary = LoadSummary {
        heroes,
        stats,
        affiliations,
    };
    tracing::info!(
        heroes = summary.heroes,
        stats = summary.stats,
        affiliations = summary.affiliations,
        "Hero catalog stored"
    );
    Ok(summary)
}
