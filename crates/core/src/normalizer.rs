//! Maps raw catalog records onto the three persisted projections.
//!
//! All functions are pure. Missing sub-mappings and missing ratings are
//! filled with defaults here, so nothing downstream sees a partial record.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::hero::{
    AffiliationRecord, HeroRecord, NormalizedHero, RawAppearance, RawBiography, RawConnections,
    RawHero, StatColumn, StatsRecord,
};

/// The catalog separates groups with either ", " or "; ".
const AFFILIATION_SEPARATOR_PATTERN: &str = ", |; ";

static AFFILIATION_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AFFILIATION_SEPARATOR_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Project a raw record onto the `hero` table.
pub fn to_hero(raw: &RawHero) -> HeroRecord {
    let bio = raw.biography.clone().unwrap_or_default();
    let appearance = raw.appearance.clone().unwrap_or_default();

    HeroRecord {
        id: raw.id,
        name: bio.full_name,
        alias: raw.name.clone(),
        species: appearance.race,
        first_appearance: bio.first_appearance,
        publisher: bio.publisher,
    }
}

/// Project a raw record onto the `hero_stats` table.
///
/// Every rating starts at 0 and any rating the catalog supplies overwrites it.
pub fn to_stats(raw: &RawHero) -> StatsRecord {
    let mut stats = StatsRecord::zeroed(raw.id);
    if let Some(supplied) = &raw.powerstats {
        for column in StatColumn::ALL {
            if let Some(value) = supplied.get(column) {
                stats.set(column, value);
            }
        }
    }
    stats
}

/// Project a raw record onto `hero_affiliation` rows, one per group.
///
/// An empty affiliation string produces a single row with an empty name.
pub fn to_affiliations(raw: &RawHero) -> Vec<AffiliationRecord> {
    let connections: RawConnections = raw.connections.clone().unwrap_or_default();
    let groups = connections.group_affiliation.unwrap_or_default();

    split_affiliations(&groups)
        .into_iter()
        .map(|affiliation| AffiliationRecord {
            id: raw.id,
            affiliation: affiliation.to_string(),
        })
        .collect()
}

/// Split a catalog affiliation string on ", " and "; " in a single pass.
///
/// Tokens are returned as-is: no trimming, no filtering of empty tokens.
pub fn split_affiliations(groups: &str) -> Vec<&str> {
    AFFILIATION_SEPARATOR_RE.split(groups).collect()
}

/// All three projections of one record.
pub fn to_all(raw: &RawHero) -> NormalizedHero {
    NormalizedHero {
        hero: to_hero(raw),
        stats: to_stats(raw),
        affiliations: to_affiliations(raw),
    }
}

// ---------------------------------------------------------------------------
// Selector-driven normalization
// ---------------------------------------------------------------------------

/// Which projection to run over each raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    All,
    Hero,
    Stats,
    Affiliation,
}

/// All valid projection strings.
const VALID_PROJECTION_STRINGS: &[&str] = &["all", "hero", "stats", "affiliation"];

impl Projection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Hero => "hero",
            Self::Stats => "stats",
            Self::Affiliation => "affiliation",
        }
    }

    /// Parse a projection selector from a string slice.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "all" => Ok(Self::All),
            "hero" => Ok(Self::Hero),
            "stats" => Ok(Self::Stats),
            "affiliation" => Ok(Self::Affiliation),
            _ => Err(CoreError::Validation(format!(
                "Invalid projection '{s}'. Must be one of: {}",
                VALID_PROJECTION_STRINGS.join(", ")
            ))),
        }
    }
}

/// Output of one projection over one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    All(NormalizedHero),
    Hero(HeroRecord),
    Stats(StatsRecord),
    Affiliation(Vec<AffiliationRecord>),
}

/// Run `projection` over a single record.
pub fn normalize(projection: Projection, raw: &RawHero) -> Normalized {
    match projection {
        Projection::All => Normalized::All(to_all(raw)),
        Projection::Hero => Normalized::Hero(to_hero(raw)),
        Projection::Stats => Normalized::Stats(to_stats(raw)),
        Projection::Affiliation => Normalized::Affiliation(to_affiliations(raw)),
    }
}

/// Normalize a batch of raw records with the projection named by `selector`.
///
/// The selector is validated before any record is touched.
pub fn parse_raw_response(selector: &str, data: &[RawHero]) -> Result<Vec<Normalized>, CoreError> {
    let projection = Projection::from_str(selector)?;
    Ok(data.iter().map(|raw| normalize(projection, raw)).collect())
}
