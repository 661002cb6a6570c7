//! Hero domain types.
//!
//! Two families of types live here:
//!
//! - The raw catalog record ([`RawHero`] and its sub-mappings) as the external
//!   superhero API returns it. Every sub-mapping and field is optional.
//! - The flat projections persisted to the `hero`, `hero_stats` and
//!   `hero_affiliation` tables, plus [`FullHero`] which is what the read
//!   endpoints return.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Tables and columns
// ---------------------------------------------------------------------------

pub const TABLE_HERO: &str = "hero";
pub const TABLE_HERO_STATS: &str = "hero_stats";
pub const TABLE_HERO_AFFILIATION: &str = "hero_affiliation";

/// All valid table name strings.
const VALID_TABLE_STRINGS: &[&str] = &[TABLE_HERO, TABLE_HERO_STATS, TABLE_HERO_AFFILIATION];

/// Columns of `hero` that the update endpoint may change.
pub const HERO_UPDATABLE_COLUMNS: &[&str] =
    &["name", "alias", "species", "first_appearance", "publisher"];

/// Columns of `hero_stats` that the update endpoint may change.
pub const STATS_UPDATABLE_COLUMNS: &[&str] = &[
    "intelligence",
    "strength",
    "speed",
    "durability",
    "power",
    "combat",
];

/// Columns of `hero_affiliation` that the update endpoint may change.
pub const AFFILIATION_UPDATABLE_COLUMNS: &[&str] = &["affiliation"];

/// One of the three persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroTable {
    Hero,
    Stats,
    Affiliation,
}

impl HeroTable {
    /// Return the SQL table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => TABLE_HERO,
            Self::Stats => TABLE_HERO_STATS,
            Self::Affiliation => TABLE_HERO_AFFILIATION,
        }
    }

    /// Parse a table from its SQL name.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            TABLE_HERO => Ok(Self::Hero),
            TABLE_HERO_STATS => Ok(Self::Stats),
            TABLE_HERO_AFFILIATION => Ok(Self::Affiliation),
            _ => Err(CoreError::Validation(format!(
                "Invalid table name '{s}'. Must be one of: {}",
                VALID_TABLE_STRINGS.join(", ")
            ))),
        }
    }

    /// Columns on this table that may be changed through an update.
    ///
    /// `id` never appears: the primary key is owned by the catalog.
    pub fn updatable_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Hero => HERO_UPDATABLE_COLUMNS,
            Self::Stats => STATS_UPDATABLE_COLUMNS,
            Self::Affiliation => AFFILIATION_UPDATABLE_COLUMNS,
        }
    }
}

impl std::fmt::Display for HeroTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the six ability ratings stored in `hero_stats`.
///
/// Ranking queries interpolate a column name into SQL, so the name must come
/// from this enum and never from request text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatColumn {
    Intelligence,
    Strength,
    Speed,
    Durability,
    Power,
    Combat,
}

impl StatColumn {
    pub const ALL: [StatColumn; 6] = [
        Self::Intelligence,
        Self::Strength,
        Self::Speed,
        Self::Durability,
        Self::Power,
        Self::Combat,
    ];

    /// Return the column name as a lowercase string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intelligence => "intelligence",
            Self::Strength => "strength",
            Self::Speed => "speed",
            Self::Durability => "durability",
            Self::Power => "power",
            Self::Combat => "combat",
        }
    }

    /// Parse a stat column, ignoring ASCII case.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.to_ascii_lowercase().as_str() {
            "intelligence" => Ok(Self::Intelligence),
            "strength" => Ok(Self::Strength),
            "speed" => Ok(Self::Speed),
            "durability" => Ok(Self::Durability),
            "power" => Ok(Self::Power),
            "combat" => Ok(Self::Combat),
            _ => Err(CoreError::Validation(format!(
                "Invalid stat '{s}'. Must be one of: {}",
                STATS_UPDATABLE_COLUMNS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw catalog record
// ---------------------------------------------------------------------------

/// A hero as returned by the external catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHero {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: DbId,
    /// The catalog's `name` is the hero's alias (e.g. "Spider-Man").
    pub name: Option<String>,
    pub biography: Option<RawBiography>,
    pub appearance: Option<RawAppearance>,
    pub connections: Option<RawConnections>,
    pub powerstats: Option<RawPowerstats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBiography {
    pub full_name: Option<String>,
    pub first_appearance: Option<String>,
    pub publisher: Option<String>,
}

/// Stand-in used when the catalog omits `biography` entirely.
impl Default for RawBiography {
    fn default() -> Self {
        Self {
            full_name: Some(String::new()),
            first_appearance: Some(String::new()),
            publisher: Some(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawAppearance {
    pub race: Option<String>,
}

impl Default for RawAppearance {
    fn default() -> Self {
        Self {
            race: Some(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConnections {
    pub group_affiliation: Option<String>,
}

impl Default for RawConnections {
    fn default() -> Self {
        Self {
            group_affiliation: Some(String::new()),
        }
    }
}

/// Ability ratings as supplied by the catalog. `None` means the key was
/// absent, null, or the literal string `"null"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawPowerstats {
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub intelligence: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub strength: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub speed: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub durability: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub power: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub combat: Option<i32>,
}

impl RawPowerstats {
    /// Look up the supplied rating for a stat column.
    pub fn get(&self, column: StatColumn) -> Option<i32> {
        match column {
            StatColumn::Intelligence => self.intelligence,
            StatColumn::Strength => self.strength,
            StatColumn::Speed => self.speed,
            StatColumn::Durability => self.durability,
            StatColumn::Power => self.power,
            StatColumn::Combat => self.combat,
        }
    }
}

/// The catalog is inconsistent about numbers: some mirrors quote them.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<DbId, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid hero id '{s}'"))),
    }
}

fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("rating {n} out of range"))),
        Some(NumberOrString::Text(s)) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("null") {
                return Ok(None);
            }
            s.parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid rating '{s}'")))
        }
    }
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Projection onto the `hero` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRecord {
    pub id: DbId,
    /// Biographical full name.
    pub name: Option<String>,
    pub alias: Option<String>,
    pub species: Option<String>,
    pub first_appearance: Option<String>,
    pub publisher: Option<String>,
}

/// Projection onto the `hero_stats` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub id: DbId,
    pub intelligence: i32,
    pub strength: i32,
    pub speed: i32,
    pub durability: i32,
    pub power: i32,
    pub combat: i32,
}

impl StatsRecord {
    /// A stats row with every rating at 0.
    pub fn zeroed(id: DbId) -> Self {
        Self {
            id,
            intelligence: 0,
            strength: 0,
            speed: 0,
            durability: 0,
            power: 0,
            combat: 0,
        }
    }

    pub fn get(&self, column: StatColumn) -> i32 {
        match column {
            StatColumn::Intelligence => self.intelligence,
            StatColumn::Strength => self.strength,
            StatColumn::Speed => self.speed,
            StatColumn::Durability => self.durability,
            StatColumn::Power => self.power,
            StatColumn::Combat => self.combat,
        }
    }

    pub fn set(&mut self, column: StatColumn, value: i32) {
        let slot = match column {
            StatColumn::Intelligence => &mut self.intelligence,
            StatColumn::Strength => &mut self.strength,
            StatColumn::Speed => &mut self.speed,
            StatColumn::Durability => &mut self.durability,
            StatColumn::Power => &mut self.power,
            StatColumn::Combat => &mut self.combat,
        };
        *slot = value;
    }
}

/// Projection onto the `hero_affiliation` table: one row per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationRecord {
    pub id: DbId,
    pub affiliation: String,
}

/// All three projections of one raw record, used for bulk ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedHero {
    pub hero: HeroRecord,
    pub stats: StatsRecord,
    pub affiliations: Vec<AffiliationRecord>,
}

/// A hero as returned by `GET /hero/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullHero {
    pub info: HeroRecord,
    /// `None` when the hero has no `hero_stats` row.
    pub stats: Option<StatsRecord>,
    pub affiliations: Vec<String>,
}
