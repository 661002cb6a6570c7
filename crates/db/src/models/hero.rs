//! Hero, stats and affiliation rows.

use serde::Serialize;
use sqlx::FromRow;
use superheroes_core::hero::{
    AffiliationRecord, FullHero, HeroRecord, HeroTable, StatsRecord,
};
use superheroes_core::types::DbId;

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// A row from the `hero` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Hero {
    pub id: DbId,
    pub name: Option<String>,
    pub alias: Option<String>,
    pub species: Option<String>,
    pub first_appearance: Option<String>,
    pub publisher: Option<String>,
}

/// A row from the `hero_stats` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct HeroStats {
    pub id: DbId,
    pub intelligence: i32,
    pub strength: i32,
    pub speed: i32,
    pub durability: i32,
    pub power: i32,
    pub combat: i32,
}

/// A row from the `hero_affiliation` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct HeroAffiliation {
    pub id: DbId,
    pub affiliation: String,
}

// ---------------------------------------------------------------------------
// Query rows
// ---------------------------------------------------------------------------

/// A hero joined with its stats and the array of its affiliations.
///
/// Stats come from a left join, so every stats column is nullable here.
#[derive(Debug, Clone, FromRow)]
pub struct HeroRow {
    pub id: DbId,
    pub name: Option<String>,
    pub alias: Option<String>,
    pub species: Option<String>,
    pub first_appearance: Option<String>,
    pub publisher: Option<String>,
    pub stats_id: Option<DbId>,
    pub intelligence: Option<i32>,
    pub strength: Option<i32>,
    pub speed: Option<i32>,
    pub durability: Option<i32>,
    pub power: Option<i32>,
    pub combat: Option<i32>,
    pub affiliations: Vec<String>,
}

impl HeroRow {
    /// Reshape a joined row into the response projection.
    pub fn into_full_hero(self) -> FullHero {
        let stats = self.stats_id.map(|id| StatsRecord {
            id,
            intelligence: self.intelligence.unwrap_or_default(),
            strength: self.strength.unwrap_or_default(),
            speed: self.speed.unwrap_or_default(),
            durability: self.durability.unwrap_or_default(),
            power: self.power.unwrap_or_default(),
            combat: self.combat.unwrap_or_default(),
        });

        FullHero {
            info: HeroRecord {
                id: self.id,
                name: self.name,
                alias: self.alias,
                species: self.species,
                first_appearance: self.first_appearance,
                publisher: self.publisher,
            },
            stats,
            affiliations: self.affiliations,
        }
    }
}

/// One member alias of a team.
#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberRow {
    pub alias: Option<String>,
}

/// An affiliation and the aliases of every hero in it.
#[derive(Debug, Clone, FromRow)]
pub struct TeamRow {
    pub team: String,
    pub members: Vec<Option<String>>,
}

/// A hero alias and its value for one ranked stat.
#[derive(Debug, Clone, FromRow)]
pub struct StrongestRow {
    pub alias: Option<String>,
    pub value: Option<i32>,
}

// ---------------------------------------------------------------------------
// Batches and update results
// ---------------------------------------------------------------------------

/// A batch of normalized rows destined for one table.
#[derive(Debug, Clone, Copy)]
pub enum TableRows<'a> {
    Hero(&'a [HeroRecord]),
    Stats(&'a [StatsRecord]),
    Affiliation(&'a [AffiliationRecord]),
}

impl TableRows<'_> {
    /// The table these rows belong to.
    pub fn table(&self) -> HeroTable {
        match self {
            Self::Hero(_) => HeroTable::Hero,
            Self::Stats(_) => HeroTable::Stats,
            Self::Affiliation(_) => HeroTable::Affiliation,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Hero(rows) => rows.len(),
            Self::Stats(rows) => rows.len(),
            Self::Affiliation(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The row(s) written by an update, shaped per table.
///
/// Dependent tables are returned together with the owning hero's alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UpdatedRow {
    Hero(Hero),
    Stats {
        alias: Option<String>,
        hero_stats: HeroStats,
    },
    Affiliation {
        alias: Option<String>,
        hero_affiliation: Vec<HeroAffiliation>,
    },
}
