//! Read queries behind the hero and team endpoints.
//!
//! Every query text here is constant (or built only from allow-listed
//! identifiers); request values travel as bound arguments through
//! [`HeroRepo::read`].

use sqlx::postgres::PgArguments;
use sqlx::{Arguments, PgPool};
use superheroes_core::hero::StatColumn;

use crate::models::hero::{HeroRow, StrongestRow, TeamMemberRow, TeamRow};
use crate::repositories::HeroRepo;

/// Default number of heroes returned by the ranking query.
pub const DEFAULT_STRONGEST_LIMIT: i64 = 5;

/// Heroes whose alias matches `$1` as an `ILIKE` pattern, joined with stats
/// and an array of their affiliations.
const HEROES_BY_ALIAS_SQL: &str = "\
    SELECT h.id, h.name, h.alias, h.species, h.first_appearance, h.publisher, \
           hs.id AS stats_id, hs.intelligence, hs.strength, hs.speed, \
           hs.durability, hs.power, hs.combat, \
           ARRAY(SELECT ha.affiliation FROM hero_affiliation ha \
                 WHERE ha.id = h.id ORDER BY ha.affiliation) AS affiliations \
    FROM hero h \
    LEFT JOIN hero_stats hs ON hs.id = h.id \
    WHERE h.alias ILIKE $1 \
    ORDER BY h.id";

/// Aliases of heroes in the affiliation equal to `$1` ignoring case.
const TEAM_MEMBERS_SQL: &str = "\
    SELECT h.alias \
    FROM hero_affiliation ha \
    JOIN hero h ON h.id = ha.id \
    WHERE lower(ha.affiliation) = lower($1) \
    ORDER BY h.id";

/// Affiliations containing `$1` ignoring case, each with its member aliases.
const FUZZY_TEAMS_SQL: &str = "\
    SELECT ha.affiliation AS team, \
           array_agg(h.alias ORDER BY h.id) AS members \
    FROM hero_affiliation ha \
    JOIN hero h ON h.id = ha.id \
    WHERE ha.affiliation ILIKE '%' || $1 || '%' \
    GROUP BY ha.affiliation \
    ORDER BY ha.affiliation";

/// Provides the read-side queries for heroes and teams.
pub struct HeroQueryRepo;

impl HeroQueryRepo {
    /// Heroes whose alias matches `pattern` case-insensitively. `%` and `_`
    /// in the pattern act as `ILIKE` wildcards.
    pub async fn find_by_alias(
        pool: &PgPool,
        pattern: &str,
    ) -> Result<Vec<HeroRow>, sqlx::Error> {
        HeroRepo::read(pool, HEROES_BY_ALIAS_SQL, single_arg(pattern)?).await
    }

    /// Aliases of every member of `team` (exact, case-insensitive match).
    pub async fn team_members(
        pool: &PgPool,
        team: &str,
    ) -> Result<Vec<Option<String>>, sqlx::Error> {
        let rows: Vec<TeamMemberRow> =
            HeroRepo::read(pool, TEAM_MEMBERS_SQL, single_arg(team)?).await?;
        Ok(rows.into_iter().map(|row| row.alias).collect())
    }

    /// Every affiliation containing `name` (case-insensitive), with members.
    pub async fn fuzzy_teams(pool: &PgPool, name: &str) -> Result<Vec<TeamRow>, sqlx::Error> {
        HeroRepo::read(pool, FUZZY_TEAMS_SQL, single_arg(name)?).await
    }

    /// The `limit` heroes with the highest value of `stat`, highest first.
    ///
    /// Heroes without a stats row sort last. Ties are broken by hero id.
    pub async fn strongest(
        pool: &PgPool,
        stat: StatColumn,
        limit: i64,
    ) -> Result<Vec<StrongestRow>, sqlx::Error> {
        let column = stat.as_str();
        let sql = format!(
            "SELECT h.alias, hs.{column} AS value \
             FROM hero h \
             LEFT JOIN hero_stats hs ON hs.id = h.id \
             ORDER BY hs.{column} DESC NULLS LAST, h.id \
             LIMIT $1"
        );
        let mut args = PgArguments::default();
        args.add(limit).map_err(sqlx::Error::Encode)?;
        HeroRepo::read(pool, &sql, args).await
    }
}

fn single_arg(value: &str) -> Result<PgArguments, sqlx::Error> {
    let mut args = PgArguments::default();
    args.add(value.to_string()).map_err(sqlx::Error::Encode)?;
    Ok(args)
}
