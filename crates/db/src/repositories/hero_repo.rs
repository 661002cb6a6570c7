//! Repository for the `hero`, `hero_stats` and `hero_affiliation` tables.
//!
//! Provides bulk ingestion, raw reads, alias-keyed deletes and the generic
//! column update behind `POST /fix`.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use superheroes_core::error::CoreError;
use superheroes_core::hero::{AffiliationRecord, HeroRecord, HeroTable, StatsRecord};
use superheroes_core::types::DbId;
use superheroes_core::update::{FieldValue, HeroUpdate};

use crate::error::DbError;
use crate::models::hero::{Hero, HeroAffiliation, HeroStats, TableRows, UpdatedRow};

/// Column list for `hero` queries.
const HERO_COLUMNS: &str = "id, name, alias, species, first_appearance, publisher";

/// Column list for `hero_stats` queries.
const STATS_COLUMNS: &str = "id, intelligence, strength, speed, durability, power, combat";

/// Column list for `hero_affiliation` queries.
const AFFILIATION_COLUMNS: &str = "id, affiliation";

/// PostgreSQL accepts at most this many bind parameters per statement.
const MAX_BIND_PARAMS: usize = 65_535;

/// Provides ingestion, read, update and delete operations for heroes.
pub struct HeroRepo;

impl HeroRepo {
    // -----------------------------------------------------------------------
    // Ingestion
    // -----------------------------------------------------------------------

    /// Insert a batch of normalized rows into `table_name` and return the
    /// number of rows written.
    ///
    /// Each call runs in its own transaction. Separate calls for heroes,
    /// stats and affiliations are not linked: a failure between them leaves
    /// the earlier tables populated.
    pub async fn bulk_insert(
        pool: &PgPool,
        table_name: &str,
        rows: TableRows<'_>,
    ) -> Result<u64, DbError> {
        let table = HeroTable::from_str(table_name)?;
        if rows.table() != table {
            return Err(CoreError::Validation(format!(
                "Rows for table '{}' cannot be written to '{table}'",
                rows.table()
            ))
            .into());
        }
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let written = match rows {
            TableRows::Hero(heroes) => insert_heroes(&mut tx, heroes).await?,
            TableRows::Stats(stats) => insert_stats(&mut tx, stats).await?,
            TableRows::Affiliation(affiliations) => {
                insert_affiliations(&mut tx, affiliations).await?
            }
        };
        tx.commit().await?;

        tracing::info!(table = %table, rows = written, "Bulk insert complete");
        Ok(written)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Run `sql` verbatim with the given bound arguments and decode each row.
    ///
    /// The SQL is not inspected. Callers must bind every request value
    /// through `args` and never format one into `sql`.
    pub async fn read<T>(
        pool: &PgPool,
        sql: &str,
        args: PgArguments,
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql, "Running query");
        sqlx::query_as_with::<_, T, _>(sql, args)
            .fetch_all(pool)
            .await
    }

    /// Find the id and stored alias of every hero whose alias matches
    /// `alias` ignoring case, ordered by id.
    pub async fn find_by_alias(
        pool: &PgPool,
        alias: &str,
    ) -> Result<Vec<(DbId, Option<String>)>, sqlx::Error> {
        sqlx::query_as("SELECT id, alias FROM hero WHERE lower(alias) = lower($1) ORDER BY id")
            .bind(alias)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Delete every hero whose alias matches `alias` ignoring case.
    ///
    /// Stats and affiliations go with them through `ON DELETE CASCADE`.
    /// Aliases are not unique, so this can remove several heroes. Returns the
    /// number of heroes deleted (0 when nothing matched).
    pub async fn delete_by_alias(pool: &PgPool, alias: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hero WHERE lower(alias) = lower($1)")
            .bind(alias)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Apply a validated update to the hero matching `update.alias`.
    ///
    /// Fails with `NotFound` when no hero (or no row in the target table)
    /// matches, and with `Conflict` when the alias matches more than one hero
    /// or an affiliation update would hit more than one affiliation row.
    pub async fn update(pool: &PgPool, update: &HeroUpdate) -> Result<UpdatedRow, DbError> {
        let (id, alias) = resolve_single_hero(pool, &update.alias).await?;
        let mut builder = update_statement(update, id);

        match update.table {
            HeroTable::Hero => {
                builder.push(format!(" RETURNING {HERO_COLUMNS}"));
                let hero = builder
                    .build_query_as::<Hero>()
                    .fetch_optional(pool)
                    .await?
                    .ok_or_else(|| not_found("Hero", &update.alias))?;
                Ok(UpdatedRow::Hero(hero))
            }
            HeroTable::Stats => {
                builder.push(format!(" RETURNING {STATS_COLUMNS}"));
                let hero_stats = builder
                    .build_query_as::<HeroStats>()
                    .fetch_optional(pool)
                    .await?
                    .ok_or_else(|| not_found("HeroStats", &update.alias))?;
                Ok(UpdatedRow::Stats { alias, hero_stats })
            }
            HeroTable::Affiliation => {
                ensure_single_affiliation(pool, id, &update.alias).await?;
                let result = builder.build().execute(pool).await?;
                if result.rows_affected() == 0 {
                    return Err(not_found("HeroAffiliation", &update.alias).into());
                }
                let query = format!(
                    "SELECT {AFFILIATION_COLUMNS} FROM hero_affiliation \
                     WHERE id = $1 ORDER BY affiliation"
                );
                let hero_affiliation = sqlx::query_as::<_, HeroAffiliation>(&query)
                    .bind(id)
                    .fetch_all(pool)
                    .await?;
                Ok(UpdatedRow::Affiliation {
                    alias,
                    hero_affiliation,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(entity: &'static str, alias: &str) -> CoreError {
    CoreError::NotFound {
        entity,
        key: alias.to_string(),
    }
}

/// Resolve an alias to exactly one hero. Several matches are reported as a
/// conflict instead of picking one.
async fn resolve_single_hero(
    pool: &PgPool,
    alias: &str,
) -> Result<(DbId, Option<String>), DbError> {
    let mut matches = HeroRepo::find_by_alias(pool, alias).await?;
    match matches.len() {
        0 => Err(not_found("Hero", alias).into()),
        1 => Ok(matches.remove(0)),
        n => Err(CoreError::Conflict(format!(
            "Alias '{alias}' matches {n} heroes; refusing to pick one"
        ))
        .into()),
    }
}

/// An affiliation update is keyed by hero id alone, so it only has a single
/// target row when the hero belongs to exactly one group.
async fn ensure_single_affiliation(
    pool: &PgPool,
    id: DbId,
    alias: &str,
) -> Result<(), DbError> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM hero_affiliation WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
    match count {
        0 => Err(not_found("HeroAffiliation", alias).into()),
        1 => Ok(()),
        n => Err(CoreError::Conflict(format!(
            "Hero '{alias}' has {n} affiliations; refusing to pick which one to update"
        ))
        .into()),
    }
}

/// Build `UPDATE <table> SET col = $n, ... WHERE id = $m`.
///
/// Table and column names come from `HeroTable` and its allow-list; every
/// value is bound.
fn update_statement(update: &HeroUpdate, id: DbId) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", update.table.as_str()));

    let mut assignments = builder.separated(", ");
    for change in &update.changes {
        assignments.push(change.column);
        assignments.push_unseparated(" = ");
        match &change.value {
            FieldValue::Text(text) => assignments.push_bind_unseparated(text.as_deref()),
            FieldValue::Int(n) => assignments.push_bind_unseparated(*n),
        };
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder
}

fn rows_per_statement(columns: usize) -> usize {
    MAX_BIND_PARAMS / columns
}

async fn insert_heroes(
    conn: &mut PgConnection,
    heroes: &[HeroRecord],
) -> Result<u64, sqlx::Error> {
    let mut written = 0;
    for chunk in heroes.chunks(rows_per_statement(6)) {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("INSERT INTO hero ({HERO_COLUMNS}) "));
        builder.push_values(chunk, |mut row, hero| {
            row.push_bind(hero.id)
                .push_bind(hero.name.as_deref())
                .push_bind(hero.alias.as_deref())
                .push_bind(hero.species.as_deref())
                .push_bind(hero.first_appearance.as_deref())
                .push_bind(hero.publisher.as_deref());
        });
        written += builder.build().execute(&mut *conn).await?.rows_affected();
    }
    Ok(written)
}

async fn insert_stats(
    conn: &mut PgConnection,
    stats: &[StatsRecord],
) -> Result<u64, sqlx::Error> {
    let mut written = 0;
    for chunk in stats.chunks(rows_per_statement(7)) {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("INSERT INTO hero_stats ({STATS_COLUMNS}) "));
        builder.push_values(chunk, |mut row, stats| {
            row.push_bind(stats.id)
                .push_bind(stats.intelligence)
                .push_bind(stats.strength)
                .push_bind(stats.speed)
                .push_bind(stats.durability)
                .push_bind(stats.power)
                .push_bind(stats.combat);
        });
        written += builder.build().execute(&mut *conn).await?.rows_affected();
    }
    Ok(written)
}

/// A group listed twice in one hero's string would collide on the
/// `(id, affiliation)` key, so duplicates are skipped.
async fn insert_affiliations(
    conn: &mut PgConnection,
    affiliations: &[AffiliationRecord],
) -> Result<u64, sqlx::Error> {
    let mut written = 0;
    for chunk in affiliations.chunks(rows_per_statement(2)) {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO hero_affiliation ({AFFILIATION_COLUMNS}) "
        ));
        builder.push_values(chunk, |mut row, record| {
            row.push_bind(record.id).push_bind(record.affiliation.as_str());
        });
        builder.push(" ON CONFLICT (id, affiliation) DO NOTHING");
        written += builder.build().execute(&mut *conn).await?.rows_affected();
    }
    Ok(written)
}
