//! Handlers for hero lookups, ranking, updates and deletes.
//!
//! SQL lives in `superheroes_db`; these handlers parse the request, call the
//! repository and reshape rows into the response envelope.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use superheroes_core::hero::{FullHero, StatColumn};
use superheroes_core::update::HeroUpdate;
use superheroes_db::models::hero::{StrongestRow, UpdatedRow};
use superheroes_db::repositories::hero_query_repo::DEFAULT_STRONGEST_LIMIT;
use superheroes_db::repositories::{HeroQueryRepo, HeroRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Status string carried by successful mutation and ranking responses.
const STATUS_SUCCESS: &str = "SUCCESS";

#[derive(Debug, Serialize)]
pub struct HeroesResponse {
    pub heroes: Vec<FullHero>,
}

#[derive(Debug, Serialize)]
pub struct StrongestResponse {
    pub status: &'static str,
    /// One `{alias, <stat>: value}` object per hero.
    pub heroes: Vec<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub status: &'static str,
    pub response: UpdatedRow,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
    /// Number of heroes removed.
    pub deleted: u64,
}

/// Query parameters for `GET /hero/strongest/{stat}`.
#[derive(Debug, Deserialize)]
pub struct StrongestParams {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /hero/{name}
///
/// Every hero whose alias matches `name` ignoring case, with stats and
/// affiliations. `%` and `_` act as wildcards. No match is an empty list.
pub async fn get_heroes(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!(%name, "Looking up heroes by alias");

    let heroes = HeroQueryRepo::find_by_alias(&state.pool, &name)
        .await?
        .into_iter()
        .map(|row| row.into_full_hero())
        .collect();

    Ok(Json(HeroesResponse { heroes }))
}

/// GET /hero/strongest/{stat}?limit=N
///
/// The top `limit` heroes (default 5) ranked by one rating, highest first.
pub async fn strongest(
    State(state): State<AppState>,
    Path(stat): Path<String>,
    params: Result<Query<StrongestParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let column = StatColumn::from_str(&stat)?;
    let limit = params.limit.unwrap_or(DEFAULT_STRONGEST_LIMIT);
    if limit < 0 {
        return Err(AppError::BadRequest(format!(
            "limit must be non-negative, got {limit}"
        )));
    }
    tracing::debug!(stat = column.as_str(), limit, "Ranking heroes");

    let rows = HeroQueryRepo::strongest(&state.pool, column, limit).await?;
    let heroes = rows
        .into_iter()
        .map(|row| ranked_hero(column, row))
        .collect();

    Ok(Json(StrongestResponse {
        status: STATUS_SUCCESS,
        heroes,
    }))
}

fn ranked_hero(column: StatColumn, row: StrongestRow) -> Map<String, Value> {
    let mut hero = Map::new();
    hero.insert("alias".to_string(), row.alias.into());
    hero.insert(column.as_str().to_string(), row.value.into());
    hero
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /fix
///
/// Body: `{ "table": ..., "name": <alias>, <column>: <value>, ... }`.
/// The payload is validated in full before the database is touched.
pub async fn fix_hero(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;
    let update = HeroUpdate::from_json(&body)?;
    tracing::debug!(table = %update.table, alias = %update.alias, "Applying hero update");

    let updated = HeroRepo::update(&state.pool, &update).await?;

    tracing::info!(
        table = %update.table,
        alias = %update.alias,
        columns = update.changes.len(),
        "Hero updated",
    );

    Ok(Json(UpdateResponse {
        status: STATUS_SUCCESS,
        response: updated,
    }))
}

/// DELETE /delete/{name}
///
/// Delete every hero whose alias equals `name` ignoring case. Stats and
/// affiliations cascade. Deleting an unknown alias succeeds with `deleted: 0`.
pub async fn delete_hero(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = HeroRepo::delete_by_alias(&state.pool, &name).await?;

    tracing::info!(%name, deleted, "Heroes deleted");

    Ok(Json(DeleteResponse {
        status: STATUS_SUCCESS,
        deleted,
    }))
}
