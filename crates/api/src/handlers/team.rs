//! Handlers for affiliation (team) lookups.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{Map, Value};
use superheroes_db::repositories::HeroQueryRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /team/{team}
///
/// Aliases of every hero in `team`, matched exactly but ignoring case.
/// The response is keyed by the team name as requested.
pub async fn get_team(
    State(state): State<AppState>,
    Path(team): Path<String>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!(%team, "Looking up team members");

    let members = HeroQueryRepo::team_members(&state.pool, &team).await?;

    let mut body = Map::new();
    body.insert(team, members.into());
    Ok(Json(body))
}

/// GET /team/fuzzy/{name}
///
/// Every affiliation containing `name` ignoring case, each mapped to the
/// aliases of its members.
pub async fn fuzzy_teams(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!(%name, "Searching teams");

    let teams = HeroQueryRepo::fuzzy_teams(&state.pool, &name).await?;

    let body: Map<String, Value> = teams
        .into_iter()
        .map(|row| (row.team, row.members.into()))
        .collect();
    Ok(Json(body))
}
