pub mod health;
pub mod hero;
pub mod team;

use axum::Router;

use crate::state::AppState;

/// Build the hero and team route tree, mounted at the root.
///
/// Route hierarchy:
///
/// ```text
/// /hero/{name}                  heroes matching an alias pattern (GET)
/// /hero/strongest/{stat}        top heroes by one rating (GET, ?limit=)
/// /fix                          generic column update (POST)
/// /delete/{name}                delete heroes by alias (DELETE)
///
/// /team/{team}                  members of one affiliation (GET)
/// /team/fuzzy/{name}            affiliations containing a substring (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(hero::router()).merge(team::router())
}
