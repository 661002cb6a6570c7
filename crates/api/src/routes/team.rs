use axum::routing::get;
use axum::Router;

use crate::handlers::team;
use crate::state::AppState;

/// ```text
/// GET /team/{team}         -> get_team
/// GET /team/fuzzy/{name}   -> fuzzy_teams
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/team/{team}", get(team::get_team))
        .route("/team/fuzzy/{name}", get(team::fuzzy_teams))
}
