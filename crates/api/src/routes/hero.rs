//! Route definitions for hero reads and mutations.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::hero;
use crate::state::AppState;

/// ```text
/// GET    /hero/{name}             -> get_heroes
/// GET    /hero/strongest/{stat}   -> strongest
/// POST   /fix                     -> fix_hero
/// DELETE /delete/{name}           -> delete_hero
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hero/{name}", get(hero::get_heroes))
        .route("/hero/strongest/{stat}", get(hero::strongest))
        .route("/fix", post(hero::fix_hero))
        .route("/delete/{name}", delete(hero::delete_hero))
}
