//! Axum HTTP handlers and routing.

pub mod map;
pub mod taxonomy;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/map", post(map::map_story))
        .route("/api/taxonomy", get(taxonomy::get_taxonomy))
        .route("/api/config", get(taxonomy::get_config))
        .with_state(state)
}
