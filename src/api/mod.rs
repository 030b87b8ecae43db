pub mod ask;
pub mod config;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Routes served by `wiki-answer serve`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ask", post(ask::ask))
        .route("/api/config", get(config::get_config))
        .with_state(state)
}
