use axum::extract::State;
use axum::Json;

use crate::config::Config;
use crate::state::AppState;

/// GET /api/config - Active configuration (the LLM API key is never serialized)
pub async fn get_config(State(state): State<AppState>) -> Json<Config> {
    Json(state.config.as_ref().clone())
}
