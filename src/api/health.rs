use axum::{extract::State, Json};

use crate::api::AppState;
use crate::models::HealthResponse;

/// Handler for GET /health
///
/// Reports cache liveness and counters; never fails.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.cache.store();
    Json(HealthResponse::healthy(
        store.backend_name(),
        store.is_live(),
        &state.cache.stats(),
    ))
}
