use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and the active engine settings.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let engine = &state.config.engine;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobfit",
        "engine": {
            "keyword_limit": engine.keyword_limit,
            "scoring_window": engine.scoring_window,
            "display_window": engine.display_window,
            "match_mode": engine.match_mode,
            "suggestion_timeout_secs": engine.suggestion_timeout.as_secs()
        },
        "suggestion_service": state.suggestion_service.is_some()
    }))
}
