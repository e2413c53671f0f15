pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/keywords", post(handlers::handle_keywords))
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/suggestions", post(handlers::handle_suggestions))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .with_state(state)
}
