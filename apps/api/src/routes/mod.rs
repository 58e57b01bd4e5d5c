pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::criteria::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/criteria/generate",
            post(handlers::handle_generate),
        )
        .route("/api/v1/criteria/format", post(handlers::handle_format))
        .route(
            "/api/v1/criteria/export/json",
            post(handlers::handle_export_json),
        )
        .route(
            "/api/v1/criteria/export/text",
            post(handlers::handle_export_text),
        )
        .with_state(state)
}
