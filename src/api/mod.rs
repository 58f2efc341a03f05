//! HTTP API module
//!
//! The presentation surface: each endpoint is one clock gesture.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/:side/start", post(start_handler))
        .route("/:side/stop", post(stop_handler))
        .route("/:side/reset", post(reset_handler))
        .route("/:side/value", put(edit_handler))
        .route("/stop-all", post(stop_all_handler))
        .route("/reset-all", post(reset_all_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
