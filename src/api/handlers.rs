//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    engine::Side,
    state::{app_state::ActionError, AppState},
};
use super::responses::{ApiResponse, EditRequest, HealthResponse, StatusResponse};

type GestureResult = Result<Json<ApiResponse>, ActionError>;

fn log_refusal(action: &str, err: &ActionError) {
    match err {
        ActionError::Internal(e) => error!("{} failed: {}", action, e),
        other => warn!("{} refused: {}", action, other),
    }
}

/// Handle POST /:side/start - Start one timer and stop the other
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(side): Path<Side>,
) -> GestureResult {
    match state.start(side) {
        Ok(clock) => {
            info!("Start endpoint called - {} timer running", side);
            Ok(Json(ApiResponse::new(format!("{} timer started", side), clock)))
        }
        Err(e) => {
            log_refusal("Start", &e);
            Err(e)
        }
    }
}

/// Handle POST /:side/stop - Stop one timer
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
    Path(side): Path<Side>,
) -> GestureResult {
    let clock = state.stop(side).inspect_err(|e| log_refusal("Stop", e))?;
    Ok(Json(ApiResponse::new(format!("{} timer stopped", side), clock)))
}

/// Handle POST /:side/reset - Zero one timer
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(side): Path<Side>,
) -> GestureResult {
    let clock = state.reset(side).inspect_err(|e| log_refusal("Reset", e))?;
    Ok(Json(ApiResponse::new(format!("{} timer reset", side), clock)))
}

/// Handle PUT /:side/value - Edit a stopped timer
pub async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Path(side): Path<Side>,
    Json(request): Json<EditRequest>,
) -> GestureResult {
    match state.edit(side, &request.value) {
        Ok(clock) => {
            info!("Edit endpoint called - {} timer set to {}", side, request.value);
            Ok(Json(ApiResponse::new(format!("{} timer updated", side), clock)))
        }
        Err(e) => {
            log_refusal("Edit", &e);
            Err(e)
        }
    }
}

/// Handle POST /stop-all - Stop both timers
pub async fn stop_all_handler(State(state): State<Arc<AppState>>) -> GestureResult {
    let clock = state.stop_all().inspect_err(|e| log_refusal("Stop all", e))?;
    info!("Stop-all endpoint called");
    Ok(Json(ApiResponse::new("All timers stopped".to_string(), clock)))
}

/// Handle POST /reset-all - Zero both timers
pub async fn reset_all_handler(State(state): State<Arc<AppState>>) -> GestureResult {
    let clock = state.reset_all().inspect_err(|e| log_refusal("Reset all", e))?;
    info!("Reset-all endpoint called");
    Ok(Json(ApiResponse::new("All timers reset".to_string(), clock)))
}

/// Handle GET /status - Return both timers and server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let clock = match state.get_snapshot() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get clock state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        clock,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
