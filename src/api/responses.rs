//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{engine::ClockSnapshot, state::app_state::ActionError};

/// API response structure for clock gestures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub clock: ClockSnapshot,
}

impl ApiResponse {
    /// Create a new API response; status reflects whether a timer is running
    pub fn new(message: String, clock: ClockSnapshot) -> Self {
        let status = match clock.running {
            Some(_) => "running",
            None => "stopped",
        };

        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            clock,
        }
    }
}

/// Body of a `PUT /:side/value` edit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    /// `HH:MM:SS`
    pub value: String,
}

/// Error body returned for refused gestures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let code = match &self {
            ActionError::AlreadyRunning(_) | ActionError::EditWhileRunning(_) => {
                StatusCode::CONFLICT
            }
            ActionError::InvalidValue(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ActionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (code, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Status response with both timers and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub clock: ClockSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
