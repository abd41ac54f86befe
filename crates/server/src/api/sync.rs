//! Sync API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use retrodrop_core::{SyncError, SyncReport, SyncStatus, SyncStep};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

/// Successful sync response
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub report: SyncReport,
}

/// Failed sync response
#[derive(Debug, Serialize)]
pub struct SyncErrorResponse {
    /// Underlying error
    pub error: String,
    /// Which step failed
    pub message: String,
    pub step: SyncStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl From<&SyncError> for SyncErrorResponse {
    fn from(err: &SyncError) -> Self {
        Self {
            error: err.to_string(),
            message: err.summary(),
            step: err.step(),
            system: err.system().map(str::to_string),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /init
///
/// Run a full catalog sync and respond when it finishes.
pub async fn init(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SyncResponse>, impl IntoResponse> {
    match state.orchestrator().run().await {
        Ok(report) => Ok(Json(SyncResponse {
            message: "Database populated successfully".to_string(),
            report,
        })),
        Err(e) => {
            let status = if matches!(e, SyncError::AlreadyRunning) {
                StatusCode::CONFLICT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            Err((status, Json(SyncErrorResponse::from(&e))))
        }
    }
}

/// GET /sync/status
///
/// Current sync phase and the outcome of the last pass.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<SyncStatus> {
    Json(state.orchestrator().status().await)
}
