//! Catalog read API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use retrodrop_core::{CatalogError, GameEntry, GameQuery};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Query parameters for `GET /games`.
///
/// `limit` is kept as a string so that a malformed value means "no limit"
/// instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub struct GamesQueryParams {
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl GamesQueryParams {
    pub fn to_query(&self) -> GameQuery {
        GameQuery {
            system: self.system.clone().filter(|s| !s.is_empty()),
            limit: self.limit.as_deref().and_then(parse_limit),
        }
    }
}

/// Positive integers cap the result; anything else means no limit.
fn parse_limit(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|&n| n > 0)
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /systems
///
/// List configured system keys.
pub async fn list_systems(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.query().systems().to_vec())
}

/// GET /games
///
/// List catalog entries, optionally filtered by system and limited.
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GamesQueryParams>,
) -> Result<Json<Vec<GameEntry>>, impl IntoResponse> {
    match state.query().games(params.to_query()).await {
        Ok(entries) => Ok(Json(entries)),
        Err(CatalogError::NotPopulated) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: CatalogError::NotPopulated.to_string(),
            }),
        )),
        Err(e) => {
            error!("Error executing query: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
