//! Family graph routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::family::FamilyId;
use crate::graph::{Graph, ViewMode};
use crate::services::graph::{GraphLoadError, refresh_view, toggle_view};
use crate::state::{AppState, GraphView};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

/// JSON error response: `{ "code": ..., "message": ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { code: self.code, message: self.message })).into_response()
    }
}

impl From<GraphLoadError> for ApiError {
    fn from(err: GraphLoadError) -> Self {
        Self { status: load_error_to_status(&err), code: err.error_code(), message: err.user_message() }
    }
}

pub(crate) fn load_error_to_status(err: &GraphLoadError) -> StatusCode {
    match err {
        _ if err.is_not_found() => StatusCode::NOT_FOUND,
        GraphLoadError::DataFetch { .. } => StatusCode::BAD_GATEWAY,
        GraphLoadError::DataShape { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        GraphLoadError::GraphBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    pub mode: Option<ViewMode>,
}

/// `GET /api/families/:id/graph` — load and build the family's graph.
pub async fn get_graph(
    State(state): State<AppState>,
    Path(family_id): Path<FamilyId>,
    Query(query): Query<GraphQuery>,
) -> Result<Json<Graph>, ApiError> {
    let graph = refresh_view(&state, family_id, query.mode).await?;
    Ok(Json(graph))
}

/// `POST /api/families/:id/graph/toggle` — flip the view mode and reload.
pub async fn toggle_graph(
    State(state): State<AppState>,
    Path(family_id): Path<FamilyId>,
) -> Result<Json<Graph>, ApiError> {
    let graph = toggle_view(&state, family_id).await?;
    Ok(Json(graph))
}

/// `GET /api/families/:id/graph/view` — the stored view state.
pub async fn get_view(
    State(state): State<AppState>,
    Path(family_id): Path<FamilyId>,
) -> Result<Json<GraphView>, ApiError> {
    state.view(family_id).await.map(Json).ok_or_else(|| ApiError {
        status: StatusCode::NOT_FOUND,
        code: "E_VIEW_NOT_FOUND",
        message: format!("Family {family_id} has not been loaded yet."),
    })
}

#[cfg(test)]
#[path = "families_test.rs"]
mod tests;
