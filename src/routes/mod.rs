//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The renderer talks to this service over a small JSON API: fetch a
//! family's graph, flip its view mode, or read back the stored view.
//! Everything lives under `/api`, plus `/healthz` for probes.

pub mod families;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/families/{id}/graph", get(families::get_graph))
        .route("/api/families/{id}/graph/toggle", post(families::toggle_graph))
        .route("/api/families/{id}/graph/view", get(families::get_view))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
