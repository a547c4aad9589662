//! Graph service — load a family, build its graph, and track the view.
//!
//! DESIGN
//! ======
//! `load_family_graph` is the orchestrator: fetch (with related-family
//! fan-out in expanded mode), then build. It owns no state. `refresh_view`
//! and `toggle_view` wrap it with the per-family view bookkeeping in
//! `AppState`; every call is a full reload and rebuild. A family the API
//! does not know gets no view, and loses any view it had.
//!
//! ERROR HANDLING
//! ==============
//! Primary fetch failures, malformed records and build failures all abort
//! the load. Each maps to one `GraphLoadError` variant with a user-facing
//! message. Build failures only ever get a generic one.

use tracing::{error, info, warn};

use crate::error::ErrorCode;
use crate::family::loader::load_family;
use crate::family::source::{FamilySource, FetchError};
use crate::family::{FamilyId, ShapeError};
use crate::graph::{BuildOptions, Graph, GraphError, ViewMode, build_graph};
use crate::state::{AppState, GraphView, ViewError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GraphLoadError {
    #[error("family {family_id} could not be fetched: {source}")]
    DataFetch { family_id: FamilyId, source: FetchError },
    #[error("family {family_id} record is malformed: {source}")]
    DataShape { family_id: FamilyId, source: ShapeError },
    #[error("graph build failed: {0}")]
    GraphBuild(#[from] GraphError),
}

impl GraphLoadError {
    /// Split shape errors out of a primary-family fetch error.
    #[must_use]
    pub fn from_fetch(family_id: FamilyId, err: FetchError) -> Self {
        match err {
            FetchError::Shape(source) => Self::DataShape { family_id, source },
            source => Self::DataFetch { family_id, source },
        }
    }

    /// The family API answered 404 for the primary family.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DataFetch { source: FetchError::Status { status: 404, .. }, .. })
    }

    /// Message safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::DataFetch { family_id, source: FetchError::Status { status: 404, .. } } => {
                format!("Family {family_id} was not found.")
            }
            Self::DataFetch { family_id, .. } => format!("Could not load family {family_id}."),
            Self::DataShape { family_id, .. } => {
                format!("Family {family_id} has incomplete member or visitor data.")
            }
            Self::GraphBuild(_) => "The family graph could not be built.".to_string(),
        }
    }
}

impl ErrorCode for GraphLoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DataFetch { source, .. } => source.error_code(),
            Self::DataShape { source, .. } => source.error_code(),
            Self::GraphBuild(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::DataFetch { source, .. } => source.retryable(),
            Self::DataShape { .. } | Self::GraphBuild(_) => false,
        }
    }
}

impl From<&GraphLoadError> for ViewError {
    fn from(err: &GraphLoadError) -> Self {
        Self { code: err.error_code(), message: err.user_message() }
    }
}

// =============================================================================
// ORCHESTRATION
// =============================================================================

/// Load `family_id` in `mode` and build its graph.
///
/// # Errors
///
/// Returns `GraphLoadError` if the primary family cannot be fetched, its
/// record is malformed, or graph construction fails. Related-family failures
/// only reduce detail and are not reported here.
pub async fn load_family_graph(
    source: &dyn FamilySource,
    family_id: FamilyId,
    mode: ViewMode,
    options: &BuildOptions,
) -> Result<Graph, GraphLoadError> {
    let family = load_family(source, family_id, mode)
        .await
        .map_err(|e| GraphLoadError::from_fetch(family_id, e))?;
    let graph = build_graph(&family, mode, options)?;
    info!(
        family_id,
        mode = mode.as_str(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        sample = graph.sample,
        "graph built"
    );
    Ok(graph)
}

/// Reload the family's graph and record the outcome in its view.
///
/// `mode` overrides the stored view mode; `None` keeps it.
///
/// # Errors
///
/// Same as [`load_family_graph`]. The view is updated either way, except
/// that a not-found family has its view dropped.
pub async fn refresh_view(
    state: &AppState,
    family_id: FamilyId,
    mode: Option<ViewMode>,
) -> Result<Graph, GraphLoadError> {
    let mode = match mode {
        Some(mode) => mode,
        None => state.view_mode(family_id).await,
    };

    let result = load_family_graph(state.source.as_ref(), family_id, mode, &state.options).await;

    if let Err(e) = &result {
        match e {
            GraphLoadError::GraphBuild(_) => {
                error!(family_id, code = e.error_code(), error = %e, "graph build failed");
            }
            _ => warn!(
                family_id,
                code = e.error_code(),
                retryable = e.retryable(),
                error = %e,
                "family load failed"
            ),
        }
    }

    let mut views = state.views.write().await;
    if result.as_ref().is_err_and(GraphLoadError::is_not_found) {
        views.remove(family_id);
        return result;
    }
    let mut view = views.remove(family_id).unwrap_or_else(|| GraphView::new(mode));
    match &result {
        Ok(graph) => view.show(mode, graph.clone()),
        Err(e) => view.fail(mode, ViewError::from(e)),
    }
    views.insert(family_id, view);
    drop(views);
    result
}

/// Flip the family's view mode and reload.
///
/// # Errors
///
/// Same as [`load_family_graph`].
pub async fn toggle_view(state: &AppState, family_id: FamilyId) -> Result<Graph, GraphLoadError> {
    let mode = state.view_mode(family_id).await.toggled();
    refresh_view(state, family_id, Some(mode)).await
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
