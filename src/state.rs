//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the family source, the build options, and one `GraphView` per
//! family that has been requested. A view records the family's current view
//! mode and the outcome of its last load: the graph, or the error that
//! replaced it. A failed load never leaves a stale graph behind.
//!
//! Views live in a bounded `ViewStore`. Writing a view makes it the most
//! recent; once the store is full the least recently written view is
//! evicted.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::family::FamilyId;
use crate::family::source::FamilySource;
use crate::graph::{BuildOptions, Graph, ViewMode};

// =============================================================================
// GRAPH VIEW
// =============================================================================

/// User-facing description of the last failed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewError {
    pub code: &'static str,
    pub message: String,
}

/// Per-family view state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub mode: ViewMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<Graph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ViewError>,
}

impl GraphView {
    #[must_use]
    pub fn new(mode: ViewMode) -> Self {
        Self { mode, graph: None, error: None }
    }

    /// Record a successful load.
    pub fn show(&mut self, mode: ViewMode, graph: Graph) {
        self.mode = mode;
        self.graph = Some(graph);
        self.error = None;
    }

    /// Record a failed load. The previous graph is discarded.
    pub fn fail(&mut self, mode: ViewMode, error: ViewError) {
        self.mode = mode;
        self.graph = None;
        self.error = Some(error);
    }
}

// =============================================================================
// VIEW STORE
// =============================================================================

pub const DEFAULT_VIEW_CAPACITY: usize = 1024;

/// Per-family views, bounded to `capacity` entries.
#[derive(Debug)]
pub struct ViewStore {
    views: HashMap<FamilyId, GraphView>,
    /// Least recently written first.
    order: VecDeque<FamilyId>,
    capacity: usize,
}

impl ViewStore {
    /// A store holding at most `capacity` views (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { views: HashMap::new(), order: VecDeque::new(), capacity: capacity.max(1) }
    }

    #[must_use]
    pub fn get(&self, family_id: FamilyId) -> Option<&GraphView> {
        self.views.get(&family_id)
    }

    /// Store `view` as the most recent; evicts the oldest view when full.
    pub fn insert(&mut self, family_id: FamilyId, view: GraphView) {
        if self.views.insert(family_id, view).is_some() {
            self.order.retain(|&id| id != family_id);
        }
        self.order.push_back(family_id);
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.views.remove(&evicted);
                debug!(family_id = evicted, "view evicted");
            }
        }
    }

    pub fn remove(&mut self, family_id: FamilyId) -> Option<GraphView> {
        let view = self.views.remove(&family_id)?;
        self.order.retain(|&id| id != family_id);
        Some(view)
    }

    #[cfg(test)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_CAPACITY)
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is cheap (Arc internals).
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn FamilySource>,
    pub options: BuildOptions,
    /// Mode used for a family that has no view yet.
    pub default_mode: ViewMode,
    pub views: Arc<RwLock<ViewStore>>,
}

impl AppState {
    #[must_use]
    pub fn new(source: Arc<dyn FamilySource>, default_mode: ViewMode, options: BuildOptions) -> Self {
        Self { source, options, default_mode, views: Arc::new(RwLock::new(ViewStore::default())) }
    }

    /// Replace the view store with an empty one holding at most `capacity` views.
    #[must_use]
    pub fn with_view_capacity(mut self, capacity: usize) -> Self {
        self.views = Arc::new(RwLock::new(ViewStore::new(capacity)));
        self
    }

    /// The family's stored view mode, or the default.
    pub async fn view_mode(&self, family_id: FamilyId) -> ViewMode {
        let views = self.views.read().await;
        views.get(family_id).map_or(self.default_mode, |v| v.mode)
    }

    pub async fn view(&self, family_id: FamilyId) -> Option<GraphView> {
        let views = self.views.read().await;
        views.get(family_id).cloned()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
