//! Graph construction entry point.
//!
//! Pure and synchronous: the caller fetches the family (and, for expanded
//! mode, its linked families) first, then hands the record here. A family
//! with no people yields the illustrative sample or an empty graph,
//! depending on `EmptyFamilyPolicy`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classify::{LabelClassifier, RelationshipClassifier, classify};
use super::edges::structural_edges;
use super::layout::place;
use super::links::resolve_links;
use super::sample::sample_graph;
use super::{Graph, GraphBuilder, GraphError, GraphNode};
use crate::family::{FamilyRecord, Person};

/// How much of each linked family is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Linked families collapse to one placeholder node each.
    #[default]
    Compact,
    /// Preloaded linked families are drawn person by person.
    Expanded,
}

impl ViewMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Compact => Self::Expanded,
            Self::Expanded => Self::Compact,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Expanded => "expanded",
        }
    }
}

/// What to draw for a family with no members and no visitors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyFamilyPolicy {
    /// Three-node sample graph flagged with `Graph::sample`.
    #[default]
    Sample,
    /// No nodes, no edges.
    Empty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub empty_family: EmptyFamilyPolicy,
}

/// Build the relationship graph for `family` with the default label
/// classifier.
///
/// # Errors
///
/// Returns `GraphError` if the input would produce duplicate node ids (for
/// example the same person listed twice) or an edge to a missing node.
pub fn build_graph(family: &FamilyRecord, mode: ViewMode, options: &BuildOptions) -> Result<Graph, GraphError> {
    build_graph_with(family, mode, options, &LabelClassifier)
}

/// Build the relationship graph for `family` using `classifier` to map
/// relationship labels to roles.
///
/// # Errors
///
/// See [`build_graph`].
pub fn build_graph_with(
    family: &FamilyRecord,
    mode: ViewMode,
    options: &BuildOptions,
    classifier: &dyn RelationshipClassifier,
) -> Result<Graph, GraphError> {
    if family.is_empty() {
        debug!(family_id = family.id, policy = ?options.empty_family, "family has no people");
        return match options.empty_family {
            EmptyFamilyPolicy::Sample => sample_graph(),
            EmptyFamilyPolicy::Empty => Ok(Graph::default()),
        };
    }

    let people: Vec<&Person> = family.people().collect();
    let partitions = classify(family.head_id, &people, classifier);

    let mut graph = GraphBuilder::new();
    for placement in place(&partitions) {
        graph.add_node(GraphNode::internal(placement.role, placement.person, placement.position))?;
    }
    for edge in structural_edges(&partitions) {
        graph.add_edge(edge)?;
    }
    resolve_links(family, &partitions, mode, classifier, &mut graph)?;

    let graph = graph.finish(false);
    debug!(
        family_id = family.id,
        mode = mode.as_str(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "graph built"
    );
    Ok(graph)
}

#[cfg(test)]
#[path = "build_test.rs"]
mod tests;
