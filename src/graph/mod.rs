//! Family relationship graph — nodes, typed edges, and the builder that
//! enforces their invariants.
//!
//! ARCHITECTURE
//! ============
//! `build_graph` runs a fixed pipeline over one family record:
//! classify (`classify.rs`) → place (`layout.rs`) → structural edges
//! (`edges.rs`) → cross-family links (`links.rs`). Empty families are handled
//! up front by `sample.rs`. Every stage writes through `GraphBuilder`, which
//! rejects duplicate node ids and edges whose endpoints do not exist yet.
//!
//! The output is a plain description for an external renderer. Construction
//! is synchronous and deterministic: identical input yields identical ids in
//! identical order.

pub mod build;
pub mod classify;
pub mod edges;
pub mod layout;
pub mod links;
pub mod sample;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::family::{FamilyId, FamilyRef, FamilyRecord, Person, PersonId, PersonType};

pub use build::{BuildOptions, EmptyFamilyPolicy, ViewMode, build_graph};
pub use classify::Role;

// =============================================================================
// ERROR
// =============================================================================

/// Invariant violations detected while assembling a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),
    #[error("duplicate edge id: {0}")]
    DuplicateEdge(String),
    #[error("edge {edge} references missing node {endpoint}")]
    DanglingEdge { edge: String, endpoint: String },
}

impl ErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        "E_GRAPH_BUILD"
    }
}

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Person,
    FamilyPlaceholder,
}

/// Summary shown on a family placeholder node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySummary {
    pub id: FamilyId,
    pub label: String,
    pub surname: Option<String>,
    pub display_name: Option<String>,
    pub member_count: Option<usize>,
    pub visitor_count: Option<usize>,
}

impl FamilySummary {
    /// Summary from a link side, enriched with counts when the record is known.
    #[must_use]
    pub fn new(side: &FamilyRef, record: Option<&FamilyRecord>) -> Self {
        let label = match (record, side.surname.as_deref().map(str::trim)) {
            (Some(record), _) => record.display_label(),
            (None, Some(surname)) if !surname.is_empty() => format!("Family {surname}"),
            (None, _) => format!("Family #{}", side.id),
        };
        Self {
            id: side.id,
            label,
            surname: record
                .map(|r| r.surname.clone())
                .filter(|s| !s.is_empty())
                .or_else(|| side.surname.clone()),
            display_name: record.and_then(|r| r.display_name.clone()),
            member_count: record.map(|r| r.members.len()),
            visitor_count: record.map(|r| r.visitors.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodePayload {
    Person(Person),
    Family(FamilySummary),
}

/// Opaque click reference handed to the renderer. Routing it to a detail
/// screen is the renderer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeTarget {
    Person { person_type: PersonType, id: PersonId },
    Family { id: FamilyId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    /// Display text for the renderer.
    pub label: String,
    pub position: Position,
    pub payload: NodePayload,
    /// True when the node comes from a linked family.
    pub external: bool,
    /// Partition of an internal person node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// `None` for the illustrative sample nodes, which point nowhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeTarget>,
}

impl GraphNode {
    /// Node for a person of the family being drawn.
    #[must_use]
    pub fn internal(role: Role, person: &Person, position: Position) -> Self {
        Self {
            id: person_node_id(role, person),
            kind: NodeKind::Person,
            label: person.full_name(),
            position,
            payload: NodePayload::Person(person.clone()),
            external: false,
            role: Some(role),
            target: Some(NodeTarget::Person { person_type: person.person_type, id: person.id }),
        }
    }

    /// Node for a person pulled in from linked family `family_id`.
    #[must_use]
    pub fn external(family_id: FamilyId, person: &Person, position: Position) -> Self {
        Self {
            id: external_node_id(family_id, person),
            kind: NodeKind::Person,
            label: person.full_name(),
            position,
            payload: NodePayload::Person(person.clone()),
            external: true,
            role: None,
            target: Some(NodeTarget::Person { person_type: person.person_type, id: person.id }),
        }
    }

    /// Aggregate node standing in for a family that was not preloaded.
    #[must_use]
    pub fn placeholder(summary: FamilySummary, position: Position) -> Self {
        Self {
            id: placeholder_node_id(summary.id),
            kind: NodeKind::FamilyPlaceholder,
            label: summary.label.clone(),
            position,
            target: Some(NodeTarget::Family { id: summary.id }),
            payload: NodePayload::Family(summary),
            external: true,
            role: None,
        }
    }
}

/// `{role}-{id}` for members, `{role}-visitor-{id}` for visitors.
#[must_use]
pub fn person_node_id(role: Role, person: &Person) -> String {
    match person.person_type {
        PersonType::Member => format!("{}-{}", role.as_str(), person.id),
        PersonType::Visitor => format!("{}-visitor-{}", role.as_str(), person.id),
    }
}

#[must_use]
pub fn external_node_id(family_id: FamilyId, person: &Person) -> String {
    format!("external-{family_id}-{}-{}", person.person_type.as_str(), person.id)
}

#[must_use]
pub fn placeholder_node_id(family_id: FamilyId) -> String {
    format!("family-{family_id}")
}

// =============================================================================
// EDGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Marriage,
    ParentChild,
    Ancestor,
    Sibling,
    Other,
    CrossFamilyLink,
}

impl EdgeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marriage => "marriage",
            Self::ParentChild => "parent_child",
            Self::Ancestor => "ancestor",
            Self::Sibling => "sibling",
            Self::Other => "other",
            Self::CrossFamilyLink => "cross_family_link",
        }
    }
}

/// Presentational hints only; nothing reads these back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub stroke_width: f64,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_label: Option<String>,
    pub style: EdgeStyle,
}

// =============================================================================
// GRAPH
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// True when the illustrative sample stands in for an empty family.
    #[serde(default)]
    pub sample: bool,
}

#[cfg(test)]
impl Graph {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }
}

/// Accumulates nodes and edges, enforcing id uniqueness and that every edge
/// endpoint already exists.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_index: HashMap<String, usize>,
    edge_ids: HashSet<String>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `DuplicateNode` if a node with the same id was already added.
    pub fn add_node(&mut self, node: GraphNode) -> Result<(), GraphError> {
        if self.node_index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DanglingEdge` if either endpoint is unknown and
    /// `DuplicateEdge` if the edge id was already used.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<(), GraphError> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.node_index.contains_key(endpoint) {
                return Err(GraphError::DanglingEdge { edge: edge.id.clone(), endpoint: endpoint.clone() });
            }
        }
        if !self.edge_ids.insert(edge.id.clone()) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        self.edges.push(edge);
        Ok(())
    }

    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.node_index.get(id).map(|&i| self.nodes[i].position)
    }

    /// Largest y of any node added so far.
    #[must_use]
    pub fn lowest_y(&self) -> Option<f64> {
        self.nodes.iter().map(|n| n.position.y).reduce(f64::max)
    }

    #[must_use]
    pub fn finish(self, sample: bool) -> Graph {
        Graph { nodes: self.nodes, edges: self.edges, sample }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
