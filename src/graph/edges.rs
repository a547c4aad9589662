//! Edge resolver: structural relationship edges within one family.
//!
//! Every edge points at or away from the head; without a head there are no
//! structural edges. Edge ids are `{kind}:{source}->{target}`.

use super::classify::{Partitions, Role};
use super::{EdgeKind, EdgeStyle, GraphEdge, person_node_id};

/// Sub-label marking the second parent-child edge drawn from the spouse.
pub const VIA_SPOUSE: &str = "via-spouse";

/// Derive marriage, parent-child, ancestor, sibling and other edges.
#[must_use]
pub fn structural_edges(partitions: &Partitions<'_>) -> Vec<GraphEdge> {
    let Some(head) = partitions.head else {
        return Vec::new();
    };
    let head_id = person_node_id(Role::Head, head);
    let spouse_id = partitions.spouse.map(|s| person_node_id(Role::Spouse, s));

    let mut edges = Vec::new();

    if let Some(spouse_id) = &spouse_id {
        edges.push(edge(EdgeKind::Marriage, &head_id, spouse_id, "Married"));
    }

    for child in &partitions.children {
        let child_id = person_node_id(Role::Child, child);
        edges.push(edge(EdgeKind::ParentChild, &head_id, &child_id, "Child"));
        if let Some(spouse_id) = &spouse_id {
            let mut via = edge(EdgeKind::ParentChild, spouse_id, &child_id, "Child");
            via.sub_label = Some(VIA_SPOUSE.to_string());
            via.style.dashed = true;
            edges.push(via);
        }
    }

    for parent in &partitions.parents {
        let parent_id = person_node_id(Role::Parent, parent);
        edges.push(edge(EdgeKind::Ancestor, &parent_id, &head_id, "Parent"));
    }

    for sibling in &partitions.siblings {
        let sibling_id = person_node_id(Role::Sibling, sibling);
        edges.push(edge(EdgeKind::Sibling, &sibling_id, &head_id, "Sibling"));
    }

    for other in &partitions.others {
        let other_id = person_node_id(Role::Other, other);
        let label = other.label().unwrap_or("Other");
        edges.push(edge(EdgeKind::Other, &other_id, &head_id, label));
    }

    edges
}

/// An edge with the default style for its kind.
#[must_use]
pub fn edge(kind: EdgeKind, source: &str, target: &str, label: &str) -> GraphEdge {
    GraphEdge {
        id: format!("{}:{source}->{target}", kind.as_str()),
        source: source.to_string(),
        target: target.to_string(),
        kind,
        label: label.to_string(),
        sub_label: None,
        style: default_style(kind),
    }
}

fn default_style(kind: EdgeKind) -> EdgeStyle {
    let (stroke_width, dashed) = match kind {
        EdgeKind::Marriage => (3.0, false),
        EdgeKind::ParentChild | EdgeKind::Ancestor => (2.0, false),
        EdgeKind::Sibling => (1.5, false),
        EdgeKind::Other => (1.0, true),
        EdgeKind::CrossFamilyLink => (2.0, true),
    };
    EdgeStyle { stroke_width, dashed }
}

#[cfg(test)]
#[path = "edges_test.rs"]
mod tests;
