//! Cross-family link resolver.
//!
//! DESIGN
//! ======
//! Each link touching the family is anchored to one node of the family's
//! graph: the connecting member's node when that person is in the family,
//! else the head. The family on the other side is attached under the anchor
//! either in full (expanded mode, record preloaded) or as a single
//! placeholder node, and one `cross_family_link` edge joins the anchor to it.
//!
//! Every attached family gets its own row below the lowest node of the
//! primary family, so linked nodes never land on a generation row or on
//! each other. A related record that lists a person twice contributes one
//! node for that person.
//!
//! A link recorded on both families shows up twice in the input; links are
//! keyed by unordered family pair plus link id and processed once. A linked
//! family's nodes are created once per build no matter how many links point
//! at it; later links only add their own edge.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use super::build::ViewMode;
use super::classify::{Partitions, RelationshipClassifier, Role, classify};
use super::edges::edge;
use super::layout;
use super::{EdgeKind, FamilySummary, GraphBuilder, GraphError, GraphNode, Position, external_node_id, person_node_id};
use crate::family::{FamilyId, FamilyRecord, FamilyRef, Link};

/// Attach every linked family of `family` to `graph`.
///
/// Expects the family's person nodes to be in `graph` already.
///
/// # Errors
///
/// Propagates `GraphBuilder` invariant violations.
pub fn resolve_links(
    family: &FamilyRecord,
    partitions: &Partitions<'_>,
    mode: ViewMode,
    classifier: &dyn RelationshipClassifier,
    graph: &mut GraphBuilder,
) -> Result<(), GraphError> {
    let Some(head) = partitions.head else {
        debug!(family_id = family.id, "no head node; cross-family links skipped");
        return Ok(());
    };
    let head_id = person_node_id(Role::Head, head);

    let mut seen_links = BTreeSet::new();
    // Linked family id -> node the link edges point at.
    let mut attached: BTreeMap<FamilyId, String> = BTreeMap::new();
    let floor = graph.lowest_y().unwrap_or(layout::BASE_Y);
    let mut rows = 0;

    for link in family.links() {
        if !seen_links.insert(link.pair_key()) {
            continue;
        }
        let Some(other) = link.other_side(family.id) else {
            debug!(family_id = family.id, link_id = link.id, "link does not connect to another family; skipped");
            continue;
        };

        let anchor = anchor_for(link, partitions).unwrap_or_else(|| head_id.clone());

        let target = match attached.get(&other.id) {
            Some(target) => target.clone(),
            None => {
                let row_y = layout::linked_row_y(floor, rows);
                let target = attach_family(family, other, mode, classifier, &anchor, row_y, graph)?;
                rows += 1;
                attached.insert(other.id, target.clone());
                target
            }
        };

        let mut link_edge = edge(EdgeKind::CrossFamilyLink, &anchor, &target, &link.link_type);
        link_edge.id = format!("link:{}:{anchor}->{target}", link.id);
        link_edge.sub_label.clone_from(&link.description);
        graph.add_edge(link_edge)?;
    }

    Ok(())
}

/// Node id of the link's connecting member, if that person is in the family.
fn anchor_for(link: &Link, partitions: &Partitions<'_>) -> Option<String> {
    let member_id = link.connecting_member_id?;
    let (role, person) = partitions.find(member_id)?;
    Some(person_node_id(role, person))
}

/// Create the node set for linked family `other` on the row at `row_y`,
/// centered under `anchor`, and return the id of the node the link edge
/// should point at.
fn attach_family(
    family: &FamilyRecord,
    other: &FamilyRef,
    mode: ViewMode,
    classifier: &dyn RelationshipClassifier,
    anchor: &str,
    row_y: f64,
    graph: &mut GraphBuilder,
) -> Result<String, GraphError> {
    let anchor_position = graph.position_of(anchor).ok_or_else(|| GraphError::DanglingEdge {
        edge: format!("link to family {}", other.id),
        endpoint: anchor.to_string(),
    })?;

    let preloaded = match mode {
        ViewMode::Expanded => family.related_family(other.id).filter(|r| !r.is_empty()),
        ViewMode::Compact => None,
    };

    let Some(related) = preloaded else {
        let summary = FamilySummary::new(other, family.related_family(other.id));
        let node = GraphNode::placeholder(summary, Position::new(anchor_position.x, row_y));
        let id = node.id.clone();
        graph.add_node(node)?;
        return Ok(id);
    };

    let mut seen = BTreeSet::new();
    let people: Vec<_> = related
        .people()
        .filter(|p| {
            let fresh = seen.insert((p.person_type, p.id));
            if !fresh {
                warn!(
                    family_id = family.id,
                    related_family_id = related.id,
                    person_id = p.id,
                    "related family lists a person twice; extra entry ignored"
                );
            }
            fresh
        })
        .collect();
    let positions = layout::linked_people(anchor_position.x, row_y, people.len());
    for (person, position) in people.iter().zip(positions) {
        graph.add_node(GraphNode::external(related.id, person, position))?;
    }

    // Same head resolution as the primary family; non-empty by the filter above.
    let counterpart = classify(related.head_id, &people, classifier)
        .head
        .unwrap_or(people[0]);
    Ok(external_node_id(related.id, counterpart))
}

#[cfg(test)]
#[path = "links_test.rs"]
mod tests;
