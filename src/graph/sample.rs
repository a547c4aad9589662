//! Illustrative sample graph shown for a family with no members or visitors.

use super::edges::edge;
use super::layout::{BASE_Y, CENTER_X, LEVEL_HEIGHT, SPOUSE_OFFSET};
use super::{EdgeKind, Graph, GraphBuilder, GraphError, GraphNode, NodeKind, NodePayload, Position, Role};
use crate::family::{Person, PersonType};

pub const SAMPLE_HEAD: &str = "sample-head";
pub const SAMPLE_SPOUSE: &str = "sample-spouse";
pub const SAMPLE_CHILD: &str = "sample-child";

/// Three people (head, spouse, child) joined by a marriage and a
/// parent-child edge. Sample nodes carry no click target.
///
/// # Errors
///
/// Never in practice; the sample is assembled through `GraphBuilder` like any
/// other graph.
pub fn sample_graph() -> Result<Graph, GraphError> {
    let mut graph = GraphBuilder::new();

    graph.add_node(sample_node(SAMPLE_HEAD, Role::Head, "Head of family", Position::new(CENTER_X, BASE_Y)))?;
    graph.add_node(sample_node(
        SAMPLE_SPOUSE,
        Role::Spouse,
        "Spouse",
        Position::new(CENTER_X + SPOUSE_OFFSET, BASE_Y),
    ))?;
    graph.add_node(sample_node(
        SAMPLE_CHILD,
        Role::Child,
        "Child",
        Position::new(CENTER_X + SPOUSE_OFFSET / 2.0, BASE_Y + LEVEL_HEIGHT),
    ))?;

    graph.add_edge(edge(EdgeKind::Marriage, SAMPLE_HEAD, SAMPLE_SPOUSE, "Married"))?;
    graph.add_edge(edge(EdgeKind::ParentChild, SAMPLE_HEAD, SAMPLE_CHILD, "Child"))?;

    Ok(graph.finish(true))
}

fn sample_node(id: &str, role: Role, label: &str, position: Position) -> GraphNode {
    let person = Person {
        id: 0,
        first_name: label.to_string(),
        last_name: String::new(),
        birth_date: None,
        status: "sample".into(),
        photo: None,
        relationship: Some(role.as_str().to_string()),
        email: None,
        phone: None,
        person_type: PersonType::Member,
    };
    GraphNode {
        id: id.to_string(),
        kind: NodeKind::Person,
        label: label.to_string(),
        position,
        payload: NodePayload::Person(person),
        external: false,
        role: Some(role),
        target: None,
    }
}
