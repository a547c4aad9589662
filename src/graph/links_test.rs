use super::*;
use crate::family::Person;
use crate::family::test_helpers::{family, link, member, nuclear_family, visitor};
use crate::graph::classify::{LabelClassifier, classify};
use crate::graph::layout::place;
use crate::graph::{Graph, NodeKind};

/// Run placement plus link resolution the way `build_graph` does.
fn resolve(family: &FamilyRecord, mode: ViewMode) -> Graph {
    let people: Vec<&Person> = family.people().collect();
    let parts = classify(family.head_id, &people, &LabelClassifier);
    let mut graph = GraphBuilder::new();
    for placement in place(&parts) {
        graph
            .add_node(GraphNode::internal(placement.role, placement.person, placement.position))
            .unwrap();
    }
    resolve_links(family, &parts, mode, &LabelClassifier, &mut graph).unwrap();
    graph.finish(false)
}

fn assert_distinct_positions(graph: &Graph) {
    for (i, a) in graph.nodes.iter().enumerate() {
        for b in &graph.nodes[i + 1..] {
            assert!(
                (a.position.x - b.position.x).abs() > 1e-9 || (a.position.y - b.position.y).abs() > 1e-9,
                "{} and {} share {:?}",
                a.id,
                b.id,
                a.position
            );
        }
    }
}

fn link_edges(graph: &Graph) -> Vec<(String, String, String)> {
    graph
        .edges_of(EdgeKind::CrossFamilyLink)
        .map(|e| (e.source.clone(), e.target.clone(), e.label.clone()))
        .collect()
}

fn related_b() -> FamilyRecord {
    let mut b = family(20, Some(10), vec![member(11, Some("Spouse")), member(10, Some("Head"))]);
    b.visitors = vec![visitor(12, None)];
    b
}

#[test]
fn preloaded_family_is_attached_in_full() {
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, Some(2))];
    a.related_families = vec![related_b()];

    let graph = resolve(&a, ViewMode::Expanded);

    let external: Vec<&str> = graph
        .nodes
        .iter()
        .filter(|n| n.external)
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(external, vec!["external-20-member-11", "external-20-member-10", "external-20-visitor-12"]);
    assert_eq!(
        link_edges(&graph),
        vec![("spouse-2".into(), "external-20-member-10".into(), "in-laws".into())]
    );
}

#[test]
fn external_nodes_sit_below_every_generation() {
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, Some(2))];
    a.related_families = vec![related_b()];

    let graph = resolve(&a, ViewMode::Expanded);
    let child_y = graph.node("child-3").unwrap().position.y;
    let anchor_x = graph.node("spouse-2").unwrap().position.x;
    let external: Vec<_> = graph.nodes.iter().filter(|n| n.external).collect();
    assert!(
        external
            .iter()
            .all(|n| (n.position.y - (child_y + layout::LEVEL_HEIGHT)).abs() < 1e-9)
    );
    assert!((external[1].position.x - anchor_x).abs() < 1e-9);
}

#[test]
fn placeholder_does_not_land_on_child() {
    let mut a = family(1, Some(1), vec![member(1, Some("Head")), member(3, Some("Hijo"))]);
    a.origin_links = vec![link(100, 1, 20, None)];

    let graph = resolve(&a, ViewMode::Compact);
    let child = graph.node("child-3").unwrap().position;
    let placeholder = graph.node("family-20").unwrap().position;
    assert!(placeholder.y > child.y);
    assert_distinct_positions(&graph);
}

#[test]
fn linked_families_under_different_anchors_never_overlap() {
    let mut a = nuclear_family(1);
    a.members.push(member(4, Some("Child")));
    a.origin_links = vec![
        link(100, 1, 20, Some(1)),
        link(101, 1, 30, Some(2)),
        link(102, 1, 40, Some(3)),
    ];
    let mut c = family(30, None, vec![member(31, None), member(32, None), member(33, None)]);
    c.visitors = vec![visitor(34, None)];
    a.related_families = vec![related_b(), c, family(40, None, vec![member(41, None), member(42, None)])];

    assert_distinct_positions(&resolve(&a, ViewMode::Expanded));
    assert_distinct_positions(&resolve(&a, ViewMode::Compact));
}

#[test]
fn compact_mode_uses_placeholder_even_when_preloaded() {
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, Some(3))];
    a.related_families = vec![related_b()];

    let graph = resolve(&a, ViewMode::Compact);
    let placeholder = graph.node("family-20").unwrap();
    assert_eq!(placeholder.kind, NodeKind::FamilyPlaceholder);
    assert!(placeholder.external);
    assert!(graph.nodes.iter().all(|n| !n.id.starts_with("external-")));
    assert_eq!(link_edges(&graph), vec![("child-3".into(), "family-20".into(), "in-laws".into())]);
}

#[test]
fn missing_related_record_falls_back_to_placeholder() {
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, None)];

    let graph = resolve(&a, ViewMode::Expanded);
    assert_eq!(link_edges(&graph), vec![("head-1".into(), "family-20".into(), "in-laws".into())]);
}

#[test]
fn empty_related_record_falls_back_to_placeholder() {
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, None)];
    a.related_families = vec![family(20, None, Vec::new())];

    let graph = resolve(&a, ViewMode::Expanded);
    assert!(graph.node("family-20").is_some());
    if let Some(crate::graph::NodePayload::Family(summary)) = graph.node("family-20").map(|n| &n.payload) {
        assert_eq!(summary.member_count, Some(0));
    } else {
        panic!("expected family payload");
    }
}

#[test]
fn unknown_connecting_member_anchors_on_head() {
    let mut a = nuclear_family(1);
    a.related_links = vec![link(100, 20, 1, Some(999))];

    let graph = resolve(&a, ViewMode::Compact);
    assert_eq!(link_edges(&graph), vec![("head-1".into(), "family-20".into(), "in-laws".into())]);
}

#[test]
fn duplicate_related_person_yields_one_node() {
    let mut b = related_b();
    b.members.push(member(11, Some("Spouse")));
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, Some(2))];
    a.related_families = vec![b];

    let graph = resolve(&a, ViewMode::Expanded);
    let external: Vec<&str> = graph
        .nodes
        .iter()
        .filter(|n| n.external)
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(external, vec!["external-20-member-11", "external-20-member-10", "external-20-visitor-12"]);
}

#[test]
fn counterpart_without_head_id_uses_head_label() {
    let mut b = family(20, None, vec![member(11, None), member(10, Some("Cabeza"))]);
    b.visitors = vec![visitor(12, None)];
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, None)];
    a.related_families = vec![b];

    let graph = resolve(&a, ViewMode::Expanded);
    assert_eq!(link_edges(&graph)[0].1, "external-20-member-10");
}

#[test]
fn counterpart_without_head_is_first_member() {
    let mut b = family(20, None, vec![member(11, None), member(10, Some("Tío"))]);
    b.visitors = vec![visitor(12, None)];
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, None)];
    a.related_families = vec![b];

    let graph = resolve(&a, ViewMode::Expanded);
    assert_eq!(link_edges(&graph)[0].1, "external-20-member-11");
}

#[test]
fn counterpart_falls_back_to_first_visitor() {
    let mut b = family(20, None, Vec::new());
    b.visitors = vec![visitor(30, None)];
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, None)];
    a.related_families = vec![b];

    let graph = resolve(&a, ViewMode::Expanded);
    assert_eq!(link_edges(&graph)[0].1, "external-20-visitor-30");
}

#[test]
fn symmetric_link_records_are_processed_once() {
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, Some(2))];
    a.related_links = vec![link(100, 20, 1, Some(2))];

    let graph = resolve(&a, ViewMode::Compact);
    assert_eq!(graph.edges_of(EdgeKind::CrossFamilyLink).count(), 1);
}

#[test]
fn two_links_to_same_family_share_one_node_set() {
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, Some(2)), link(101, 1, 20, Some(3))];
    a.related_families = vec![related_b()];

    let expanded = resolve(&a, ViewMode::Expanded);
    assert_eq!(expanded.nodes.iter().filter(|n| n.external).count(), 3);
    assert_eq!(
        link_edges(&expanded),
        vec![
            ("spouse-2".into(), "external-20-member-10".into(), "in-laws".into()),
            ("child-3".into(), "external-20-member-10".into(), "in-laws".into()),
        ]
    );

    let compact = resolve(&a, ViewMode::Compact);
    assert_eq!(compact.nodes.iter().filter(|n| n.external).count(), 1);
    assert_eq!(compact.edges_of(EdgeKind::CrossFamilyLink).count(), 2);
}

#[test]
fn families_under_one_anchor_get_separate_rows() {
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 20, None), link(101, 1, 30, None)];

    let graph = resolve(&a, ViewMode::Compact);
    let first = graph.node("family-20").unwrap().position;
    let second = graph.node("family-30").unwrap().position;
    assert!((second.y - first.y - layout::LEVEL_HEIGHT).abs() < 1e-9);
}

#[test]
fn self_and_foreign_links_are_skipped() {
    let mut a = nuclear_family(1);
    a.origin_links = vec![link(100, 1, 1, None), link(101, 40, 50, None)];

    let graph = resolve(&a, ViewMode::Compact);
    assert_eq!(graph.edges_of(EdgeKind::CrossFamilyLink).count(), 0);
    assert!(graph.nodes.iter().all(|n| !n.external));
}

#[test]
fn link_description_becomes_sub_label() {
    let mut a = nuclear_family(1);
    let mut l = link(100, 1, 20, None);
    l.description = Some("married into".into());
    a.origin_links = vec![l];

    let graph = resolve(&a, ViewMode::Compact);
    let e = graph.edges_of(EdgeKind::CrossFamilyLink).next().unwrap();
    assert_eq!(e.sub_label.as_deref(), Some("married into"));
    assert_eq!(e.id, "link:100:head-1->family-20");
}

#[test]
fn no_head_skips_links() {
    let mut a = family(1, None, Vec::new());
    a.origin_links = vec![link(100, 1, 20, None)];
    let people: Vec<&Person> = a.people().collect();
    let parts = classify(a.head_id, &people, &LabelClassifier);
    let mut graph = GraphBuilder::new();
    resolve_links(&a, &parts, ViewMode::Expanded, &LabelClassifier, &mut graph).unwrap();
    assert!(graph.finish(false).is_empty());
}
