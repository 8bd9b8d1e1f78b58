//! Integration tests for structural topology mutations.

mod common;

use common::builders::{NodeBuilder, TopologyBuilder};
use topovis_rs::model::{AttachmentKind, FieldType, LinkDirection, ReassignmentRequest};

fn two_node_topology() -> topovis_rs::model::Topology {
    TopologyBuilder::new()
        .schema("events", &[("ts", FieldType::Uint64), ("v", FieldType::Double)])
        .node(
            NodeBuilder::new("a:9100")
                .source("events")
                .sink("s1", "Print")
                .sink("s2", "File")
                .downstream("b:9100")
                .build(),
        )
        .node(NodeBuilder::new("b:9100").upstream("a:9100").build())
        .build()
}

#[test]
fn reassignment_moves_sink_and_appends_at_end() {
    let mut topology = two_node_topology();
    let moved = topology.reassign(&ReassignmentRequest {
        source_owner: "a:9100".to_string(),
        target_owner: "b:9100".to_string(),
        kind: AttachmentKind::Sink,
        index: 0,
    });
    assert!(moved);

    let a = topology.node("a:9100").unwrap();
    let b = topology.node("b:9100").unwrap();
    assert_eq!(a.sink_list().len(), 1);
    assert_eq!(a.sink_list()[0].name, "s2");
    assert_eq!(b.sink_list().len(), 1);
    assert_eq!(b.sink_list()[0].name, "s1");
    // The payload travels unchanged.
    assert_eq!(b.sink_list()[0].kind, "Print");
}

#[test]
fn reassignment_preserves_total_counts() {
    let mut topology = two_node_topology();
    let sinks_before = topology.total_sinks();
    let sources_before = topology.total_sources();

    topology.reassign(&ReassignmentRequest {
        source_owner: "a:9100".to_string(),
        target_owner: "b:9100".to_string(),
        kind: AttachmentKind::Source,
        index: 0,
    });

    assert_eq!(topology.total_sinks(), sinks_before);
    assert_eq!(topology.total_sources(), sources_before);
}

#[test]
fn stale_reassignment_is_a_no_op() {
    let mut topology = two_node_topology();
    let before = topology.clone();

    // Index out of range.
    assert!(!topology.reassign(&ReassignmentRequest {
        source_owner: "a:9100".to_string(),
        target_owner: "b:9100".to_string(),
        kind: AttachmentKind::Sink,
        index: 7,
    }));
    // Target vanished.
    assert!(!topology.reassign(&ReassignmentRequest {
        source_owner: "a:9100".to_string(),
        target_owner: "gone:9100".to_string(),
        kind: AttachmentKind::Sink,
        index: 0,
    }));
    assert_eq!(topology, before);
}

#[test]
fn remove_node_scrubs_peer_references() {
    let mut topology = two_node_topology();
    topology.remove_node("b:9100").unwrap();

    let a = topology.node("a:9100").unwrap();
    assert!(a.links.downstreams.is_empty());
    assert!(topology.node("b:9100").is_none());
}

#[test]
fn duplicate_link_is_rejected_with_message() {
    let mut topology = two_node_topology();
    let err = topology
        .add_link("a:9100", "b:9100", LinkDirection::Downstream)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'a:9100' already has 'b:9100' as a downstream"
    );
}

#[test]
fn link_to_unknown_target_is_rejected() {
    let mut topology = two_node_topology();
    assert!(topology
        .add_link("a:9100", "nowhere:1", LinkDirection::Upstream)
        .is_err());
}

#[test]
fn add_source_to_missing_owner_is_silent() {
    let mut topology = two_node_topology();
    let before = topology.clone();
    topology.add_source(
        "gone:9100",
        topovis_rs::model::PhysicalSource {
            logical: "events".to_string(),
            parser_config: topovis_rs::model::TypedConfig::new("JSON"),
            source_config: topovis_rs::model::TypedConfig::new("Socket"),
        },
    );
    assert_eq!(topology, before);
}

#[test]
fn removing_last_attachment_normalizes_to_absent() {
    let mut topology = two_node_topology();
    topology.remove_source("a:9100", 0).unwrap();
    assert!(topology.node("a:9100").unwrap().physical.is_none());
}

#[test]
fn remove_at_missing_index_is_rejected_with_message() {
    let mut topology = two_node_topology();
    let before = topology.clone();
    let err = topology.remove_sink("a:9100", 7).unwrap_err();
    assert_eq!(err.to_string(), "no sink at index 7 on 'a:9100'");
    assert_eq!(topology, before);
}

#[test]
fn duplicate_node_is_rejected() {
    let mut topology = two_node_topology();
    assert!(topology
        .add_node(NodeBuilder::new("a:9100").build())
        .is_err());
    assert_eq!(topology.nodes.len(), 2);
}
