//! End-to-end reassignment: canvas drop target, typed request channel,
//! model mutation, and the projections that follow.

mod common;

use common::builders::{NodeBuilder, TopologyBuilder};
use topovis_rs::frontend::selection::Selection;
use topovis_rs::layout::render_graph::RenderKind;
use topovis_rs::layout::LayoutEngine;
use topovis_rs::model::{AttachmentKind, ReassignmentRequest};
use topovis_rs::sync::EditorSync;

fn topology() -> topovis_rs::model::Topology {
    TopologyBuilder::new()
        .node(
            NodeBuilder::new("a:9100")
                .sink("s1", "Print")
                .sink("s2", "File")
                .downstream("b:9100")
                .build(),
        )
        .node(NodeBuilder::new("b:9100").upstream("a:9100").build())
        .build()
}

#[test]
fn drag_sink_onto_peer_moves_it_end_to_end() {
    let mut topology = topology();
    let mut engine = LayoutEngine::new(&topology);
    let mut sync = EditorSync::new(&topology).unwrap();
    let mut selection = Selection::Sink {
        owner: "a:9100".to_string(),
        name: "s1".to_string(),
        index: 0,
    };
    let (tx, rx) = crossbeam_channel::unbounded::<ReassignmentRequest>();

    engine.relax();

    // Releasing s1 over b:9100 resolves b as the drop target.
    let target_pos = {
        let target = engine
            .graph()
            .processing()
            .find(|e| e.label == "b:9100")
            .unwrap();
        engine.position(target.id).unwrap()
    };
    let dropped_on = engine.drop_target(target_pos, "a:9100").unwrap();
    assert_eq!(dropped_on.label, "b:9100");

    tx.send(ReassignmentRequest {
        source_owner: "a:9100".to_string(),
        target_owner: dropped_on.label.clone(),
        kind: AttachmentKind::Sink,
        index: 0,
    })
    .unwrap();

    // The app loop applies the request and re-derives projections.
    let request = rx.try_recv().unwrap();
    assert!(topology.reassign(&request));
    selection.clear();
    engine.rebuild(&topology);
    sync.on_model_changed(&topology).unwrap();

    // Model: s1 now belongs to b, a keeps s2.
    assert_eq!(topology.node("a:9100").unwrap().sink_list().len(), 1);
    assert_eq!(topology.node("b:9100").unwrap().sink_list()[0].name, "s1");

    // Render graph: the moved sink clusters under its new owner.
    let b_id = engine
        .graph()
        .processing()
        .find(|e| e.label == "b:9100")
        .unwrap()
        .id;
    let moved = engine
        .graph()
        .entities
        .iter()
        .find(|e| e.kind == RenderKind::Sink && e.label == "s1")
        .unwrap();
    assert_eq!(moved.owner, Some(b_id));

    // Document text: the sink serializes under the new owner.
    assert!(sync.is_clean());
    let text = sync.text();
    let b_at = text.rfind("b:9100").unwrap();
    let s1_at = text.find("s1").unwrap();
    assert!(s1_at > b_at, "s1 should serialize under b");

    // The stale selection reads as no selection.
    assert!(Selection::Sink {
        owner: "a:9100".to_string(),
        name: "s1".to_string(),
        index: 0,
    }
    .resolve(&topology)
    .is_none());
}

#[test]
fn reassignment_request_with_same_owner_is_ignored() {
    let mut topology = topology();
    let before = topology.clone();
    assert!(!topology.reassign(&ReassignmentRequest {
        source_owner: "a:9100".to_string(),
        target_owner: "a:9100".to_string(),
        kind: AttachmentKind::Sink,
        index: 0,
    }));
    assert_eq!(topology, before);
}

#[test]
fn moved_attachment_gets_a_fresh_identity() {
    let mut topology = topology();
    let mut engine = LayoutEngine::new(&topology);

    let old_id = engine
        .graph()
        .entities
        .iter()
        .find(|e| e.kind == RenderKind::Sink && e.label == "s1")
        .unwrap()
        .id;

    topology.reassign(&ReassignmentRequest {
        source_owner: "a:9100".to_string(),
        target_owner: "b:9100".to_string(),
        kind: AttachmentKind::Sink,
        index: 0,
    });
    engine.rebuild(&topology);

    let new_id = engine
        .graph()
        .entities
        .iter()
        .find(|e| e.kind == RenderKind::Sink && e.label == "s1")
        .unwrap()
        .id;
    // Identity is owner-scoped, so the move re-seeds near the new owner.
    assert_ne!(old_id, new_id);
}
