//! Integration tests for document parsing and serialization.

mod common;

use common::builders::{NodeBuilder, TopologyBuilder};
use proptest::prelude::*;
use topovis_rs::model::{
    parse_document, sample_topology, serialize_document, FieldType, Topology,
};

#[test]
fn sample_document_round_trips() {
    let topology = sample_topology();
    let text = serialize_document(&topology).unwrap();
    let back = parse_document(&text).unwrap();
    assert_eq!(topology, back);
}

#[test]
fn serialization_is_stable() {
    let topology = sample_topology();
    let first = serialize_document(&topology).unwrap();
    let second = serialize_document(&parse_document(&first).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn opaque_config_keys_survive_round_trip() {
    let text = r#"
logical:
  - name: events
    schema:
      - name: ts
        type: UINT64
nodes:
  - connection: "a:9100"
    grpc: "a:9101"
    capacity: 16
    physical:
      - logical: events
        parserConfig:
          type: JSON
          timestampField: ts
        sourceConfig:
          type: Socket
          port: 4000
          host: 0.0.0.0
"#;
    let topology = parse_document(text).unwrap();
    let source = &topology.node("a:9100").unwrap().sources()[0];
    assert_eq!(source.parser_config.kind, "JSON");
    assert!(source.parser_config.config.contains_key("timestampField"));
    assert!(source.source_config.config.contains_key("port"));

    let back = parse_document(&serialize_document(&topology).unwrap()).unwrap();
    assert_eq!(topology, back);
}

#[test]
fn document_without_nodes_is_rejected() {
    let err = parse_document("logical: []\n").unwrap_err();
    assert!(err.to_string().contains("nodes"));
}

#[test]
fn empty_node_list_is_valid() {
    let topology = parse_document("nodes: []\n").unwrap();
    assert!(topology.nodes.is_empty());
}

#[test]
fn load_and_save_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.yaml");

    let topology = sample_topology();
    topovis_rs::model::save_document(&path, &topology).unwrap();
    let back = topovis_rs::model::load_document(&path).unwrap();
    assert_eq!(topology, back);
}

fn arbitrary_topology() -> impl Strategy<Value = Topology> {
    let connections = proptest::collection::hash_set("[a-z]{2,6}:[0-9]{4}", 1..5);
    let schemas = proptest::collection::hash_set("[a-z]{2,8}", 0..3);

    (connections, schemas).prop_map(|(connections, schemas)| {
        let mut builder = TopologyBuilder::new();
        for schema in &schemas {
            builder = builder.schema(schema, &[("ts", FieldType::Uint64)]);
        }
        let all: Vec<String> = connections.iter().cloned().collect();
        for (i, connection) in all.iter().enumerate() {
            let mut node = NodeBuilder::new(connection).capacity((i as u32 + 1) * 4);
            if let Some(schema) = schemas.iter().next() {
                node = node.source(schema);
            }
            if i % 2 == 0 {
                node = node.sink(&format!("sink{}", i), "Print");
            }
            if let Some(peer) = all.get(i + 1) {
                node = node.downstream(peer);
            }
            builder = builder.node(node.build());
        }
        builder.build()
    })
}

proptest! {
    #[test]
    fn generated_topologies_round_trip(topology in arbitrary_topology()) {
        let text = serialize_document(&topology).unwrap();
        let back = parse_document(&text).unwrap();
        prop_assert_eq!(topology, back);
    }
}
