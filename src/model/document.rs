//! Topology document serialization.
//!
//! The document format is YAML with a required `nodes` array and an
//! optional `logical` schema list. Unknown keys inside parser, source,
//! and sink config blocks are preserved opaquely and round-trip intact.

use std::path::Path;

use crate::error::{Result, TopoVisError};

use super::topology::{
    FieldType, LogicalSchema, PhysicalSource, ProcessingNode, SchemaField, Sink, Topology,
    TypedConfig,
};

/// Parse a topology document. Parse failure or a missing `nodes` key is
/// a hard validation error; the caller's model must stay untouched.
pub fn parse_document(text: &str) -> Result<Topology> {
    serde_yaml::from_str(text).map_err(|e| TopoVisError::Parse(e.to_string()))
}

/// Serialize a topology to document text.
pub fn serialize_document(topology: &Topology) -> Result<String> {
    serde_yaml::to_string(topology).map_err(|e| TopoVisError::Serialization(e.to_string()))
}

/// Load and parse a document from disk.
pub fn load_document(path: impl AsRef<Path>) -> Result<Topology> {
    let text = std::fs::read_to_string(path)?;
    parse_document(&text)
}

/// Serialize and write a document to disk.
pub fn save_document(path: impl AsRef<Path>, topology: &Topology) -> Result<()> {
    let text = serialize_document(topology)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Small built-in topology used when no document is available at startup.
pub fn sample_topology() -> Topology {
    let mut ingest = ProcessingNode::new("ingest:9100", "ingest:9101", 8);
    ingest.links.downstreams.push("aggregate:9100".to_string());
    ingest.physical = Some(vec![PhysicalSource {
        logical: "events".to_string(),
        parser_config: TypedConfig::new("json"),
        source_config: TypedConfig::new("kafka"),
    }]);

    let mut aggregate = ProcessingNode::new("aggregate:9100", "aggregate:9101", 4);
    aggregate.links.upstreams.push("ingest:9100".to_string());
    aggregate.sinks = Some(vec![Sink {
        name: "console".to_string(),
        kind: "Print".to_string(),
        config: Default::default(),
    }]);

    Topology {
        logical: Some(vec![LogicalSchema {
            name: "events".to_string(),
            schema: vec![
                SchemaField {
                    name: "ts".to_string(),
                    field_type: FieldType::Uint64,
                },
                SchemaField {
                    name: "value".to_string(),
                    field_type: FieldType::Double,
                },
            ],
        }]),
        nodes: vec![ingest, aggregate],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_round_trips() {
        let topology = sample_topology();
        let text = serialize_document(&topology).unwrap();
        let parsed = parse_document(&text).unwrap();
        assert_eq!(parsed, topology);
    }

    #[test]
    fn test_missing_nodes_key_is_error() {
        let err = parse_document("logical: []\n").unwrap_err();
        assert!(err.to_string().contains("nodes"));
    }

    #[test]
    fn test_empty_nodes_allowed() {
        let topology = parse_document("nodes: []\n").unwrap();
        assert!(topology.nodes.is_empty());
        assert!(topology.logical.is_none());
    }

    #[test]
    fn test_unknown_config_keys_preserved() {
        let text = "\
nodes:
  - connection: a:1
    grpc: a:2
    capacity: 4
    sinks:
      - name: s1
        type: Print
        config:
          prefix: 'out: '
          flush: true
";
        let topology = parse_document(text).unwrap();
        let sink = &topology.node("a:1").unwrap().sink_list()[0];
        assert_eq!(sink.config.len(), 2);
        assert!(sink.config.contains_key("flush"));

        let round = parse_document(&serialize_document(&topology).unwrap()).unwrap();
        assert_eq!(round, topology);
    }

    #[test]
    fn test_serialization_is_stable() {
        let topology = sample_topology();
        let once = serialize_document(&topology).unwrap();
        let twice = serialize_document(&parse_document(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }
}
