//! Test data builders for assembling topologies

use topovis_rs::model::{
    FieldType, LogicalSchema, PhysicalSource, ProcessingNode, SchemaField, Sink, Topology,
    TypedConfig,
};

/// Builder for test processing nodes
pub struct NodeBuilder {
    node: ProcessingNode,
}

impl NodeBuilder {
    pub fn new(connection: &str) -> Self {
        Self {
            node: ProcessingNode::new(connection, connection, 8),
        }
    }

    pub fn grpc(mut self, grpc: &str) -> Self {
        self.node.grpc = grpc.to_string();
        self
    }

    pub fn capacity(mut self, capacity: u32) -> Self {
        self.node.capacity = capacity;
        self
    }

    pub fn downstream(mut self, peer: &str) -> Self {
        self.node.links.downstreams.push(peer.to_string());
        self
    }

    pub fn upstream(mut self, peer: &str) -> Self {
        self.node.links.upstreams.push(peer.to_string());
        self
    }

    pub fn source(mut self, logical: &str) -> Self {
        self.node
            .physical
            .get_or_insert_with(Vec::new)
            .push(PhysicalSource {
                logical: logical.to_string(),
                parser_config: TypedConfig::new("JSON"),
                source_config: TypedConfig::new("Socket"),
            });
        self
    }

    pub fn sink(mut self, name: &str, kind: &str) -> Self {
        self.node.sinks.get_or_insert_with(Vec::new).push(Sink {
            name: name.to_string(),
            kind: kind.to_string(),
            config: Default::default(),
        });
        self
    }

    pub fn build(self) -> ProcessingNode {
        self.node
    }
}

/// Builder for test topologies
pub struct TopologyBuilder {
    topology: Topology,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self {
            topology: Topology::default(),
        }
    }

    pub fn schema(mut self, name: &str, fields: &[(&str, FieldType)]) -> Self {
        self.topology
            .logical
            .get_or_insert_with(Vec::new)
            .push(LogicalSchema {
                name: name.to_string(),
                schema: fields
                    .iter()
                    .map(|(name, field_type)| SchemaField {
                        name: name.to_string(),
                        field_type: *field_type,
                    })
                    .collect(),
            });
        self
    }

    pub fn node(mut self, node: ProcessingNode) -> Self {
        self.topology.nodes.push(node);
        self
    }

    pub fn build(self) -> Topology {
        self.topology
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
