//! Topology data types.
//!
//! The entity model mirrors the on-disk document shape directly: a
//! [`Topology`] owns processing nodes, each of which owns its physical
//! sources and sinks by list membership (no back-pointers). Attachment
//! lists normalize to `None` when they become empty so "no sources" and
//! "empty sources" are a single state, which keeps repeated serialization
//! byte-identical.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque configuration payload. `BTreeMap` keeps key order stable so
/// re-serializing the same document twice yields identical text.
pub type ConfigMap = BTreeMap<String, serde_yaml::Value>;

/// Field types supported by logical schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Uint64,
    Int64,
    Double,
    String,
    Boolean,
}

/// A single named, typed field of a logical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// A named, typed field list that physical sources reference by name.
///
/// The reference is not enforced: a source may name a schema that does
/// not exist, which the canvas flags visually instead of rejecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalSchema {
    pub name: String,
    pub schema: Vec<SchemaField>,
}

/// A `{type, ...}` descriptor with all non-`type` keys carried opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub config: ConfigMap,
}

impl TypedConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            config: ConfigMap::new(),
        }
    }
}

/// An input feed attached to a processing node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSource {
    /// Name of the logical schema this source produces (may dangle).
    pub logical: String,
    #[serde(rename = "parserConfig")]
    pub parser_config: TypedConfig,
    #[serde(rename = "sourceConfig")]
    pub source_config: TypedConfig,
}

/// An output attached to a processing node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sink {
    /// Lookup key; expected unique within the owner by convention.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "ConfigMap::is_empty")]
    pub config: ConfigMap,
}

/// Outbound and inbound peer references of a processing node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub downstreams: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upstreams: Vec<String>,
}

impl Links {
    pub fn is_empty(&self) -> bool {
        self.downstreams.is_empty() && self.upstreams.is_empty()
    }
}

/// Which peer list of a node a link lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Downstream,
    Upstream,
}

impl LinkDirection {
    /// Human-facing list name, used in structural error messages.
    pub fn noun(self) -> &'static str {
        match self {
            LinkDirection::Downstream => "downstream",
            LinkDirection::Upstream => "upstream",
        }
    }
}

/// Which attachment list of a node an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Source,
    Sink,
}

impl AttachmentKind {
    pub fn noun(self) -> &'static str {
        match self {
            AttachmentKind::Source => "source",
            AttachmentKind::Sink => "sink",
        }
    }
}

/// A pipeline-stage entity, keyed by its connection address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingNode {
    /// Connection address; the node's identity for link resolution.
    pub connection: String,
    /// Control-plane address.
    pub grpc: String,
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical: Option<Vec<PhysicalSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sinks: Option<Vec<Sink>>,
}

impl ProcessingNode {
    pub fn new(connection: impl Into<String>, grpc: impl Into<String>, capacity: u32) -> Self {
        Self {
            connection: connection.into(),
            grpc: grpc.into(),
            capacity,
            links: Links::default(),
            physical: None,
            sinks: None,
        }
    }

    /// Sources as a slice, absent list reading as empty.
    pub fn sources(&self) -> &[PhysicalSource] {
        self.physical.as_deref().unwrap_or_default()
    }

    /// Sinks as a slice, absent list reading as empty.
    pub fn sink_list(&self) -> &[Sink] {
        self.sinks.as_deref().unwrap_or_default()
    }

    pub fn peer_list(&self, direction: LinkDirection) -> &Vec<String> {
        match direction {
            LinkDirection::Downstream => &self.links.downstreams,
            LinkDirection::Upstream => &self.links.upstreams,
        }
    }

    pub fn peer_list_mut(&mut self, direction: LinkDirection) -> &mut Vec<String> {
        match direction {
            LinkDirection::Downstream => &mut self.links.downstreams,
            LinkDirection::Upstream => &mut self.links.upstreams,
        }
    }
}

/// Aggregate root of the topology document.
///
/// `nodes` is required (empty allowed); `logical` may be absent and is
/// omitted from serialization when it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical: Option<Vec<LogicalSchema>>,
    pub nodes: Vec<ProcessingNode>,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            logical: None,
            nodes: Vec::new(),
        }
    }
}

impl Topology {
    /// Schemas as a slice, absent list reading as empty.
    pub fn schemas(&self) -> &[LogicalSchema] {
        self.logical.as_deref().unwrap_or_default()
    }

    /// First schema with the given name. First match wins when names
    /// are duplicated.
    pub fn schema(&self, name: &str) -> Option<&LogicalSchema> {
        self.schemas().iter().find(|s| s.name == name)
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schema(name).is_some()
    }

    /// Index of the first node with the given connection address.
    pub fn node_index(&self, connection: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.connection == connection)
    }

    /// First node with the given connection address.
    pub fn node(&self, connection: &str) -> Option<&ProcessingNode> {
        self.nodes.iter().find(|n| n.connection == connection)
    }

    pub fn node_mut(&mut self, connection: &str) -> Option<&mut ProcessingNode> {
        self.nodes.iter_mut().find(|n| n.connection == connection)
    }

    /// Total sink count across all nodes.
    pub fn total_sinks(&self) -> usize {
        self.nodes.iter().map(|n| n.sink_list().len()).sum()
    }

    /// Total physical source count across all nodes.
    pub fn total_sources(&self) -> usize {
        self.nodes.iter().map(|n| n.sources().len()).sum()
    }
}
