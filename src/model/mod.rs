//! Entity model for the pipeline topology.
//!
//! This module is the single source of truth for the topology graph:
//! the data types ([`topology`]), the structural mutators ([`mutate`]),
//! and the document serialization ([`document`]). The canvas, the text
//! editor, and the inspector all project from or mutate this model;
//! nothing else owns topology state.

pub mod document;
pub mod mutate;
pub mod topology;

pub use document::{
    load_document, parse_document, sample_topology, save_document, serialize_document,
};
pub use mutate::ReassignmentRequest;
pub use topology::{
    AttachmentKind, ConfigMap, FieldType, LinkDirection, Links, LogicalSchema, PhysicalSource,
    ProcessingNode, SchemaField, Sink, Topology, TypedConfig,
};
