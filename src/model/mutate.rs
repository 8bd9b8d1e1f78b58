//! Structural mutators for the topology.
//!
//! Every mutator either leaves the topology invariants intact or fails
//! with no partial change. Attachment appends that cannot resolve their
//! owner are silent no-ops; removals, link mutators, and node mutators
//! report structural violations so the UI can surface them.

use crate::error::{Result, TopoVisError};

use super::topology::{
    AttachmentKind, LinkDirection, LogicalSchema, PhysicalSource, ProcessingNode, Sink, Topology,
};

/// A reassignment command emitted by the canvas drag layer on drop.
///
/// `index` is the dragged entity's position within its owner's list at
/// drag start. The command is applied asynchronously; if the owner or
/// index no longer match by then, the request is stale and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentRequest {
    pub source_owner: String,
    pub target_owner: String,
    pub kind: AttachmentKind,
    pub index: usize,
}

impl Topology {
    /// Add a processing node. Duplicate connection addresses are rejected
    /// since by-connection lookups would silently resolve to the first.
    pub fn add_node(&mut self, node: ProcessingNode) -> Result<()> {
        if self.node(&node.connection).is_some() {
            return Err(TopoVisError::structural(format!(
                "a node with connection '{}' already exists",
                node.connection
            )));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Remove the first node with the given connection address and scrub
    /// every other node's peer lists referencing it.
    pub fn remove_node(&mut self, connection: &str) -> Result<()> {
        let index = self.node_index(connection).ok_or_else(|| {
            TopoVisError::structural(format!("no node with connection '{}'", connection))
        })?;
        self.nodes.remove(index);
        for node in &mut self.nodes {
            node.links.downstreams.retain(|c| c != connection);
            node.links.upstreams.retain(|c| c != connection);
        }
        Ok(())
    }

    /// Add a logical schema. Duplicate names are rejected.
    pub fn add_schema(&mut self, schema: LogicalSchema) -> Result<()> {
        if self.has_schema(&schema.name) {
            return Err(TopoVisError::structural(format!(
                "a schema named '{}' already exists",
                schema.name
            )));
        }
        self.logical.get_or_insert_with(Vec::new).push(schema);
        Ok(())
    }

    /// Remove the first schema with the given name. Sources referencing
    /// it are left alone; they become dangling and are flagged visually.
    pub fn remove_schema(&mut self, name: &str) -> Result<()> {
        let Some(schemas) = self.logical.as_mut() else {
            return Err(TopoVisError::structural(format!(
                "no schema named '{}'",
                name
            )));
        };
        let index = schemas.iter().position(|s| s.name == name).ok_or_else(|| {
            TopoVisError::structural(format!("no schema named '{}'", name))
        })?;
        schemas.remove(index);
        if schemas.is_empty() {
            self.logical = None;
        }
        Ok(())
    }

    /// Append a source to the owner's list. No-op if the owner is missing.
    pub fn add_source(&mut self, owner: &str, source: PhysicalSource) {
        if let Some(node) = self.node_mut(owner) {
            node.physical.get_or_insert_with(Vec::new).push(source);
        }
    }

    /// Append a sink to the owner's list. No-op if the owner is missing.
    pub fn add_sink(&mut self, owner: &str, sink: Sink) {
        if let Some(node) = self.node_mut(owner) {
            node.sinks.get_or_insert_with(Vec::new).push(sink);
        }
    }

    /// Remove the source at `index` from the owner. A missing owner or
    /// out-of-range index is a reported structural violation with no
    /// mutation. An emptied list is cleared to absent.
    pub fn remove_source(&mut self, owner: &str, index: usize) -> Result<PhysicalSource> {
        let Some(node) = self.node_mut(owner) else {
            return Err(TopoVisError::structural(format!(
                "no node with connection '{}'",
                owner
            )));
        };
        let Some(list) = node.physical.as_mut().filter(|l| index < l.len()) else {
            return Err(TopoVisError::structural(format!(
                "no source at index {} on '{}'",
                index, owner
            )));
        };
        let removed = list.remove(index);
        if list.is_empty() {
            node.physical = None;
        }
        Ok(removed)
    }

    /// Remove the sink at `index` from the owner. Same contract as
    /// [`Topology::remove_source`].
    pub fn remove_sink(&mut self, owner: &str, index: usize) -> Result<Sink> {
        let Some(node) = self.node_mut(owner) else {
            return Err(TopoVisError::structural(format!(
                "no node with connection '{}'",
                owner
            )));
        };
        let Some(list) = node.sinks.as_mut().filter(|l| index < l.len()) else {
            return Err(TopoVisError::structural(format!(
                "no sink at index {} on '{}'",
                index, owner
            )));
        };
        let removed = list.remove(index);
        if list.is_empty() {
            node.sinks = None;
        }
        Ok(removed)
    }

    /// Atomically move an attachment from one owner's list to the end of
    /// another's. Returns `true` on success; a request that no longer
    /// resolves (missing owner, missing target, stale index, or owner ==
    /// target) is a no-op returning `false`.
    pub fn reassign(&mut self, request: &ReassignmentRequest) -> bool {
        let Some(from) = self.node_index(&request.source_owner) else {
            return false;
        };
        let Some(to) = self.node_index(&request.target_owner) else {
            return false;
        };
        if from == to {
            return false;
        }
        // A stale index is harmless here; the violation is discarded.
        match request.kind {
            AttachmentKind::Source => {
                let Ok(moved) = self.remove_source(&request.source_owner, request.index) else {
                    return false;
                };
                self.nodes[to].physical.get_or_insert_with(Vec::new).push(moved);
            }
            AttachmentKind::Sink => {
                let Ok(moved) = self.remove_sink(&request.source_owner, request.index) else {
                    return false;
                };
                self.nodes[to].sinks.get_or_insert_with(Vec::new).push(moved);
            }
        }
        true
    }

    /// Add a peer link to `source`'s list for the given direction. Both
    /// endpoints must exist and the link must not already be present.
    pub fn add_link(&mut self, source: &str, target: &str, direction: LinkDirection) -> Result<()> {
        if self.node(target).is_none() {
            return Err(TopoVisError::structural(format!(
                "no node with connection '{}'",
                target
            )));
        }
        let Some(node) = self.node_mut(source) else {
            return Err(TopoVisError::structural(format!(
                "no node with connection '{}'",
                source
            )));
        };
        let list = node.peer_list_mut(direction);
        if list.iter().any(|c| c == target) {
            return Err(TopoVisError::structural(format!(
                "'{}' already has '{}' as a {}",
                source,
                target,
                direction.noun()
            )));
        }
        list.push(target.to_string());
        Ok(())
    }

    /// Remove a peer link from `source`'s list for the given direction.
    pub fn remove_link(
        &mut self,
        source: &str,
        target: &str,
        direction: LinkDirection,
    ) -> Result<()> {
        let Some(node) = self.node_mut(source) else {
            return Err(TopoVisError::structural(format!(
                "no node with connection '{}'",
                source
            )));
        };
        let list = node.peer_list_mut(direction);
        let index = list.iter().position(|c| c == target).ok_or_else(|| {
            TopoVisError::structural(format!(
                "'{}' does not have '{}' as a {}",
                source,
                target,
                direction.noun()
            ))
        })?;
        list.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::topology::TypedConfig;

    fn two_nodes() -> Topology {
        Topology {
            logical: None,
            nodes: vec![
                ProcessingNode::new("a:1", "a:2", 4),
                ProcessingNode::new("b:1", "b:2", 4),
            ],
        }
    }

    fn sink(name: &str) -> Sink {
        Sink {
            name: name.to_string(),
            kind: "Print".to_string(),
            config: Default::default(),
        }
    }

    fn source(logical: &str) -> PhysicalSource {
        PhysicalSource {
            logical: logical.to_string(),
            parser_config: TypedConfig::new("json"),
            source_config: TypedConfig::new("kafka"),
        }
    }

    #[test]
    fn test_add_source_to_missing_owner_is_noop() {
        let mut topology = two_nodes();
        topology.add_source("nope:1", source("events"));
        assert_eq!(topology.total_sources(), 0);
    }

    #[test]
    fn test_remove_last_sink_clears_list() {
        let mut topology = two_nodes();
        topology.add_sink("a:1", sink("s1"));
        let removed = topology.remove_sink("a:1", 0).unwrap();
        assert_eq!(removed.name, "s1");
        assert!(topology.node("a:1").unwrap().sinks.is_none());
    }

    #[test]
    fn test_remove_out_of_range_is_reported() {
        let mut topology = two_nodes();
        topology.add_sink("a:1", sink("s1"));
        let err = topology.remove_sink("a:1", 1).unwrap_err();
        assert_eq!(err.to_string(), "no sink at index 1 on 'a:1'");
        assert_eq!(topology.total_sinks(), 1);
    }

    #[test]
    fn test_remove_from_missing_owner_is_reported() {
        let mut topology = two_nodes();
        let err = topology.remove_source("ghost:1", 0).unwrap_err();
        assert!(err.to_string().contains("ghost:1"));
    }

    #[test]
    fn test_reassign_moves_sink_to_end() {
        let mut topology = two_nodes();
        topology.add_sink("a:1", sink("s1"));
        topology.add_sink("b:1", sink("existing"));
        let ok = topology.reassign(&ReassignmentRequest {
            source_owner: "a:1".to_string(),
            target_owner: "b:1".to_string(),
            kind: AttachmentKind::Sink,
            index: 0,
        });
        assert!(ok);
        assert!(topology.node("a:1").unwrap().sinks.is_none());
        let b_sinks = topology.node("b:1").unwrap().sink_list();
        assert_eq!(b_sinks.len(), 2);
        assert_eq!(b_sinks.last().unwrap().name, "s1");
        assert_eq!(topology.total_sinks(), 2);
    }

    #[test]
    fn test_reassign_stale_index_is_noop() {
        let mut topology = two_nodes();
        topology.add_sink("a:1", sink("s1"));
        let ok = topology.reassign(&ReassignmentRequest {
            source_owner: "a:1".to_string(),
            target_owner: "b:1".to_string(),
            kind: AttachmentKind::Sink,
            index: 3,
        });
        assert!(!ok);
        assert_eq!(topology.node("a:1").unwrap().sink_list().len(), 1);
        assert_eq!(topology.total_sinks(), 1);
    }

    #[test]
    fn test_reassign_to_same_owner_is_noop() {
        let mut topology = two_nodes();
        topology.add_sink("a:1", sink("s1"));
        let ok = topology.reassign(&ReassignmentRequest {
            source_owner: "a:1".to_string(),
            target_owner: "a:1".to_string(),
            kind: AttachmentKind::Sink,
            index: 0,
        });
        assert!(!ok);
        assert_eq!(topology.node("a:1").unwrap().sink_list().len(), 1);
    }

    #[test]
    fn test_duplicate_downstream_rejected() {
        let mut topology = two_nodes();
        topology
            .add_link("a:1", "b:1", LinkDirection::Downstream)
            .unwrap();
        let err = topology
            .add_link("a:1", "b:1", LinkDirection::Downstream)
            .unwrap_err();
        assert!(err.to_string().contains("already has 'b:1' as a downstream"));
        assert_eq!(topology.node("a:1").unwrap().links.downstreams.len(), 1);
    }

    #[test]
    fn test_link_to_missing_node_rejected() {
        let mut topology = two_nodes();
        let err = topology
            .add_link("a:1", "ghost:1", LinkDirection::Downstream)
            .unwrap_err();
        assert!(err.to_string().contains("ghost:1"));
        assert!(topology.node("a:1").unwrap().links.downstreams.is_empty());
    }

    #[test]
    fn test_remove_node_scrubs_peers() {
        let mut topology = two_nodes();
        topology
            .add_link("a:1", "b:1", LinkDirection::Downstream)
            .unwrap();
        topology
            .add_link("b:1", "a:1", LinkDirection::Upstream)
            .unwrap();
        topology.remove_node("a:1").unwrap();
        assert!(topology.node("a:1").is_none());
        let b = topology.node("b:1").unwrap();
        assert!(b.links.upstreams.is_empty());
    }

    #[test]
    fn test_remove_last_schema_clears_list() {
        let mut topology = two_nodes();
        topology
            .add_schema(LogicalSchema {
                name: "events".to_string(),
                schema: Vec::new(),
            })
            .unwrap();
        topology.remove_schema("events").unwrap();
        assert!(topology.logical.is_none());
    }
}
