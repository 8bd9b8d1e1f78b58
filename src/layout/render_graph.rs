//! Derived render graph.
//!
//! The render graph is a projection of the entity model: one
//! [`RenderEntity`] per processing node, physical source, and sink, plus
//! synthetic [`RenderLink`]s for peer and ownership edges. It is rebuilt
//! on every structural change, not every frame. Entities carry stable
//! synthetic ids handed out by an [`IdTable`] so positions survive
//! rebuilds; identity is by owner + name (with an occurrence counter as
//! tie-break for duplicate names), never by raw list index.

use std::collections::HashMap;

use crate::model::{AttachmentKind, Topology};

/// Stable synthetic identifier for a render entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderId(pub u64);

/// Visual tier of a render entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderKind {
    Processing,
    Source,
    Sink,
}

/// One visual entity on the canvas.
#[derive(Debug, Clone)]
pub struct RenderEntity {
    pub id: RenderId,
    pub kind: RenderKind,
    /// Connection address for processing nodes, logical schema name for
    /// sources, sink name for sinks.
    pub label: String,
    /// Owning processing node, for sources and sinks. Lookup only.
    pub owner: Option<RenderId>,
    pub owner_connection: Option<String>,
    /// Position within the owner's attachment list at build time.
    pub owner_index: usize,
    /// For sources: the referenced schema does not exist.
    pub dangling: bool,
}

/// Edge kind of a render link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderLinkKind {
    Downstream,
    Upstream,
    OwnsSource,
    OwnsSink,
}

impl RenderLinkKind {
    /// Ownership edges keep attachments clustered around their owner.
    pub fn is_ownership(self) -> bool {
        matches!(self, RenderLinkKind::OwnsSource | RenderLinkKind::OwnsSink)
    }
}

/// One edge of the render graph.
#[derive(Debug, Clone, Copy)]
pub struct RenderLink {
    pub source: RenderId,
    pub target: RenderId,
    pub kind: RenderLinkKind,
}

/// The derived visual graph.
#[derive(Debug, Clone, Default)]
pub struct RenderGraph {
    pub entities: Vec<RenderEntity>,
    pub links: Vec<RenderLink>,
}

impl RenderGraph {
    pub fn entity(&self, id: RenderId) -> Option<&RenderEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Iterate processing-node entities only.
    pub fn processing(&self) -> impl Iterator<Item = &RenderEntity> {
        self.entities
            .iter()
            .filter(|e| e.kind == RenderKind::Processing)
    }

    /// Number of same-kind siblings the entity had at build time.
    pub fn sibling_count(&self, entity: &RenderEntity) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind == entity.kind && e.owner == entity.owner)
            .count()
    }
}

/// Identity key used to carry a render id across rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum EntityKey {
    Processing {
        connection: String,
        occurrence: usize,
    },
    Attachment {
        owner: String,
        kind: AttachmentKind,
        name: String,
        occurrence: usize,
    },
}

/// Allocates render ids and remembers them per identity key.
#[derive(Debug, Default)]
pub struct IdTable {
    ids: HashMap<EntityKey, RenderId>,
    next: u64,
}

impl IdTable {
    fn resolve(&mut self, key: EntityKey) -> RenderId {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = RenderId(self.next);
        self.next += 1;
        self.ids.insert(key, id);
        id
    }
}

/// Build the render graph from the model, reusing ids for entities whose
/// identity is unchanged.
pub fn build_render_graph(topology: &Topology, ids: &mut IdTable) -> RenderGraph {
    let mut graph = RenderGraph::default();
    // connection -> render id; first node wins on duplicate connections
    let mut by_connection: HashMap<&str, RenderId> = HashMap::new();
    // Counts how many times each identity has been seen this build, so
    // duplicate names fall back to positional occurrence as tie-break.
    let mut occurrences: HashMap<EntityKey, usize> = HashMap::new();
    fn next_occurrence(occurrences: &mut HashMap<EntityKey, usize>, key: EntityKey) -> usize {
        let counter = occurrences.entry(key).or_insert(0);
        let n = *counter;
        *counter += 1;
        n
    }

    for node in &topology.nodes {
        let occurrence = next_occurrence(
            &mut occurrences,
            EntityKey::Processing {
                connection: node.connection.clone(),
                occurrence: 0,
            },
        );
        let id = ids.resolve(EntityKey::Processing {
            connection: node.connection.clone(),
            occurrence,
        });
        by_connection.entry(node.connection.as_str()).or_insert(id);
        graph.entities.push(RenderEntity {
            id,
            kind: RenderKind::Processing,
            label: node.connection.clone(),
            owner: None,
            owner_connection: None,
            owner_index: 0,
            dangling: false,
        });

        for (index, source) in node.sources().iter().enumerate() {
            let occurrence = next_occurrence(
                &mut occurrences,
                EntityKey::Attachment {
                    owner: node.connection.clone(),
                    kind: AttachmentKind::Source,
                    name: source.logical.clone(),
                    occurrence: 0,
                },
            );
            let source_id = ids.resolve(EntityKey::Attachment {
                owner: node.connection.clone(),
                kind: AttachmentKind::Source,
                name: source.logical.clone(),
                occurrence,
            });
            graph.entities.push(RenderEntity {
                id: source_id,
                kind: RenderKind::Source,
                label: source.logical.clone(),
                owner: Some(id),
                owner_connection: Some(node.connection.clone()),
                owner_index: index,
                dangling: !topology.has_schema(&source.logical),
            });
            graph.links.push(RenderLink {
                source: id,
                target: source_id,
                kind: RenderLinkKind::OwnsSource,
            });
        }

        for (index, sink) in node.sink_list().iter().enumerate() {
            let occurrence = next_occurrence(
                &mut occurrences,
                EntityKey::Attachment {
                    owner: node.connection.clone(),
                    kind: AttachmentKind::Sink,
                    name: sink.name.clone(),
                    occurrence: 0,
                },
            );
            let sink_id = ids.resolve(EntityKey::Attachment {
                owner: node.connection.clone(),
                kind: AttachmentKind::Sink,
                name: sink.name.clone(),
                occurrence,
            });
            graph.entities.push(RenderEntity {
                id: sink_id,
                kind: RenderKind::Sink,
                label: sink.name.clone(),
                owner: Some(id),
                owner_connection: Some(node.connection.clone()),
                owner_index: index,
                dangling: false,
            });
            graph.links.push(RenderLink {
                source: id,
                target: sink_id,
                kind: RenderLinkKind::OwnsSink,
            });
        }
    }

    // Peer edges. Upstream declarations already implied by the peer's
    // matching downstream are suppressed to avoid duplicate edges.
    for node in &topology.nodes {
        let Some(&from) = by_connection.get(node.connection.as_str()) else {
            continue;
        };
        for peer in &node.links.downstreams {
            if let Some(&to) = by_connection.get(peer.as_str()) {
                graph.links.push(RenderLink {
                    source: from,
                    target: to,
                    kind: RenderLinkKind::Downstream,
                });
            }
        }
        for peer in &node.links.upstreams {
            let implied = topology
                .node(peer)
                .map(|p| p.links.downstreams.iter().any(|d| d == &node.connection))
                .unwrap_or(false);
            if implied {
                continue;
            }
            if let Some(&to) = by_connection.get(peer.as_str()) {
                graph.links.push(RenderLink {
                    source: from,
                    target: to,
                    kind: RenderLinkKind::Upstream,
                });
            }
        }
    }

    graph
}
