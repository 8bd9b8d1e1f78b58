//! Selection state machine.
//!
//! Tracks which entity is selected across the three tiers (processing
//! node, physical source, sink). The selection stores identity, not
//! data: it is re-resolved against the live model on every render, by
//! name with the recorded index as tie-break, because structural edits
//! (a reassignment, say) can change an entity's owning list without
//! the selection noticing.

use crate::layout::render_graph::{RenderEntity, RenderKind};
use crate::model::{PhysicalSource, ProcessingNode, Sink, Topology};

/// The current selection, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Processing {
        connection: String,
    },
    Source {
        owner: String,
        name: String,
        index: usize,
    },
    Sink {
        owner: String,
        name: String,
        index: usize,
    },
}

/// A selection resolved against the live model.
#[derive(Debug)]
pub enum Resolved<'t> {
    Processing(&'t ProcessingNode),
    Source {
        owner: &'t ProcessingNode,
        source: &'t PhysicalSource,
        index: usize,
    },
    Sink {
        owner: &'t ProcessingNode,
        sink: &'t Sink,
        index: usize,
    },
}

/// Locate an entry by name with index tie-break: the recorded index wins
/// when its name still matches, otherwise the first name match wins.
fn locate<T>(list: &[T], name: &str, index: usize, name_of: impl Fn(&T) -> &str) -> Option<usize> {
    if list.get(index).map(|e| name_of(e) == name).unwrap_or(false) {
        return Some(index);
    }
    list.iter().position(|e| name_of(e) == name)
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    /// Transition for a click on a render entity.
    pub fn select_entity(&mut self, entity: &RenderEntity) {
        *self = match entity.kind {
            RenderKind::Processing => Selection::Processing {
                connection: entity.label.clone(),
            },
            RenderKind::Source => Selection::Source {
                owner: entity.owner_connection.clone().unwrap_or_default(),
                name: entity.label.clone(),
                index: entity.owner_index,
            },
            RenderKind::Sink => Selection::Sink {
                owner: entity.owner_connection.clone().unwrap_or_default(),
                name: entity.label.clone(),
                index: entity.owner_index,
            },
        };
    }

    /// Navigate from a source/sink selection back to its owner.
    pub fn select_owner(&mut self) {
        if let Selection::Source { owner, .. } | Selection::Sink { owner, .. } = self {
            *self = Selection::Processing {
                connection: std::mem::take(owner),
            };
        }
    }

    /// Resolve against the live model. A selection that no longer
    /// resolves reads as no selection.
    pub fn resolve<'t>(&self, topology: &'t Topology) -> Option<Resolved<'t>> {
        match self {
            Selection::None => None,
            Selection::Processing { connection } => {
                topology.node(connection).map(Resolved::Processing)
            }
            Selection::Source { owner, name, index } => {
                let node = topology.node(owner)?;
                let at = locate(node.sources(), name, *index, |s| &s.logical)?;
                Some(Resolved::Source {
                    owner: node,
                    source: &node.sources()[at],
                    index: at,
                })
            }
            Selection::Sink { owner, name, index } => {
                let node = topology.node(owner)?;
                let at = locate(node.sink_list(), name, *index, |s| &s.name)?;
                Some(Resolved::Sink {
                    owner: node,
                    sink: &node.sink_list()[at],
                    index: at,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sample_topology, AttachmentKind, ReassignmentRequest};

    #[test]
    fn test_resolve_sink_by_name() {
        let topology = sample_topology();
        let selection = Selection::Sink {
            owner: "aggregate:9100".to_string(),
            name: "console".to_string(),
            index: 0,
        };
        match selection.resolve(&topology) {
            Some(Resolved::Sink { sink, index, .. }) => {
                assert_eq!(sink.name, "console");
                assert_eq!(index, 0);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_stale_selection_resolves_to_none_after_reassign() {
        let mut topology = sample_topology();
        let selection = Selection::Sink {
            owner: "aggregate:9100".to_string(),
            name: "console".to_string(),
            index: 0,
        };
        topology.reassign(&ReassignmentRequest {
            source_owner: "aggregate:9100".to_string(),
            target_owner: "ingest:9100".to_string(),
            kind: AttachmentKind::Sink,
            index: 0,
        });
        assert!(selection.resolve(&topology).is_none());
    }

    #[test]
    fn test_index_tie_break_prefers_recorded_slot() {
        let mut topology = sample_topology();
        // Two sinks with the same name: the recorded index disambiguates.
        let dup = crate::model::Sink {
            name: "console".to_string(),
            kind: "File".to_string(),
            config: Default::default(),
        };
        topology.add_sink("aggregate:9100", dup);
        let selection = Selection::Sink {
            owner: "aggregate:9100".to_string(),
            name: "console".to_string(),
            index: 1,
        };
        match selection.resolve(&topology) {
            Some(Resolved::Sink { sink, index, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(sink.kind, "File");
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_back_to_owner() {
        let mut selection = Selection::Source {
            owner: "ingest:9100".to_string(),
            name: "events".to_string(),
            index: 0,
        };
        selection.select_owner();
        assert_eq!(
            selection,
            Selection::Processing {
                connection: "ingest:9100".to_string()
            }
        );
    }
}
