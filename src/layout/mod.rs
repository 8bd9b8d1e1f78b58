//! Layout engine: render-graph derivation plus position relaxation.
//!
//! [`LayoutEngine`] owns the derived render graph and every entity
//! position. The entity model is read-only input here; the engine's
//! only write path back to the model is the reassignment request the
//! canvas emits on drop. Positions are cached by stable render id so a
//! rebuild (after adding a sink, say) does not reset unrelated
//! entities, and an actively dragged entity is owned by the pointer
//! until release.

pub mod palette;
pub mod render_graph;
pub mod simulation;

use std::collections::HashMap;
use std::f32::consts::PI;

use egui::{Pos2, Vec2};

use crate::model::Topology;

use palette::stable_hash;
use render_graph::{build_render_graph, IdTable, RenderEntity, RenderGraph, RenderId, RenderKind};
use simulation::{entity_radius, Simulation, CAPTURE_RADIUS};

/// Distance of freshly seeded sources/sinks from their owner.
const SEED_ARC_RADIUS: f32 = 80.0;

pub struct LayoutEngine {
    graph: RenderGraph,
    ids: IdTable,
    positions: HashMap<RenderId, Pos2>,
    simulation: Simulation,
    pinned: Option<RenderId>,
    center: Pos2,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            graph: RenderGraph::default(),
            ids: IdTable::default(),
            positions: HashMap::new(),
            simulation: Simulation::default(),
            pinned: None,
            center: Pos2::new(480.0, 320.0),
        }
    }
}

impl LayoutEngine {
    pub fn new(topology: &Topology) -> Self {
        let mut engine = Self::default();
        engine.rebuild(topology);
        engine
    }

    pub fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    pub fn position(&self, id: RenderId) -> Option<Pos2> {
        self.positions.get(&id).copied()
    }

    /// Viewport center the layout gravitates toward.
    pub fn set_center(&mut self, center: Pos2) {
        self.center = center;
    }

    /// Re-derive the render graph from the model, carrying positions
    /// over by stable id and seeding the rest. Reheats the simulation.
    pub fn rebuild(&mut self, topology: &Topology) {
        self.graph = build_render_graph(topology, &mut self.ids);

        // Entities are ordered owner-before-attachment, so an owner's
        // seed position exists by the time its attachments seed.
        for index in 0..self.graph.entities.len() {
            let entity = &self.graph.entities[index];
            if self.positions.contains_key(&entity.id) {
                continue;
            }
            let seed = self.seed_position(entity);
            self.positions.insert(entity.id, seed);
        }

        // Drop cached positions of entities that no longer exist.
        let live: std::collections::HashSet<RenderId> =
            self.graph.entities.iter().map(|e| e.id).collect();
        self.positions.retain(|id, _| live.contains(id));

        if self.pinned.map(|id| !live.contains(&id)).unwrap_or(false) {
            self.pinned = None;
        }
        self.simulation.reheat();
    }

    fn seed_position(&self, entity: &RenderEntity) -> Pos2 {
        match entity.kind {
            RenderKind::Processing => {
                // Deterministic jitter so coincident spawns separate fast.
                let hash = stable_hash(&entity.label);
                let angle = (hash % 628) as f32 / 100.0;
                let radius = 60.0 + ((hash >> 8) % 120) as f32;
                self.center + Vec2::new(angle.cos(), angle.sin()) * radius
            }
            RenderKind::Source | RenderKind::Sink => {
                let owner_pos = entity
                    .owner
                    .and_then(|o| self.positions.get(&o).copied())
                    .unwrap_or(self.center);
                let siblings = self.graph.sibling_count(entity).max(1);
                // Even spread on a semicircular arc: sources above the
                // owner, sinks below.
                let angle = PI * (entity.owner_index + 1) as f32 / (siblings + 1) as f32;
                let vertical = match entity.kind {
                    RenderKind::Source => -angle.sin(),
                    _ => angle.sin(),
                };
                owner_pos + Vec2::new(angle.cos(), vertical) * SEED_ARC_RADIUS
            }
        }
    }

    /// Restart the cooling schedule without touching positions.
    pub fn reheat(&mut self) {
        self.simulation.reheat();
    }

    /// Advance the relaxation one frame. Returns whether the layout is
    /// still settling (callers keep requesting repaints while true).
    pub fn step(&mut self) -> bool {
        if !self.simulation.active() {
            return false;
        }
        self.simulation
            .step(&self.graph, &mut self.positions, self.pinned, self.center);
        self.simulation.active()
    }

    /// Run the relaxation to convergence (tests and benchmarks).
    pub fn relax(&mut self) {
        while self.step() {}
    }

    /// Topmost entity under the pointer; attachments win over their
    /// larger owners so they stay clickable inside the cluster.
    pub fn entity_at(&self, pos: Pos2) -> Option<&RenderEntity> {
        let hit = |entity: &RenderEntity| {
            self.positions
                .get(&entity.id)
                .map(|p| (*p - pos).length() <= entity_radius(entity.kind) + 2.0)
                .unwrap_or(false)
        };
        self.graph
            .entities
            .iter()
            .filter(|e| e.kind != RenderKind::Processing)
            .find(|e| hit(e))
            .or_else(|| self.graph.processing().find(|e| hit(e)))
    }

    /// Nearest processing node within the capture radius of a release
    /// position, excluding the dragged entity's current owner.
    pub fn drop_target(&self, pos: Pos2, exclude_owner: &str) -> Option<&RenderEntity> {
        self.graph
            .processing()
            .filter(|e| e.label != exclude_owner)
            .filter_map(|e| {
                let dist = (*self.positions.get(&e.id)? - pos).length();
                (dist <= CAPTURE_RADIUS).then_some((e, dist))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e)
    }

    /// Pin an entity to the pointer for the duration of a drag.
    pub fn begin_drag(&mut self, id: RenderId) {
        self.pinned = Some(id);
        self.simulation.reheat();
    }

    pub fn drag_to(&mut self, id: RenderId, pos: Pos2) {
        if self.pinned == Some(id) {
            self.positions.insert(id, pos);
        }
    }

    /// Release the pinned entity and let the simulation re-settle it.
    pub fn end_drag(&mut self) {
        self.pinned = None;
        self.simulation.reheat();
    }

    pub fn dragging(&self) -> Option<RenderId> {
        self.pinned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sample_topology, Sink};

    #[test]
    fn test_positions_survive_rebuild() {
        let mut topology = sample_topology();
        let mut engine = LayoutEngine::new(&topology);
        engine.relax();

        let source_id = engine
            .graph()
            .entities
            .iter()
            .find(|e| e.kind == RenderKind::Source)
            .unwrap()
            .id;
        let settled = engine.position(source_id).unwrap();

        topology.add_sink(
            "ingest:9100",
            Sink {
                name: "audit".to_string(),
                kind: "File".to_string(),
                config: Default::default(),
            },
        );
        engine.rebuild(&topology);
        // Rebuild carries the cached position over unchanged.
        assert_eq!(engine.position(source_id).unwrap(), settled);
    }

    #[test]
    fn test_sources_seed_above_owner_sinks_below() {
        let mut topology = sample_topology();
        topology.add_sink(
            "ingest:9100",
            Sink {
                name: "audit".to_string(),
                kind: "File".to_string(),
                config: Default::default(),
            },
        );
        let engine = LayoutEngine::new(&topology);
        let graph = engine.graph();

        let owner = graph
            .processing()
            .find(|e| e.label == "ingest:9100")
            .unwrap();
        let owner_pos = engine.position(owner.id).unwrap();
        for entity in &graph.entities {
            if entity.owner != Some(owner.id) {
                continue;
            }
            let pos = engine.position(entity.id).unwrap();
            match entity.kind {
                RenderKind::Source => assert!(pos.y < owner_pos.y),
                RenderKind::Sink => assert!(pos.y > owner_pos.y),
                RenderKind::Processing => unreachable!(),
            }
        }
    }

    #[test]
    fn test_drop_target_respects_radius_and_owner() {
        let topology = sample_topology();
        let mut engine = LayoutEngine::new(&topology);
        engine.relax();

        let target = engine
            .graph()
            .processing()
            .find(|e| e.label == "aggregate:9100")
            .unwrap();
        let target_id = target.id;
        let target_pos = engine.position(target_id).unwrap();

        // Dead center: hit.
        let hit = engine.drop_target(target_pos, "ingest:9100").unwrap();
        assert_eq!(hit.id, target_id);

        // The dragged entity's own owner never captures.
        assert!(engine.drop_target(target_pos, "aggregate:9100").is_none());

        // Outside the capture radius: no target.
        let far = target_pos + Vec2::new(CAPTURE_RADIUS * 3.0, 0.0);
        let miss = engine.drop_target(far, "ingest:9100");
        assert!(miss.map(|e| e.id != target_id).unwrap_or(true));
    }

    #[test]
    fn test_vanished_entities_lose_cached_positions() {
        let mut topology = sample_topology();
        let mut engine = LayoutEngine::new(&topology);
        let sink_id = engine
            .graph()
            .entities
            .iter()
            .find(|e| e.kind == RenderKind::Sink)
            .unwrap()
            .id;

        topology.remove_sink("aggregate:9100", 0).unwrap();
        engine.rebuild(&topology);
        assert!(engine.position(sink_id).is_none());
    }
}
