//! Force relaxation over the render graph.
//!
//! A discrete-time simulation: pairwise repulsion scaled by entity-kind
//! pair, spring attraction along render links (ownership edges rest
//! shorter so sources and sinks cluster around their owner), hard
//! collision separation with kind-proportional radii, and a weak
//! centering pull toward the viewport center. An alpha coefficient
//! cools the simulation to a stable layout; structural changes and
//! drags reheat it.

use std::collections::HashMap;

use egui::{Pos2, Vec2};

use super::render_graph::{RenderGraph, RenderId, RenderKind};

/// Visual radius per entity kind; processing nodes are the largest tier.
pub fn entity_radius(kind: RenderKind) -> f32 {
    match kind {
        RenderKind::Processing => 28.0,
        RenderKind::Source => 14.0,
        RenderKind::Sink => 14.0,
    }
}

/// How forgiving a drop is: larger than the node's visual radius.
pub const CAPTURE_RADIUS: f32 = 48.0;

/// A cached position only moves once it shifted more than this.
const POSITION_EPSILON: f32 = 0.5;

const REPULSION_PROCESSING: f32 = 2600.0;
const REPULSION_MIXED: f32 = 900.0;
const REPULSION_ATTACHED: f32 = 350.0;

const SPRING_STIFFNESS: f32 = 0.06;
const REST_LENGTH_OWNERSHIP: f32 = 70.0;
const REST_LENGTH_PEER: f32 = 190.0;

const CENTERING: f32 = 0.012;
const MAX_DISPLACEMENT: f32 = 14.0;

const ALPHA_DECAY: f32 = 0.97;
const ALPHA_MIN: f32 = 0.01;

fn repulsion_strength(a: RenderKind, b: RenderKind) -> f32 {
    use RenderKind::Processing;
    match (a == Processing, b == Processing) {
        (true, true) => REPULSION_PROCESSING,
        (false, false) => REPULSION_ATTACHED,
        _ => REPULSION_MIXED,
    }
}

/// The relaxation state machine: a single cooling coefficient.
#[derive(Debug)]
pub struct Simulation {
    alpha: f32,
}

impl Default for Simulation {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

impl Simulation {
    /// Restart cooling after a perturbation (structural change or drag).
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    /// Whether the layout is still settling.
    pub fn active(&self) -> bool {
        self.alpha >= ALPHA_MIN
    }

    /// Advance one step. The pinned entity (an active drag) is excluded
    /// from free relaxation; the pointer owns its position.
    pub fn step(
        &mut self,
        graph: &RenderGraph,
        positions: &mut HashMap<RenderId, Pos2>,
        pinned: Option<RenderId>,
        center: Pos2,
    ) {
        if !self.active() {
            return;
        }

        let n = graph.entities.len();
        let mut forces: HashMap<RenderId, Vec2> = HashMap::with_capacity(n);

        // Pairwise repulsion, inverse-square falloff.
        for i in 0..n {
            for j in (i + 1)..n {
                let a = &graph.entities[i];
                let b = &graph.entities[j];
                let (Some(&pa), Some(&pb)) = (positions.get(&a.id), positions.get(&b.id)) else {
                    continue;
                };
                let delta = pb - pa;
                let dist_sq = delta.length_sq().max(1.0);
                let strength = repulsion_strength(a.kind, b.kind);
                let push = delta * (strength / dist_sq) / dist_sq.sqrt();
                *forces.entry(a.id).or_default() -= push;
                *forces.entry(b.id).or_default() += push;
            }
        }

        // Spring attraction along links toward the kind's rest length.
        for link in &graph.links {
            let (Some(&pa), Some(&pb)) = (positions.get(&link.source), positions.get(&link.target))
            else {
                continue;
            };
            let delta = pb - pa;
            let dist = delta.length().max(0.1);
            let rest = if link.kind.is_ownership() {
                REST_LENGTH_OWNERSHIP
            } else {
                REST_LENGTH_PEER
            };
            let pull = delta * (SPRING_STIFFNESS * (dist - rest) / dist);
            *forces.entry(link.source).or_default() += pull;
            *forces.entry(link.target).or_default() -= pull;
        }

        // Centering keeps the layout from drifting off the viewport.
        for entity in &graph.entities {
            if let Some(&p) = positions.get(&entity.id) {
                *forces.entry(entity.id).or_default() += (center - p) * CENTERING;
            }
        }

        // Apply cooled, clamped displacements.
        for entity in &graph.entities {
            if pinned == Some(entity.id) {
                continue;
            }
            let Some(force) = forces.get(&entity.id) else {
                continue;
            };
            let mut displacement = *force * self.alpha;
            let length = displacement.length();
            if length > MAX_DISPLACEMENT {
                displacement *= MAX_DISPLACEMENT / length;
            }
            if displacement.length() > POSITION_EPSILON {
                if let Some(p) = positions.get_mut(&entity.id) {
                    *p += displacement;
                }
            }
        }

        // Collision separation: hard minimum distance by radius sum.
        for i in 0..n {
            for j in (i + 1)..n {
                let a = &graph.entities[i];
                let b = &graph.entities[j];
                let (Some(&pa), Some(&pb)) = (positions.get(&a.id), positions.get(&b.id)) else {
                    continue;
                };
                let min_dist = entity_radius(a.kind) + entity_radius(b.kind) + 4.0;
                let delta = pb - pa;
                let dist = delta.length();
                if dist >= min_dist || dist < f32::EPSILON {
                    continue;
                }
                let correction = delta * ((min_dist - dist) / dist * 0.5);
                if pinned != Some(a.id) {
                    if let Some(p) = positions.get_mut(&a.id) {
                        *p -= correction;
                    }
                }
                if pinned != Some(b.id) {
                    if let Some(p) = positions.get_mut(&b.id) {
                        *p += correction;
                    }
                }
            }
        }

        self.alpha *= ALPHA_DECAY;
    }
}
