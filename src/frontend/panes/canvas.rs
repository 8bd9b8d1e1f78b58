//! Topology canvas pane — force-directed rendering of the render graph.
//!
//! Draws processing nodes, their sources and sinks, and the peer and
//! ownership edges between them, with pan/zoom. Clicks drive the
//! selection; dragging a source or sink onto another processing node
//! emits a reassignment request over the typed channel.

use std::any::Any;

use egui::{Align2, Color32, FontId, Pos2, Stroke, Ui, Vec2};

use crate::frontend::pane_trait::Pane;
use crate::frontend::selection::Selection;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::workspace::PaneKind;
use crate::layout::palette::{schema_colors, WARNING_BORDER, WARNING_FILL};
use crate::layout::render_graph::{RenderEntity, RenderId, RenderKind, RenderLinkKind};
use crate::layout::simulation::{entity_radius, CAPTURE_RADIUS};
use crate::model::{AttachmentKind, ReassignmentRequest};

const PROCESSING_FILL: Color32 = Color32::from_rgb(0x3a, 0x45, 0x54);
const SINK_FILL: Color32 = Color32::from_rgb(0x7a, 0x6a, 0x4f);
const PEER_LINK: Color32 = Color32::from_gray(150);
const OWNERSHIP_LINK: Color32 = Color32::from_gray(80);
const LABEL_COLOR: Color32 = Color32::from_gray(220);
const CAPTURE_RING: Color32 = Color32::from_rgb(0x6f, 0xc2, 0x76);

/// An in-progress drag of a render entity.
struct DragState {
    id: RenderId,
    kind: RenderKind,
    owner: Option<String>,
    owner_index: usize,
}

impl DragState {
    fn attachment_kind(&self) -> Option<AttachmentKind> {
        match self.kind {
            RenderKind::Source => Some(AttachmentKind::Source),
            RenderKind::Sink => Some(AttachmentKind::Sink),
            RenderKind::Processing => None,
        }
    }
}

/// State for the topology canvas pane.
pub struct CanvasPaneState {
    pan_offset: Vec2,
    zoom: f32,
    drag: Option<DragState>,
}

impl Default for CanvasPaneState {
    fn default() -> Self {
        Self {
            pan_offset: Vec2::ZERO,
            zoom: 1.0,
            drag: None,
        }
    }
}

impl Pane for CanvasPaneState {
    fn kind(&self) -> PaneKind {
        PaneKind::Canvas
    }

    fn render(&mut self, shared: &mut SharedState, ui: &mut Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.heading("Topology");
            ui.separator();
            ui.label(format!(
                "{} nodes, {} sources, {} sinks",
                shared.topology.nodes.len(),
                shared.topology.total_sources(),
                shared.topology.total_sinks(),
            ));
            ui.separator();
            if ui.button("Re-layout").clicked() {
                shared.layout.reheat();
            }
            if ui.button("Reset View").clicked() {
                self.pan_offset = Vec2::ZERO;
                self.zoom = 1.0;
            }
        });
        ui.separator();

        let available = ui.available_rect_before_wrap();
        let (response, painter) =
            ui.allocate_painter(available.size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        painter.rect_filled(canvas_rect, 0.0, Color32::from_gray(30));

        // Pan (middle mouse or shift+drag) and zoom (scroll).
        if response.dragged_by(egui::PointerButton::Middle)
            || (response.dragged_by(egui::PointerButton::Primary)
                && ui.input(|i| i.modifiers.shift)
                && self.drag.is_none())
        {
            self.pan_offset += response.drag_delta();
        }
        if response.hovered() {
            let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll_delta != 0.0 {
                let factor = 1.0 + scroll_delta * 0.002;
                self.zoom = (self.zoom * factor).clamp(0.25, 4.0);
            }
        }

        let origin = canvas_rect.min.to_vec2() + self.pan_offset;
        let zoom = self.zoom;
        let to_screen = |pos: Pos2| -> Pos2 { (pos.to_vec2() * zoom + origin).to_pos2() };
        let to_world = |pos: Pos2| -> Pos2 { ((pos.to_vec2() - origin) / zoom).to_pos2() };

        shared.layout.set_center(to_world(canvas_rect.center()));
        if shared.layout.step() {
            ui.ctx().request_repaint();
        }

        // Input, before drawing, so the paint pass sees settled state.
        let plain_drag = response.dragged_by(egui::PointerButton::Primary)
            && !ui.input(|i| i.modifiers.shift);
        let pointer_world = response.interact_pointer_pos().map(to_world);

        if response.drag_started_by(egui::PointerButton::Primary)
            && !ui.input(|i| i.modifiers.shift)
        {
            if let Some(pos) = pointer_world {
                if let Some(entity) = shared.layout.entity_at(pos) {
                    let drag = DragState {
                        id: entity.id,
                        kind: entity.kind,
                        owner: entity.owner_connection.clone(),
                        owner_index: entity.owner_index,
                    };
                    shared.layout.begin_drag(drag.id);
                    self.drag = Some(drag);
                }
            }
        }

        if plain_drag {
            if let (Some(drag), Some(pos)) = (&self.drag, pointer_world) {
                shared.layout.drag_to(drag.id, pos);
            }
        }

        if response.drag_stopped() {
            if let Some(drag) = self.drag.take() {
                if let (Some(kind), Some(owner), Some(pos)) =
                    (drag.attachment_kind(), drag.owner.as_deref(), pointer_world)
                {
                    if let Some(target) = shared.layout.drop_target(pos, owner) {
                        let request = ReassignmentRequest {
                            source_owner: owner.to_string(),
                            target_owner: target.label.clone(),
                            kind,
                            index: drag.owner_index,
                        };
                        let _ = shared.reassign_tx.send(request);
                    }
                }
                shared.layout.end_drag();
            }
        }

        if response.clicked() {
            let clicked = response
                .interact_pointer_pos()
                .map(to_world)
                .and_then(|pos| shared.layout.entity_at(pos));
            match clicked {
                Some(entity) => {
                    let mut selection = Selection::default();
                    selection.select_entity(entity);
                    actions.push(AppAction::Select(selection));
                }
                None => actions.push(AppAction::ClearSelection),
            }
        }

        // Paint pass: edges behind entities, labels on top.
        let colors = schema_colors(shared.topology);
        let graph = shared.layout.graph();

        for link in &graph.links {
            let (Some(from), Some(to)) = (
                shared.layout.position(link.source),
                shared.layout.position(link.target),
            ) else {
                continue;
            };
            let from = to_screen(from);
            let to = to_screen(to);
            match link.kind {
                RenderLinkKind::OwnsSource | RenderLinkKind::OwnsSink => {
                    painter.line_segment([from, to], Stroke::new(1.0 * zoom, OWNERSHIP_LINK));
                }
                RenderLinkKind::Downstream => {
                    let target_radius = graph
                        .entity(link.target)
                        .map(|e| entity_radius(e.kind))
                        .unwrap_or(0.0);
                    draw_arrow(&painter, from, to, target_radius * zoom, zoom, PEER_LINK);
                }
                RenderLinkKind::Upstream => {
                    painter.add(egui::Shape::dashed_line(
                        &[from, to],
                        Stroke::new(1.5 * zoom, PEER_LINK),
                        6.0 * zoom,
                        4.0 * zoom,
                    ));
                }
            }
        }

        // Capture ring around the candidate drop target while dragging.
        if let (Some(drag), Some(pos)) = (&self.drag, pointer_world) {
            if let (Some(_), Some(owner)) = (drag.attachment_kind(), drag.owner.as_deref()) {
                if let Some(target) = shared.layout.drop_target(pos, owner) {
                    if let Some(target_pos) = shared.layout.position(target.id) {
                        painter.circle_stroke(
                            to_screen(target_pos),
                            CAPTURE_RADIUS * zoom,
                            Stroke::new(2.0 * zoom, CAPTURE_RING),
                        );
                    }
                }
            }
        }

        // Processing nodes first so attachments paint on top of them.
        for entity in graph
            .processing()
            .chain(graph.entities.iter().filter(|e| e.kind != RenderKind::Processing))
        {
            let Some(pos) = shared.layout.position(entity.id) else {
                continue;
            };
            let center = to_screen(pos);
            let radius = entity_radius(entity.kind) * zoom;
            let selected = selection_matches(shared.selection, entity);

            let fill = match entity.kind {
                RenderKind::Processing => PROCESSING_FILL,
                RenderKind::Sink => SINK_FILL,
                RenderKind::Source if entity.dangling => WARNING_FILL,
                RenderKind::Source => colors
                    .get(&entity.label)
                    .copied()
                    .unwrap_or(Color32::from_gray(120)),
            };
            painter.circle_filled(center, radius, fill);
            if entity.dangling {
                draw_warning_stripes(&painter, center, radius, zoom);
            }

            let stroke = if selected {
                Stroke::new(2.5 * zoom, Color32::WHITE)
            } else if entity.dangling {
                Stroke::new(2.0 * zoom, WARNING_BORDER)
            } else {
                Stroke::new(1.0 * zoom, Color32::from_gray(70))
            };
            painter.circle_stroke(center, radius, stroke);

            match entity.kind {
                RenderKind::Processing => {
                    painter.text(
                        center,
                        Align2::CENTER_CENTER,
                        &entity.label,
                        FontId::proportional(12.0 * zoom),
                        Color32::WHITE,
                    );
                }
                _ => {
                    painter.text(
                        center + Vec2::new(0.0, radius + 3.0 * zoom),
                        Align2::CENTER_TOP,
                        &entity.label,
                        FontId::proportional(10.0 * zoom),
                        LABEL_COLOR,
                    );
                }
            }
        }

        actions
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Whether the current selection refers to this render entity.
fn selection_matches(selection: &Selection, entity: &RenderEntity) -> bool {
    match (selection, entity.kind) {
        (Selection::Processing { connection }, RenderKind::Processing) => {
            *connection == entity.label
        }
        (Selection::Source { owner, name, index }, RenderKind::Source)
        | (Selection::Sink { owner, name, index }, RenderKind::Sink) => {
            entity.owner_connection.as_deref() == Some(owner.as_str())
                && *name == entity.label
                && *index == entity.owner_index
        }
        _ => false,
    }
}

/// Stripe pattern over a dangling source, clipped to its circle.
fn draw_warning_stripes(painter: &egui::Painter, center: Pos2, radius: f32, zoom: f32) {
    let stroke = Stroke::new(1.5 * zoom, WARNING_BORDER.gamma_multiply(0.55));
    for i in -2i32..=2 {
        let offset = i as f32 * radius * 0.4;
        let half = (radius * radius - offset * offset).max(0.0).sqrt();
        painter.line_segment(
            [
                center + Vec2::new(-half, offset),
                center + Vec2::new(half, offset),
            ],
            stroke,
        );
    }
}

/// Line with an arrowhead, shortened so the head sits on the target's rim.
fn draw_arrow(
    painter: &egui::Painter,
    from: Pos2,
    to: Pos2,
    target_radius: f32,
    zoom: f32,
    color: Color32,
) {
    let delta = to - from;
    let length = delta.length();
    if length < f32::EPSILON {
        return;
    }
    let dir = delta / length;
    let tip = to - dir * target_radius;
    painter.line_segment([from, tip], Stroke::new(1.5 * zoom, color));

    let head = 7.0 * zoom;
    let normal = Vec2::new(-dir.y, dir.x);
    painter.add(egui::Shape::convex_polygon(
        vec![
            tip,
            tip - dir * head + normal * head * 0.5,
            tip - dir * head - normal * head * 0.5,
        ],
        color,
        Stroke::NONE,
    ));
}
