//! Default workspace layout
//!
//! Builds the initial dock layout with the topology canvas as the main
//! surface and the document editor + inspector stacked on the right.

use egui_dock::{DockState, NodeIndex};

use super::{PaneKind, Workspace};

/// Build the default dock layout and return the DockState.
///
/// Layout:
/// ```text
/// ┌────────────────────────────────┬──────────────┐
/// │                                │  Document    │
/// │        Topology Canvas         ├──────────────┤
/// │                                │  Inspector   │
/// └────────────────────────────────┴──────────────┘
/// ```
pub fn build_default_layout(workspace: &mut Workspace) -> DockState<super::PaneId> {
    let canvas_id = workspace.register_pane(PaneKind::Canvas, "Topology Canvas");
    let document_id = workspace.register_pane(PaneKind::Document, "Document");
    let inspector_id = workspace.register_pane(PaneKind::Inspector, "Inspector");

    // Canvas is the main surface
    let mut dock = DockState::new(vec![canvas_id]);

    // Split right 30% for the document editor
    let [_center, right] = dock
        .main_surface_mut()
        .split_right(NodeIndex::root(), 0.7, vec![document_id]);

    // Split the right panel vertically: top = document, bottom = inspector
    dock.main_surface_mut()
        .split_below(right, 0.55, vec![inspector_id]);

    dock
}
