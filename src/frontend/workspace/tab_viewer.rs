//! TabViewer implementation for the workspace
//!
//! Dispatches rendering to individual pane states via the `Pane` trait.

use std::collections::HashMap;
use std::time::Instant;

use crossbeam_channel::Sender;
use egui::{Ui, WidgetText};

use crate::config::AppState;
use crate::frontend::pane_trait::Pane;
use crate::frontend::selection::Selection;
use crate::frontend::state::{AppAction, SharedState};
use crate::layout::LayoutEngine;
use crate::model::{ReassignmentRequest, Topology};
use crate::sync::EditorSync;

use super::{PaneEntry, PaneId};

/// Tab viewer that bridges egui_dock with our pane system.
///
/// Holds mutable borrows to all shared state fields so that
/// SharedState can be constructed per-frame inside ui().
pub struct WorkspaceTabViewer<'a> {
    pub topology: &'a mut Topology,
    pub selection: &'a mut Selection,
    pub layout: &'a mut LayoutEngine,
    pub sync: &'a mut EditorSync,
    pub app_state: &'a mut AppState,
    pub last_error: &'a mut Option<String>,
    pub reassign_tx: &'a Sender<ReassignmentRequest>,
    pub now: Instant,
    // Workspace state
    pub pane_states: &'a mut HashMap<PaneId, Box<dyn Pane>>,
    pub pane_entries: &'a HashMap<PaneId, PaneEntry>,
    pub actions: Vec<AppAction>,
}

impl egui_dock::TabViewer for WorkspaceTabViewer<'_> {
    type Tab = PaneId;

    fn title(&mut self, tab: &mut PaneId) -> WidgetText {
        self.pane_entries
            .get(tab)
            .map(|e| WidgetText::from(&e.title))
            .unwrap_or_else(|| WidgetText::from("Unknown"))
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut PaneId) {
        let Some(state) = self.pane_states.get_mut(tab) else {
            ui.label("Pane state not found");
            return;
        };

        // Construct SharedState from individual borrows
        let mut shared = SharedState {
            topology: self.topology,
            selection: self.selection,
            layout: self.layout,
            sync: self.sync,
            app_state: self.app_state,
            last_error: self.last_error,
            reassign_tx: self.reassign_tx,
            now: self.now,
        };

        let pane_actions = state.render(&mut shared, ui);
        self.actions.extend(pane_actions);
    }

    fn on_close(&mut self, tab: &mut PaneId) -> egui_dock::widgets::tab_viewer::OnCloseResponse {
        // Allow closing; cleanup happens in the main app
        self.actions.push(AppAction::ClosePane(*tab));
        egui_dock::widgets::tab_viewer::OnCloseResponse::Close
    }

    fn closeable(&mut self, _tab: &mut PaneId) -> bool {
        true
    }
}
