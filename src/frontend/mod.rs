//! Frontend module — the eframe application shell.
//!
//! [`TopoVisApp`] owns the entity model and every projection derived
//! from it: the layout engine, the editor sync, and the selection. All
//! panes render through the dock workspace and report mutations as
//! [`AppAction`]s, which are applied centrally so the render graph and
//! document text stay in step with the model. Reassignment requests
//! from canvas drags arrive over a typed channel and are applied here.

pub mod pane_registry;
pub mod pane_trait;
pub mod panes;
pub mod selection;
pub mod state;
pub mod status_bar;
pub mod workspace;

use std::path::PathBuf;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use egui::Color32;

use crate::config::{AppState, DOCUMENT_FILE_EXTENSION};
use crate::error::Result;
use crate::layout::LayoutEngine;
use crate::model::{self, ReassignmentRequest, Topology};
use crate::sync::{EditorSync, SyncState};

use selection::Selection;
use state::AppAction;
use status_bar::{render_status_bar, StatusBarContext};
use workspace::tab_viewer::WorkspaceTabViewer;
use workspace::Workspace;

/// The main application.
pub struct TopoVisApp {
    topology: Topology,
    selection: Selection,
    layout: LayoutEngine,
    sync: EditorSync,
    app_state: AppState,
    document_path: Option<PathBuf>,
    last_error: Option<String>,
    workspace: Workspace,
    reassign_tx: Sender<ReassignmentRequest>,
    reassign_rx: Receiver<ReassignmentRequest>,
}

impl TopoVisApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        topology: Topology,
        app_state: AppState,
        document_path: Option<PathBuf>,
    ) -> Result<Self> {
        if app_state.ui_preferences.dark_mode {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        }

        let sync = EditorSync::new(&topology)?;
        let layout = LayoutEngine::new(&topology);
        let (reassign_tx, reassign_rx) = crossbeam_channel::unbounded();

        let mut workspace = Workspace::new();
        workspace.dock_state = workspace::default_layout::build_default_layout(&mut workspace);

        Ok(Self {
            topology,
            selection: Selection::default(),
            layout,
            sync,
            app_state,
            document_path,
            last_error: None,
            workspace,
            reassign_tx,
            reassign_rx,
        })
    }

    /// Re-derive the projections after a structural model change: the
    /// render graph rebuilds and the document text refreshes (or defers
    /// while the editor holds unsaved edits).
    fn refresh_projections(&mut self) {
        self.layout.rebuild(&self.topology);
        if let Err(e) = self.sync.on_model_changed(&self.topology) {
            self.last_error = Some(format!("Failed to refresh document: {}", e));
        }
    }

    /// Apply queued reassignment requests from the canvas drag layer.
    fn process_reassignments(&mut self) {
        let requests: Vec<ReassignmentRequest> = self.reassign_rx.try_iter().collect();
        for request in requests {
            if self.topology.reassign(&request) {
                tracing::info!(
                    "moved {} {} from '{}' to '{}'",
                    request.kind.noun(),
                    request.index,
                    request.source_owner,
                    request.target_owner
                );
                self.selection.clear();
                self.refresh_projections();
            } else {
                // Stale request (model changed mid-drag): dropped silently.
                tracing::debug!(
                    "ignoring stale reassignment of {} {} from '{}'",
                    request.kind.noun(),
                    request.index,
                    request.source_owner
                );
            }
        }
    }

    fn open_document(&mut self, path: PathBuf) {
        match model::load_document(&path) {
            Ok(topology) => {
                tracing::info!("opened document {:?}", path);
                self.topology = topology;
                self.selection.clear();
                self.layout = LayoutEngine::new(&self.topology);
                match EditorSync::new(&self.topology) {
                    Ok(sync) => self.sync = sync,
                    Err(e) => {
                        self.last_error = Some(format!("Failed to render document: {}", e))
                    }
                }
                self.app_state.add_recent_document(&path);
                self.document_path = Some(path);
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to open document: {}", e));
            }
        }
    }

    fn save_document_to(&mut self, path: PathBuf) {
        match model::save_document(&path, &self.topology) {
            Ok(()) => {
                tracing::info!("saved document {:?}", path);
                self.app_state.add_recent_document(&path);
                self.document_path = Some(path);
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to save document: {}", e));
            }
        }
    }

    fn prompt_save_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Save Topology Document")
            .add_filter("Topology Document", &[DOCUMENT_FILE_EXTENSION, "yml"])
            .save_file()
        {
            self.save_document_to(path);
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::AddNode(node) => match self.topology.add_node(node) {
                Ok(()) => self.refresh_projections(),
                Err(e) => self.last_error = Some(e.to_string()),
            },
            AppAction::RemoveNode(connection) => {
                match self.topology.remove_node(&connection) {
                    Ok(()) => self.refresh_projections(),
                    Err(e) => self.last_error = Some(e.to_string()),
                }
            }
            AppAction::AddLink {
                source,
                target,
                direction,
            } => match self.topology.add_link(&source, &target, direction) {
                Ok(()) => self.refresh_projections(),
                Err(e) => self.last_error = Some(e.to_string()),
            },
            AppAction::RemoveLink {
                source,
                target,
                direction,
            } => match self.topology.remove_link(&source, &target, direction) {
                Ok(()) => self.refresh_projections(),
                Err(e) => self.last_error = Some(e.to_string()),
            },
            AppAction::AddSource { owner, source } => {
                self.topology.add_source(&owner, source);
                self.refresh_projections();
            }
            AppAction::RemoveSource { owner, index } => {
                match self.topology.remove_source(&owner, index) {
                    Ok(_) => self.refresh_projections(),
                    Err(e) => self.last_error = Some(e.to_string()),
                }
            }
            AppAction::AddSink { owner, sink } => {
                self.topology.add_sink(&owner, sink);
                self.refresh_projections();
            }
            AppAction::RemoveSink { owner, index } => {
                match self.topology.remove_sink(&owner, index) {
                    Ok(_) => self.refresh_projections(),
                    Err(e) => self.last_error = Some(e.to_string()),
                }
            }
            AppAction::AddSchema(schema) => match self.topology.add_schema(schema) {
                Ok(()) => self.refresh_projections(),
                Err(e) => self.last_error = Some(e.to_string()),
            },
            AppAction::RemoveSchema(name) => match self.topology.remove_schema(&name) {
                Ok(()) => self.refresh_projections(),
                Err(e) => self.last_error = Some(e.to_string()),
            },
            AppAction::ModelEdited => self.refresh_projections(),

            AppAction::Select(selection) => self.selection = selection,
            AppAction::ClearSelection => self.selection.clear(),
            AppAction::SelectOwner => self.selection.select_owner(),

            AppAction::CommitTopology(topology) => {
                // The editor text is the source here; only the layout
                // re-derives, the buffer stays exactly as typed.
                self.topology = topology;
                self.layout.rebuild(&self.topology);
            }
            AppAction::ImportNow => {
                if let Some(topology) = self.sync.import_now() {
                    self.topology = topology;
                    self.layout.rebuild(&self.topology);
                }
            }
            AppAction::ExportDocument => match self.sync.export(&self.topology) {
                Ok(text) => {
                    if let Some(path) = rfd::FileDialog::new()
                        .set_title("Export Topology Document")
                        .add_filter("Topology Document", &[DOCUMENT_FILE_EXTENSION, "yml"])
                        .save_file()
                    {
                        if let Err(e) = std::fs::write(&path, text) {
                            self.last_error =
                                Some(format!("Failed to export document: {}", e));
                        } else {
                            tracing::info!("exported document {:?}", path);
                        }
                    }
                }
                Err(e) => {
                    self.last_error = Some(format!("Failed to export document: {}", e));
                }
            },
            AppAction::ResetEditor => self.sync.reset(),
            AppAction::OpenDocument(path) => self.open_document(path),
            AppAction::SaveDocument => match self.document_path.clone() {
                Some(path) => self.save_document_to(path),
                None => self.prompt_save_as(),
            },
            AppAction::SaveDocumentAs => self.prompt_save_as(),

            AppAction::OpenPane(kind) => {
                if self.workspace.is_singleton(kind) {
                    if let Some(id) = self.workspace.find_singleton(kind) {
                        // Focus existing singleton
                        if let Some(tab_location) = self.workspace.dock_state.find_tab(&id) {
                            self.workspace.dock_state.set_active_tab(tab_location);
                        }
                        return;
                    }
                }
                let name = self.workspace.display_name(kind);
                let id = self.workspace.register_pane(kind, name);
                self.workspace.dock_state.push_to_first_leaf(id);
            }
            AppAction::ClosePane(id) => {
                self.workspace.remove_pane(id);
            }
        }
    }

    /// Blocking notification for structural errors; dismissed with OK.
    fn render_error_window(&mut self, ctx: &egui::Context) {
        let Some(error) = self.last_error.clone() else {
            return;
        };
        let mut open = true;
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.colored_label(Color32::LIGHT_RED, &error);
                ui.separator();
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if !open || dismissed {
            self.last_error = None;
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New").clicked() {
                        self.topology = Topology::default();
                        self.selection.clear();
                        self.document_path = None;
                        self.layout = LayoutEngine::new(&self.topology);
                        match EditorSync::new(&self.topology) {
                            Ok(sync) => self.sync = sync,
                            Err(e) => self.last_error = Some(e.to_string()),
                        }
                        ui.close();
                    }
                    if ui.button("Open...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .set_title("Open Topology Document")
                            .add_filter("Topology Document", &[DOCUMENT_FILE_EXTENSION, "yml"])
                            .pick_file()
                        {
                            self.handle_action(AppAction::OpenDocument(path));
                        }
                        ui.close();
                    }
                    let recents: Vec<PathBuf> = self
                        .app_state
                        .recent_documents
                        .iter()
                        .map(|d| d.path.clone())
                        .collect();
                    ui.menu_button("Open Recent", |ui| {
                        if recents.is_empty() {
                            ui.weak("No recent documents");
                        }
                        for path in recents {
                            let label = path.to_string_lossy().into_owned();
                            if ui.button(label).clicked() {
                                self.handle_action(AppAction::OpenDocument(path));
                                ui.close();
                            }
                        }
                    });
                    ui.separator();
                    if ui.button("Save").clicked() {
                        self.handle_action(AppAction::SaveDocument);
                        ui.close();
                    }
                    if ui.button("Save As...").clicked() {
                        self.handle_action(AppAction::SaveDocumentAs);
                        ui.close();
                    }
                });

                ui.menu_button("View", |ui| {
                    // Singleton panes (open/focus), driven from the registry
                    let singletons: Vec<_> = self
                        .workspace
                        .registry_singletons()
                        .map(|info| (info.kind, info.display_name))
                        .collect();
                    for (kind, name) in singletons {
                        if ui.button(name).clicked() {
                            self.handle_action(AppAction::OpenPane(kind));
                            ui.close();
                        }
                    }
                });

                // Right-aligned: sync state
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.sync.state() {
                        SyncState::Clean => {
                            ui.colored_label(Color32::GREEN, "Synced");
                        }
                        SyncState::DirtyTyping { .. } => {
                            ui.colored_label(Color32::YELLOW, "Editing...");
                        }
                        SyncState::Invalid { .. } => {
                            ui.colored_label(Color32::RED, "Invalid document");
                        }
                    }
                });
            });
        });
    }
}

impl eframe::App for TopoVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.process_reassignments();

        // Debounced validation fires here so a pending deadline is
        // honored even while the document pane is hidden.
        if let Some(topology) = self.sync.tick(now) {
            self.handle_action(AppAction::CommitTopology(topology));
        }
        if let SyncState::DirtyTyping { deadline } = *self.sync.state() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        // Replay an external refresh that was deferred while dirty.
        if self.sync.take_deferred_refresh() {
            if let Err(e) = self.sync.on_model_changed(&self.topology) {
                self.last_error = Some(format!("Failed to refresh document: {}", e));
            }
        }

        self.render_menu_bar(ctx);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            render_status_bar(
                ui,
                &StatusBarContext {
                    topology: &self.topology,
                    sync_state: self.sync.state(),
                    document_path: self.document_path.as_deref(),
                    last_error: self.last_error.as_deref(),
                },
            );
        });

        // Dock workspace
        let actions = {
            let mut viewer = WorkspaceTabViewer {
                topology: &mut self.topology,
                selection: &mut self.selection,
                layout: &mut self.layout,
                sync: &mut self.sync,
                app_state: &mut self.app_state,
                last_error: &mut self.last_error,
                reassign_tx: &self.reassign_tx,
                now,
                pane_states: &mut self.workspace.pane_states,
                pane_entries: &self.workspace.pane_entries,
                actions: Vec::new(),
            };

            egui_dock::DockArea::new(&mut self.workspace.dock_state)
                .style(egui_dock::Style::from_egui(ctx.style().as_ref()))
                .show(ctx, &mut viewer);

            viewer.actions
        };

        for action in actions {
            self.handle_action(action);
        }

        self.render_error_window(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }
}
