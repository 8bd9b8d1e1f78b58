//! Inspector pane — detail editor for the current selection.
//!
//! Scalar fields are edited in place on the model (reported with
//! [`AppAction::ModelEdited`] so projections re-derive); structural
//! changes go through actions so the app can rebuild the render graph
//! and refresh the document text.

use std::any::Any;

use egui::{Color32, RichText, Ui};

use crate::frontend::pane_trait::Pane;
use crate::frontend::selection::{Resolved, Selection};
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::workspace::PaneKind;
use crate::layout::palette::WARNING_BORDER;
use crate::model::{
    LinkDirection, LogicalSchema, PhysicalSource, ProcessingNode, Sink, TypedConfig,
};

/// State for the inspector pane: draft inputs for the add-forms.
pub struct InspectorPaneState {
    new_node_connection: String,
    new_node_grpc: String,
    new_schema_name: String,
    link_target: String,
    link_downstream: bool,
    new_source_schema: String,
    new_sink_name: String,
}

impl Default for InspectorPaneState {
    fn default() -> Self {
        Self {
            new_node_connection: String::new(),
            new_node_grpc: String::new(),
            new_schema_name: String::new(),
            link_target: String::new(),
            link_downstream: true,
            new_source_schema: String::new(),
            new_sink_name: String::new(),
        }
    }
}

impl Pane for InspectorPaneState {
    fn kind(&self) -> PaneKind {
        PaneKind::Inspector
    }

    fn render(&mut self, shared: &mut SharedState, ui: &mut Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| match shared.selection.clone() {
                Selection::None => self.render_overview(shared, ui, &mut actions),
                Selection::Processing { connection } => {
                    self.render_node(shared, ui, &mut actions, &connection)
                }
                Selection::Source { owner, .. } => {
                    self.render_source(shared, ui, &mut actions, &owner)
                }
                Selection::Sink { owner, .. } => {
                    self.render_sink(shared, ui, &mut actions, &owner)
                }
            });

        actions
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl InspectorPaneState {
    fn render_overview(
        &mut self,
        shared: &mut SharedState,
        ui: &mut Ui,
        actions: &mut Vec<AppAction>,
    ) {
        ui.heading("Topology Overview");
        ui.label(format!(
            "{} processing nodes, {} sources, {} sinks, {} schemas",
            shared.topology.nodes.len(),
            shared.topology.total_sources(),
            shared.topology.total_sinks(),
            shared.topology.schemas().len(),
        ));
        ui.separator();

        ui.strong("Processing nodes");
        for node in &shared.topology.nodes {
            ui.horizontal(|ui| {
                if ui.link(&node.connection).clicked() {
                    actions.push(AppAction::Select(Selection::Processing {
                        connection: node.connection.clone(),
                    }));
                }
                ui.weak(format!(
                    "{} sources, {} sinks",
                    node.sources().len(),
                    node.sink_list().len()
                ));
            });
        }
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.new_node_connection)
                    .hint_text("connection host:port")
                    .desired_width(140.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut self.new_node_grpc)
                    .hint_text("grpc host:port")
                    .desired_width(140.0),
            );
            if ui.button("Add Node").clicked() && !self.new_node_connection.is_empty() {
                let mut node = ProcessingNode::new(
                    self.new_node_connection.trim(),
                    self.new_node_grpc.trim(),
                    8,
                );
                if node.grpc.is_empty() {
                    node.grpc = node.connection.clone();
                }
                actions.push(AppAction::AddNode(node));
                self.new_node_connection.clear();
                self.new_node_grpc.clear();
            }
        });
        ui.separator();

        ui.strong("Logical schemas");
        for schema in shared.topology.schemas() {
            ui.horizontal(|ui| {
                ui.label(&schema.name);
                ui.weak(format!("{} fields", schema.schema.len()));
                if ui.small_button("✖").clicked() {
                    actions.push(AppAction::RemoveSchema(schema.name.clone()));
                }
            });
        }
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.new_schema_name)
                    .hint_text("schema name")
                    .desired_width(140.0),
            );
            if ui.button("Add Schema").clicked() && !self.new_schema_name.is_empty() {
                actions.push(AppAction::AddSchema(LogicalSchema {
                    name: self.new_schema_name.trim().to_string(),
                    schema: Vec::new(),
                }));
                self.new_schema_name.clear();
            }
        });
    }

    fn render_node(
        &mut self,
        shared: &mut SharedState,
        ui: &mut Ui,
        actions: &mut Vec<AppAction>,
        connection: &str,
    ) {
        let peers: Vec<String> = shared
            .topology
            .nodes
            .iter()
            .map(|n| n.connection.clone())
            .filter(|c| c != connection)
            .collect();

        let Some(node) = shared.topology.node_mut(connection) else {
            ui.label("Selection no longer resolves.");
            return;
        };

        ui.heading(connection);
        let mut edited = false;
        egui::Grid::new("node-fields").num_columns(2).show(ui, |ui| {
            ui.label("gRPC");
            edited |= ui.text_edit_singleline(&mut node.grpc).changed();
            ui.end_row();
            ui.label("Capacity");
            edited |= ui
                .add(egui::DragValue::new(&mut node.capacity).range(1..=65536))
                .changed();
            ui.end_row();
        });
        if edited {
            actions.push(AppAction::ModelEdited);
        }
        ui.separator();

        for direction in [LinkDirection::Downstream, LinkDirection::Upstream] {
            ui.strong(format!("{}s", direction.noun()));
            for peer in node.peer_list(direction).clone() {
                ui.horizontal(|ui| {
                    ui.label(&peer);
                    if ui.small_button("✖").clicked() {
                        actions.push(AppAction::RemoveLink {
                            source: connection.to_string(),
                            target: peer.clone(),
                            direction,
                        });
                    }
                });
            }
        }
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("link-target")
                .selected_text(if self.link_target.is_empty() {
                    "peer…"
                } else {
                    self.link_target.as_str()
                })
                .show_ui(ui, |ui| {
                    for peer in &peers {
                        ui.selectable_value(&mut self.link_target, peer.clone(), peer);
                    }
                });
            ui.checkbox(&mut self.link_downstream, "downstream");
            if ui.button("Add Link").clicked() && !self.link_target.is_empty() {
                actions.push(AppAction::AddLink {
                    source: connection.to_string(),
                    target: self.link_target.clone(),
                    direction: if self.link_downstream {
                        LinkDirection::Downstream
                    } else {
                        LinkDirection::Upstream
                    },
                });
            }
        });
        ui.separator();

        ui.strong("Sources");
        for (index, source) in node.sources().iter().enumerate() {
            let logical = source.logical.clone();
            ui.horizontal(|ui| {
                if ui.link(&logical).clicked() {
                    actions.push(AppAction::Select(Selection::Source {
                        owner: connection.to_string(),
                        name: logical.clone(),
                        index,
                    }));
                }
                if ui.small_button("✖").clicked() {
                    actions.push(AppAction::RemoveSource {
                        owner: connection.to_string(),
                        index,
                    });
                }
            });
        }
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.new_source_schema)
                    .hint_text("logical schema")
                    .desired_width(120.0),
            );
            if ui.button("Add Source").clicked() && !self.new_source_schema.is_empty() {
                actions.push(AppAction::AddSource {
                    owner: connection.to_string(),
                    source: PhysicalSource {
                        logical: self.new_source_schema.trim().to_string(),
                        parser_config: TypedConfig::new("JSON"),
                        source_config: TypedConfig::new("Socket"),
                    },
                });
                self.new_source_schema.clear();
            }
        });
        ui.separator();

        ui.strong("Sinks");
        for (index, sink) in node.sink_list().iter().enumerate() {
            let name = sink.name.clone();
            ui.horizontal(|ui| {
                if ui.link(&name).clicked() {
                    actions.push(AppAction::Select(Selection::Sink {
                        owner: connection.to_string(),
                        name: name.clone(),
                        index,
                    }));
                }
                if ui.small_button("✖").clicked() {
                    actions.push(AppAction::RemoveSink {
                        owner: connection.to_string(),
                        index,
                    });
                }
            });
        }
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.new_sink_name)
                    .hint_text("sink name")
                    .desired_width(120.0),
            );
            if ui.button("Add Sink").clicked() && !self.new_sink_name.is_empty() {
                actions.push(AppAction::AddSink {
                    owner: connection.to_string(),
                    sink: Sink {
                        name: self.new_sink_name.trim().to_string(),
                        kind: "Print".to_string(),
                        config: Default::default(),
                    },
                });
                self.new_sink_name.clear();
            }
        });
        ui.separator();

        if ui
            .button(RichText::new("Remove Node").color(Color32::LIGHT_RED))
            .clicked()
        {
            actions.push(AppAction::RemoveNode(connection.to_string()));
            actions.push(AppAction::ClearSelection);
        }
    }

    fn render_source(
        &mut self,
        shared: &mut SharedState,
        ui: &mut Ui,
        actions: &mut Vec<AppAction>,
        owner: &str,
    ) {
        let at = match shared.selection.resolve(shared.topology) {
            Some(Resolved::Source { index, .. }) => index,
            _ => {
                ui.label("Selection no longer resolves.");
                return;
            }
        };
        let schema_names: Vec<String> = shared
            .topology
            .schemas()
            .iter()
            .map(|s| s.name.clone())
            .collect();

        let Some(source) = shared
            .topology
            .node_mut(owner)
            .and_then(|n| n.physical.as_mut())
            .and_then(|v| v.get_mut(at))
        else {
            ui.label("Selection no longer resolves.");
            return;
        };

        ui.heading(format!("Source: {}", source.logical));
        if ui.button("⬆ Back to owner").clicked() {
            actions.push(AppAction::SelectOwner);
        }
        ui.separator();

        let mut edited = false;
        let mut renamed = false;
        egui::Grid::new("source-fields")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Logical schema");
                renamed = ui.text_edit_singleline(&mut source.logical).changed();
                edited |= renamed;
                ui.end_row();
                ui.label("Parser type");
                edited |= ui
                    .text_edit_singleline(&mut source.parser_config.kind)
                    .changed();
                ui.end_row();
                ui.label("Source type");
                edited |= ui
                    .text_edit_singleline(&mut source.source_config.kind)
                    .changed();
                ui.end_row();
            });
        if edited {
            actions.push(AppAction::ModelEdited);
        }
        // Keep the selection tracking the entry through a rename.
        if renamed {
            actions.push(AppAction::Select(Selection::Source {
                owner: owner.to_string(),
                name: source.logical.clone(),
                index: at,
            }));
        }

        if !schema_names.iter().any(|n| *n == source.logical) {
            ui.colored_label(
                WARNING_BORDER,
                format!("Schema '{}' is not defined", source.logical),
            );
        }
        ui.weak(format!(
            "{} parser keys, {} source keys",
            source.parser_config.config.len(),
            source.source_config.config.len()
        ));
        ui.separator();

        if ui
            .button(RichText::new("Remove Source").color(Color32::LIGHT_RED))
            .clicked()
        {
            actions.push(AppAction::RemoveSource {
                owner: owner.to_string(),
                index: at,
            });
            actions.push(AppAction::ClearSelection);
        }
    }

    fn render_sink(
        &mut self,
        shared: &mut SharedState,
        ui: &mut Ui,
        actions: &mut Vec<AppAction>,
        owner: &str,
    ) {
        let at = match shared.selection.resolve(shared.topology) {
            Some(Resolved::Sink { index, .. }) => index,
            _ => {
                ui.label("Selection no longer resolves.");
                return;
            }
        };

        let Some(sink) = shared
            .topology
            .node_mut(owner)
            .and_then(|n| n.sinks.as_mut())
            .and_then(|v| v.get_mut(at))
        else {
            ui.label("Selection no longer resolves.");
            return;
        };

        ui.heading(format!("Sink: {}", sink.name));
        if ui.button("⬆ Back to owner").clicked() {
            actions.push(AppAction::SelectOwner);
        }
        ui.separator();

        let mut edited = false;
        let mut renamed = false;
        egui::Grid::new("sink-fields").num_columns(2).show(ui, |ui| {
            ui.label("Name");
            renamed = ui.text_edit_singleline(&mut sink.name).changed();
            edited |= renamed;
            ui.end_row();
            ui.label("Type");
            edited |= ui.text_edit_singleline(&mut sink.kind).changed();
            ui.end_row();
        });
        if edited {
            actions.push(AppAction::ModelEdited);
        }
        // Keep the selection tracking the entry through a rename.
        if renamed {
            actions.push(AppAction::Select(Selection::Sink {
                owner: owner.to_string(),
                name: sink.name.clone(),
                index: at,
            }));
        }
        ui.weak(format!("{} config keys", sink.config.len()));
        ui.separator();

        if ui
            .button(RichText::new("Remove Sink").color(Color32::LIGHT_RED))
            .clicked()
        {
            actions.push(AppAction::RemoveSink {
                owner: owner.to_string(),
                index: at,
            });
            actions.push(AppAction::ClearSelection);
        }
    }
}
