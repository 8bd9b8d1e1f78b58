//! Status bar panel — bottom bar showing document, model, and sync info.
//!
//! Sits below the dock workspace area.

use std::path::Path;

use egui::{Color32, RichText, Ui};

use crate::model::Topology;
use crate::sync::SyncState;

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub topology: &'a Topology,
    pub sync_state: &'a SyncState,
    pub document_path: Option<&'a Path>,
    pub last_error: Option<&'a str>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        // === Document name ===
        let doc = ctx
            .document_path
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());
        ui.label(RichText::new(doc).small());

        ui.separator();

        // === Sync state dot ===
        let (sync_color, sync_text) = match ctx.sync_state {
            SyncState::Clean => (Color32::GREEN, "Synced"),
            SyncState::DirtyTyping { .. } => (Color32::YELLOW, "Editing"),
            SyncState::Invalid { .. } => (Color32::RED, "Invalid"),
        };
        ui.colored_label(sync_color, "●");
        ui.label(RichText::new(sync_text).small());

        ui.separator();

        // === Model counts ===
        ui.label(
            RichText::new(format!(
                "Nodes: {}  Sources: {}  Sinks: {}  Schemas: {}",
                ctx.topology.nodes.len(),
                ctx.topology.total_sources(),
                ctx.topology.total_sinks(),
                ctx.topology.schemas().len(),
            ))
            .small(),
        );

        // === Error message (right-aligned) ===
        if let Some(error) = ctx.last_error {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(Color32::RED, RichText::new(error).small());
            });
        }
    });
}
