//! Document pane — text editor over the serialized topology.
//!
//! The text buffer is owned by [`EditorSync`](crate::sync::EditorSync);
//! this pane renders it, records keystrokes for the debounce, and
//! surfaces the validation state. Validation itself runs in the app
//! loop so a pending debounce still fires while the pane is hidden.

use std::any::Any;

use egui::{Color32, RichText, Ui};

use crate::frontend::pane_trait::Pane;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::workspace::PaneKind;
use crate::sync::SyncState;

const STATUS_CLEAN: Color32 = Color32::from_rgb(0x6f, 0xc2, 0x76);
const STATUS_PENDING: Color32 = Color32::from_rgb(0xe0, 0xc0, 0x50);
const STATUS_INVALID: Color32 = Color32::from_rgb(0xe8, 0x4a, 0x3c);

#[derive(Default)]
pub struct DocumentPaneState;

impl Pane for DocumentPaneState {
    fn kind(&self) -> PaneKind {
        PaneKind::Document
    }

    fn render(&mut self, shared: &mut SharedState, ui: &mut Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();
        let now = shared.now;

        ui.horizontal(|ui| {
            match shared.sync.state() {
                SyncState::Clean => {
                    ui.label(RichText::new("Synchronized").color(STATUS_CLEAN));
                }
                SyncState::DirtyTyping { deadline } => {
                    let remaining = deadline.saturating_duration_since(now);
                    ui.label(
                        RichText::new(format!("Validating in {:.1}s", remaining.as_secs_f32()))
                            .color(STATUS_PENDING),
                    );
                }
                SyncState::Invalid { .. } => {
                    ui.label(RichText::new("Invalid document").color(STATUS_INVALID));
                }
            }
            ui.separator();
            if ui.button("Import Now").clicked() {
                actions.push(AppAction::ImportNow);
            }
            if ui.button("Export").clicked() {
                actions.push(AppAction::ExportDocument);
            }
            if matches!(shared.sync.state(), SyncState::Invalid { .. })
                && ui.button("Reset").clicked()
            {
                actions.push(AppAction::ResetEditor);
            }
        });

        if let SyncState::Invalid { error } = shared.sync.state() {
            ui.colored_label(STATUS_INVALID, error);
        }
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let response = ui.add(
                    egui::TextEdit::multiline(shared.sync.buffer_mut())
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(24),
                );
                if response.changed() {
                    shared.sync.mark_edited(now);
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
