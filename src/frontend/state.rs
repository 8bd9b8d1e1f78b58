//! Shared state types for the frontend
//!
//! This module defines the shared state container and action types used by
//! the workspace-based architecture. Panes receive `SharedState` via
//! borrowing and return `AppAction`s instead of mutating state directly.

use std::path::PathBuf;
use std::time::Instant;

use crossbeam_channel::Sender;

use crate::config::AppState;
use crate::frontend::selection::Selection;
use crate::layout::LayoutEngine;
use crate::model::{
    LinkDirection, LogicalSchema, PhysicalSource, ProcessingNode, ReassignmentRequest, Sink,
    Topology,
};
use crate::sync::EditorSync;

use super::workspace::{PaneId, PaneKind};

/// Shared state accessible by all panes (borrowed, not owned).
///
/// The topology is handed out mutably for in-place scalar edits; panes
/// performing structural mutations go through `AppAction`s so the app
/// can rebuild the render graph and refresh the document text. Panes
/// that edit scalars in place report it with [`AppAction::ModelEdited`].
pub struct SharedState<'a> {
    pub topology: &'a mut Topology,
    pub selection: &'a mut Selection,
    pub layout: &'a mut LayoutEngine,
    pub sync: &'a mut EditorSync,
    pub app_state: &'a mut AppState,
    pub last_error: &'a mut Option<String>,

    /// Typed command channel from the canvas drag layer to the model
    /// owner; reassignment requests are applied in the app loop.
    pub reassign_tx: &'a Sender<ReassignmentRequest>,

    /// Frame timestamp, shared so debounce arithmetic is consistent.
    pub now: Instant,
}

/// Actions that any pane can emit
///
/// Panes return `Vec<AppAction>` instead of mutating state directly.
/// This enables:
/// - Testable pane logic
/// - Clear separation between UI and business logic
/// - Centralized action handling
#[derive(Debug, Clone)]
pub enum AppAction {
    // Model structure
    /// Add a processing node
    AddNode(ProcessingNode),
    /// Remove a processing node and scrub links referencing it
    RemoveNode(String),
    /// Add a peer link to a node's downstream/upstream list
    AddLink {
        source: String,
        target: String,
        direction: LinkDirection,
    },
    /// Remove a peer link
    RemoveLink {
        source: String,
        target: String,
        direction: LinkDirection,
    },
    /// Append a physical source to a node
    AddSource { owner: String, source: PhysicalSource },
    /// Remove a physical source by position
    RemoveSource { owner: String, index: usize },
    /// Append a sink to a node
    AddSink { owner: String, sink: Sink },
    /// Remove a sink by position
    RemoveSink { owner: String, index: usize },
    /// Add a logical schema
    AddSchema(LogicalSchema),
    /// Remove a logical schema by name
    RemoveSchema(String),
    /// Scalar fields were edited in place; re-derive projections
    ModelEdited,

    // Selection
    /// Replace the current selection
    Select(Selection),
    /// Clear the current selection
    ClearSelection,
    /// Navigate from a source/sink selection to its owner
    SelectOwner,

    // Document
    /// A validated topology parsed from the editor text
    CommitTopology(Topology),
    /// Validate the editor text immediately, bypassing the debounce
    ImportNow,
    /// Serialize the model and offer it as a downloadable file
    ExportDocument,
    /// Discard unparsable text and restore the last valid text
    ResetEditor,
    /// Load a document from disk, replacing the model
    OpenDocument(PathBuf),
    /// Save the current document to its path, or prompt for one
    SaveDocument,
    /// Prompt for a path and save the current document
    SaveDocumentAs,

    // Workspace actions
    /// Open/focus a singleton pane, or create if not exists
    OpenPane(PaneKind),
    /// Close a pane (remove from dock and clean up state)
    ClosePane(PaneId),
}
