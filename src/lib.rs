//! # TopoVis-RS: Topology Document Visualizer
//!
//! An interactive editor for distributed data-pipeline topology
//! documents. A topology is a YAML document describing processing
//! nodes, the physical sources and sinks attached to them, logical
//! schemas, and the peer links between nodes.
//!
//! ## Architecture
//!
//! - **Model**: the entity model mirrors the document shape; all
//!   structural mutation goes through it
//! - **Layout**: a force-directed layout engine over a derived render
//!   graph with stable entity identity
//! - **Sync**: debounced bidirectional synchronization between the
//!   model and its editable text form
//! - **Frontend**: eframe/egui UI with an egui_dock workspace; panes
//!   communicate through actions and a typed reassignment channel
//!
//! ## Configuration
//!
//! Application state (recent documents, preferences) is stored in the
//! platform-appropriate data directory under `dev.topovis.topovis-rs`:
//!
//! - **Linux**: `~/.local/share/dev.topovis.topovis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.topovis.topovis-rs/`
//! - **Windows**: `%APPDATA%\dev.topovis.topovis-rs\`

pub mod app;
pub mod config;
pub mod error;
pub mod frontend;
pub mod layout;
pub mod model;
pub mod sync;

pub use error::{Result, TopoVisError};
