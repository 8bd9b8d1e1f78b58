//! Topology Visualizer - Main Entry Point
//!
//! Interactive editing of distributed data-pipeline topology documents:
//! a force-directed canvas, a synchronized text editor, and an inspector
//! over the same entity model.

use std::path::PathBuf;

use topovis_rs::{
    config::AppState,
    frontend::TopoVisApp,
    model::{self, sample_topology, Topology},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,topovis_rs=trace")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Topology Visualizer");

    // Load application state (recent documents, preferences, etc.)
    let mut app_state = AppState::load_or_default();
    app_state.cleanup_missing_documents();

    // Document from the command line, else the last session, else the
    // built-in sample.
    let requested: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);
    let (topology, document_path) = match requested
        .or_else(|| app_state.get_last_document().map(|p| p.to_path_buf()))
    {
        Some(path) => match model::load_document(&path) {
            Ok(topology) => {
                tracing::info!("Restoring document {:?}", path);
                app_state.add_recent_document(&path);
                (topology, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load document {:?}: {}", path, e);
                (Topology::default(), None)
            }
        },
        None => (sample_topology(), None),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Topology Visualizer"),
        ..Default::default()
    };

    eframe::run_native(
        "Topology Visualizer",
        native_options,
        Box::new(move |cc| {
            let app = TopoVisApp::new(cc, topology, app_state, document_path)?;
            Ok(Box::new(app))
        }),
    )
}
