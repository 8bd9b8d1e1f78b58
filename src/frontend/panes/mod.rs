//! Individual pane implementations.

pub mod canvas;
pub mod document;
pub mod inspector;

pub use canvas::CanvasPaneState;
pub use document::DocumentPaneState;
pub use inspector::InspectorPaneState;
