//! Configuration and persistent application state.
//!
//! Stores user preferences and history that persist across sessions:
//! recently opened topology documents, the last session's document, and
//! UI preferences. State lives in a JSON file under the platform data
//! directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{Result, TopoVisError};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.topovis.topovis-rs";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Topology document file extension
pub const DOCUMENT_FILE_EXTENSION: &str = "yaml";

/// Maximum number of recent documents to remember
pub const MAX_RECENT_DOCUMENTS: usize = 10;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        TopoVisError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            TopoVisError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

// ==================== Recent Document Entry ====================

/// Information about a recently opened topology document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentDocument {
    /// Path to the document file
    pub path: PathBuf,

    /// Display name (the file stem)
    pub name: String,

    /// Last opened timestamp (Unix seconds)
    pub last_opened: u64,
}

impl RecentDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            path,
            name,
            last_opened: now,
        }
    }

    /// Check if the document file still exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

// ==================== App State ====================

/// Persistent application state
///
/// User preferences and history that persist across sessions, separate
/// from individual topology documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Recently opened documents
    #[serde(default)]
    pub recent_documents: Vec<RecentDocument>,

    /// Path to the last opened document (for session restore)
    #[serde(default)]
    pub last_document_path: Option<PathBuf>,

    /// UI preferences that persist across documents
    #[serde(default)]
    pub ui_preferences: UiPreferences,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            recent_documents: Vec::new(),
            last_document_path: None,
            ui_preferences: UiPreferences::default(),
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            TopoVisError::Config("Could not determine app state path".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| TopoVisError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| TopoVisError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        let path = dir.join(APP_STATE_FILE);

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TopoVisError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(&path, content)
            .map_err(|e| TopoVisError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Add or update a recent document
    pub fn add_recent_document(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();

        self.recent_documents.retain(|d| d.path != path);
        self.recent_documents.insert(0, RecentDocument::new(path.clone()));
        self.recent_documents.truncate(MAX_RECENT_DOCUMENTS);

        self.last_document_path = Some(path);
    }

    /// Remove a document from recents (e.g., if the file was deleted)
    pub fn remove_recent_document(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.recent_documents.retain(|d| d.path != path);

        if self.last_document_path.as_deref() == Some(path) {
            self.last_document_path = None;
        }
    }

    /// Clean up recent documents that no longer exist
    pub fn cleanup_missing_documents(&mut self) {
        self.recent_documents.retain(|d| d.exists());

        if let Some(ref last) = self.last_document_path {
            if !last.exists() {
                self.last_document_path = None;
            }
        }
    }

    /// Get the most recent document path if it still exists
    pub fn get_last_document(&self) -> Option<&Path> {
        self.last_document_path
            .as_deref()
            .filter(|p| p.exists())
    }
}

/// UI preferences that persist across all documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Enable dark mode
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_empty() {
        let state = AppState::default();
        assert!(state.recent_documents.is_empty());
        assert!(state.last_document_path.is_none());
    }

    #[test]
    fn test_add_recent_document_dedupes_and_fronts() {
        let mut state = AppState::default();
        state.add_recent_document("/tmp/a.yaml");
        state.add_recent_document("/tmp/b.yaml");
        assert_eq!(state.recent_documents.len(), 2);
        assert_eq!(state.recent_documents[0].name, "b");

        state.add_recent_document("/tmp/a.yaml");
        assert_eq!(state.recent_documents.len(), 2);
        assert_eq!(state.recent_documents[0].name, "a");
        assert_eq!(
            state.last_document_path.as_deref(),
            Some(Path::new("/tmp/a.yaml"))
        );
    }

    #[test]
    fn test_recent_documents_truncate_at_max() {
        let mut state = AppState::default();
        for i in 0..15 {
            state.add_recent_document(format!("/tmp/doc{}.yaml", i));
        }
        assert_eq!(state.recent_documents.len(), MAX_RECENT_DOCUMENTS);
        assert_eq!(state.recent_documents[0].name, "doc14");
    }

    #[test]
    fn test_remove_recent_clears_last_path() {
        let mut state = AppState::default();
        state.add_recent_document("/tmp/a.yaml");
        state.remove_recent_document("/tmp/a.yaml");
        assert!(state.recent_documents.is_empty());
        assert!(state.last_document_path.is_none());
    }

    #[test]
    fn test_state_roundtrips_through_json() {
        let mut state = AppState::default();
        state.add_recent_document("/tmp/pipeline.yaml");
        let json = serde_json::to_string(&state).unwrap();
        let back: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.recent_documents.len(), 1);
        assert_eq!(back.recent_documents[0].name, "pipeline");
    }
}
