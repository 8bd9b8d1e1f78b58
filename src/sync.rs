//! Bidirectional synchronization between the entity model and its
//! document text.
//!
//! [`EditorSync`] owns the editor text buffer and a small state machine:
//!
//! - `Clean` — text matches the last committed model.
//! - `DirtyTyping` — the user has edited the text; a single debounce
//!   deadline is re-armed on every keystroke and only the most recent
//!   one fires.
//! - `Invalid` — the last validation failed; the model was left
//!   untouched and the error is held for display until the user fixes
//!   the text or resets to the last known-valid text.
//!
//! The model is never updated from unparsable text, and the text buffer
//! is never silently overwritten while the user has unsaved edits:
//! external model changes arriving in a non-`Clean` state are deferred
//! and replayed once the editor returns to `Clean`.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::model::{parse_document, serialize_document, Topology};

/// Debounce window between the last keystroke and validation.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

/// Editor synchronization state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// Text matches the committed model.
    Clean,
    /// User is typing; validation fires at `deadline` unless re-armed.
    DirtyTyping { deadline: Instant },
    /// Last validation failed; the error is user-visible.
    Invalid { error: String },
}

/// The editor text buffer plus its synchronization state machine.
pub struct EditorSync {
    text: String,
    last_valid_text: String,
    state: SyncState,
    /// An external model change arrived while the editor was not clean.
    deferred_refresh: bool,
}

impl EditorSync {
    /// Create a sync whose buffer holds the serialized form of `topology`.
    pub fn new(topology: &Topology) -> Result<Self> {
        let text = serialize_document(topology)?;
        Ok(Self {
            last_valid_text: text.clone(),
            text,
            state: SyncState::Clean,
            deferred_refresh: false,
        })
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn is_clean(&self) -> bool {
        self.state == SyncState::Clean
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for the text widget. Callers must follow up with
    /// [`EditorSync::mark_edited`] when the widget reports a change.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Record a keystroke: re-arm the debounce deadline, cancelling any
    /// previously pending one.
    pub fn mark_edited(&mut self, now: Instant) {
        self.state = SyncState::DirtyTyping {
            deadline: now + DEBOUNCE_WINDOW,
        };
    }

    /// Advance the debounce timer. Returns the parsed topology when a
    /// deadline fires and the text validates; on failure the state moves
    /// to `Invalid` and the model must not be touched.
    pub fn tick(&mut self, now: Instant) -> Option<Topology> {
        match self.state {
            SyncState::DirtyTyping { deadline } if now >= deadline => self.validate(),
            _ => None,
        }
    }

    /// Validate immediately, bypassing the debounce window.
    pub fn import_now(&mut self) -> Option<Topology> {
        self.validate()
    }

    fn validate(&mut self) -> Option<Topology> {
        match parse_document(&self.text) {
            Ok(topology) => {
                self.last_valid_text = self.text.clone();
                self.state = SyncState::Clean;
                // The commit supersedes any deferred external change.
                self.deferred_refresh = false;
                Some(topology)
            }
            Err(e) => {
                tracing::debug!("document validation failed: {}", e);
                self.state = SyncState::Invalid {
                    error: e.to_string(),
                };
                None
            }
        }
    }

    /// React to an external model change. While `Clean` the buffer is
    /// re-rendered; otherwise the refresh is deferred so unsaved edits
    /// are not overwritten.
    pub fn on_model_changed(&mut self, topology: &Topology) -> Result<()> {
        if self.is_clean() {
            self.text = serialize_document(topology)?;
            self.last_valid_text = self.text.clone();
            self.deferred_refresh = false;
        } else {
            self.deferred_refresh = true;
        }
        Ok(())
    }

    /// Whether a deferred external refresh is pending. Clears the flag;
    /// the caller re-renders via [`EditorSync::on_model_changed`] once
    /// the editor is clean again.
    pub fn take_deferred_refresh(&mut self) -> bool {
        if self.is_clean() && self.deferred_refresh {
            self.deferred_refresh = false;
            true
        } else {
            false
        }
    }

    /// Serialize the live model into the buffer regardless of dirty
    /// state and return the text for export. Resets the editor to clean.
    pub fn export(&mut self, topology: &Topology) -> Result<String> {
        let text = serialize_document(topology)?;
        self.text = text.clone();
        self.last_valid_text = text.clone();
        self.state = SyncState::Clean;
        self.deferred_refresh = false;
        Ok(text)
    }

    /// Discard unparsable text and restore the last known-valid text.
    /// Only meaningful from `Invalid`.
    pub fn reset(&mut self) {
        if matches!(self.state, SyncState::Invalid { .. }) {
            self.text = self.last_valid_text.clone();
            self.state = SyncState::Clean;
        }
    }
}
