//! Error handling for the TopoVis application
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application.

use thiserror::Error;

/// Main error type for TopoVis operations
#[derive(Error, Debug)]
pub enum TopoVisError {
    /// Malformed topology document; the model is left untouched
    #[error("Parse error: {0}")]
    Parse(String),

    /// A mutation that would break the topology's structure; the
    /// operation is aborted with no partial change
    #[error("{0}")]
    Structural(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors serializing the model back to text
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TopoVisError>,
    },
}

impl TopoVisError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TopoVisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a structural violation error
    pub fn structural(message: impl Into<String>) -> Self {
        TopoVisError::Structural(message.into())
    }
}

/// Result type alias for TopoVis operations
pub type Result<T> = std::result::Result<T, TopoVisError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
