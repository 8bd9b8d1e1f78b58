//! Application module
//!
//! Re-exports the main application type from the frontend module as a
//! convenient access point for the entry binary.

pub use crate::frontend::TopoVisApp;
