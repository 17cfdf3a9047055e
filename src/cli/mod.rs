//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, task listing and dispatch to the
//! runner.

pub mod app;

// Re-export main types
pub use app::*;
