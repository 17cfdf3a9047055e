//! Script inspection
//!
//! This module knows which files are scripts, how they are started and which
//! directives they carry.

pub mod kind;
pub mod metadata;

// Re-export main types
pub use kind::*;
pub use metadata::*;
