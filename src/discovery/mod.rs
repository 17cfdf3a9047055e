//! Task discovery
//!
//! This module finds the project root, walks the `.qox` folders between the
//! root and the start directory, and builds the task registry.

pub mod registry;
pub mod root;
pub mod scan;
pub mod task;

// Re-export main types
pub use registry::*;
pub use root::*;
pub use scan::*;
pub use task::*;
