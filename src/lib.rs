//! qox - quality out of the box
//!
//! qox runs the scripts kept in `.qox` folders of a project. Each script is a
//! task named after its file. Comment directives at the top of a script set
//! its help text and working directory.

// Public modules
pub mod cli;
pub mod discovery;
pub mod error;
pub mod runner;
pub mod script;
pub mod ui;

// Re-export commonly used types
pub use discovery::{discover, Task, TaskRegistry};
pub use error::{QoxError, Result};
pub use runner::{ContextOverride, ContextResolver, Runner};

/// Current version of qox
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
