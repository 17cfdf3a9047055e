//! Task execution engine
//!
//! This module resolves where and how a task runs, consults the per-project
//! override hook, and spawns the task process.

pub mod command;
pub mod context;
pub mod overrides;
pub mod run;
pub mod when;

// Re-export main types
pub use command::*;
pub use context::*;
pub use overrides::*;
pub use run::*;
pub use when::*;
