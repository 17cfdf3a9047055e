//! Error types for qox

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for qox operations
pub type Result<T> = std::result::Result<T, QoxError>;

/// Exit code for failures to discover or resolve a task
pub const EXIT_RESOLUTION_FAILED: i32 = 2;

/// Exit code when a process could not be created
pub const EXIT_CANNOT_EXECUTE: i32 = 126;

/// Exit code when the script vanished between discovery and execution
pub const EXIT_SCRIPT_NOT_FOUND: i32 = 127;

/// Main error type for qox
#[derive(Error, Debug)]
pub enum QoxError {
    /// Task discovery and lookup errors
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Per-project override file errors
    #[error("Override error: {0}")]
    Override(#[from] OverrideError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl QoxError {
    /// Process exit code used when this error ends an invocation
    pub fn exit_code(&self) -> i32 {
        match self {
            QoxError::Execution(ExecutionError::ScriptNotFound(_)) => EXIT_SCRIPT_NOT_FOUND,
            QoxError::Execution(ExecutionError::SpawnFailed { .. }) => EXIT_CANNOT_EXECUTE,
            _ => EXIT_RESOLUTION_FAILED,
        }
    }
}

/// Errors raised while locating tasks
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Nothing to do from {0} upwards - add a .qox folder")]
    NoTaskFolder(PathBuf),

    #[error("No tasks found in {0} - add some tasks")]
    NoTasks(String),

    #[error("Task '{name}' is not defined (available: {available})")]
    TaskNotFound { name: String, available: String },

    #[error("Task '{name}' is defined more than once in {scope}: {paths}")]
    Conflict {
        name: String,
        scope: PathBuf,
        paths: String,
    },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Script {0} does not exist anymore")]
    ScriptNotFound(PathBuf),

    #[error("Task '{0}' is not RUNNABLE")]
    NotRunnable(String),

    #[error("{0} is not an existing directory")]
    InvalidWorkingDir(PathBuf),

    #[error("Failed to start '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Errors in the per-project override file
#[derive(Error, Debug)]
pub enum OverrideError {
    #[error("Failed to read override file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    #[error("Invalid override file '{path}': {error}")]
    Invalid { path: PathBuf, error: String },

    #[error("Invalid changedir '{value}' for {script}")]
    InvalidChangeDir { script: String, value: String },
}

/// Specialized result type for discovery operations
pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for override file operations
pub type OverrideResult<T> = std::result::Result<T, OverrideError>;
