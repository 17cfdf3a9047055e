//! Execution context resolution
//!
//! Decides where a task runs, whether it may run at all, and which command
//! line starts it.

use crate::discovery::{Task, TaskRegistry};
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::ContextOverride;
use crate::script::{ChangeDir, TaskKind, FALLBACK_SHELL};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Everything needed to spawn one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Directory the child process starts in
    pub working_dir: PathBuf,

    /// Program to start
    pub program: PathBuf,

    /// Arguments passed to the program
    pub args: Vec<OsString>,

    /// Whether `working_dir` differs from the invocation directory
    pub changes_dir: bool,
}

impl ExecutionContext {
    /// Command line for display purposes
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(|a| a.as_os_str()))
            .map(|part| part.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Computes execution contexts for the tasks of one project
pub struct ContextResolver {
    root: PathBuf,
    invocation_dir: PathBuf,
    overrides: Option<Box<dyn ContextOverride>>,
}

impl ContextResolver {
    /// Create a resolver for a project root and the directory qox runs from
    pub fn new(root: PathBuf, invocation_dir: PathBuf) -> Self {
        ContextResolver {
            root,
            invocation_dir,
            overrides: None,
        }
    }

    /// Create a resolver matching a registry's root and start directory
    pub fn for_registry(registry: &TaskRegistry) -> Self {
        Self::new(
            registry.root().to_path_buf(),
            registry.start_dir().to_path_buf(),
        )
    }

    /// Register the project's override hook
    pub fn with_override(mut self, overrides: Box<dyn ContextOverride>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn invocation_dir(&self) -> &Path {
        &self.invocation_dir
    }

    /// Whether the task may run; the override hook has the last word
    pub fn is_runnable(&self, task: &Task) -> bool {
        self.overrides
            .as_ref()
            .and_then(|o| o.runnable(&task.path))
            .unwrap_or(task.runnable)
    }

    /// Requested working directory mode, override first
    pub fn changedir(&self, task: &Task) -> ChangeDir {
        self.overrides
            .as_ref()
            .and_then(|o| o.working_dir(&task.path))
            .unwrap_or_else(|| task.changedir.clone())
    }

    /// Absolute working directory for the task
    pub fn working_dir(&self, task: &Task) -> ExecutionResult<PathBuf> {
        let dir = match self.changedir(task) {
            ChangeDir::Inherit => self.invocation_dir.clone(),
            ChangeDir::Root => self.root.clone(),
            ChangeDir::SelfDir => task.script_dir().to_path_buf(),
            ChangeDir::Here => task.scope.clone(),
            ChangeDir::Path(path) => self.root.join(path),
        };

        if !dir.is_dir() {
            return Err(ExecutionError::InvalidWorkingDir(dir));
        }

        Ok(dir)
    }

    /// Resolve the full execution context of a task
    ///
    /// `script_text` is the current content of the script; it decides whether
    /// a shell script can be executed directly.
    pub fn resolve(
        &self,
        task: &Task,
        script_text: &str,
        args: &[String],
    ) -> ExecutionResult<ExecutionContext> {
        if !self.is_runnable(task) {
            return Err(ExecutionError::NotRunnable(task.name.clone()));
        }

        let working_dir = self.working_dir(task)?;
        let changes_dir = working_dir != self.invocation_dir;

        let (program, mut cmd_args) = match task.kind {
            TaskKind::Shell if script_text.starts_with("#!") => (task.path.clone(), Vec::new()),
            TaskKind::Shell => (
                PathBuf::from(FALLBACK_SHELL),
                vec![task.path.clone().into_os_string()],
            ),
            TaskKind::Interpreted(interpreter) => (
                PathBuf::from(interpreter),
                vec![task.path.clone().into_os_string()],
            ),
        };
        cmd_args.extend(args.iter().map(OsString::from));

        Ok(ExecutionContext {
            working_dir,
            program,
            args: cmd_args,
            changes_dir,
        })
    }
}
