//! Discovered tasks

use crate::script::{parse, ChangeDir, KindSpec, TaskKind};
use std::path::{Path, PathBuf};

/// A runnable unit backed by one script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task name (script file name without extension)
    pub name: String,

    /// Script location
    pub path: PathBuf,

    /// Directory owning the `.qox` folder the script was found in
    pub scope: PathBuf,

    /// How the script is started
    pub kind: TaskKind,

    /// Accumulated `HELP` text
    pub help: String,

    /// Requested working directory
    pub changedir: ChangeDir,

    /// `RUNNABLE` directive verdict, true when absent
    pub runnable: bool,
}

impl Task {
    /// Build a task from a script and its text
    ///
    /// Returns `None` when no task name can be derived from the file name.
    pub fn from_script(path: &Path, scope: &Path, spec: &KindSpec, text: &str) -> Option<Self> {
        let name = path.file_stem()?.to_str()?.to_string();
        if name.is_empty() {
            return None;
        }

        let metadata = parse(text, spec.comment_marker);

        Some(Task {
            name,
            path: path.to_path_buf(),
            scope: scope.to_path_buf(),
            kind: spec.kind,
            help: metadata.help_text(),
            changedir: metadata.changedir,
            runnable: metadata.runnable.unwrap_or(true),
        })
    }

    /// Folder containing the script
    pub fn script_dir(&self) -> &Path {
        self.path.parent().unwrap_or(self.scope.as_path())
    }

    /// First line of the help text
    pub fn summary(&self) -> &str {
        self.help.lines().next().unwrap_or("")
    }

    /// Name prefixed with the scope relative to `root`, e.g. `[sub] lint`
    pub fn long_name(&self, root: &Path) -> String {
        match self.scope.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => {
                format!("[{}] {}", rel.display(), self.name)
            }
            _ => self.name.clone(),
        }
    }
}
