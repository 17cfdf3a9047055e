//! Script kinds
//!
//! Every supported file extension maps to a kind that decides how the script
//! is started and which comment marker carries its directives. New kinds are
//! added by extending [`KINDS`].

use std::fmt;
use std::path::Path;

/// How a script of a given kind is started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Executed directly through its `#!` line (falls back to `sh` without one)
    Shell,

    /// Handed to an interpreter command as its first argument
    Interpreted(&'static str),
}

impl TaskKind {
    /// Whether the script file itself gets executed
    pub fn is_self_executing(&self) -> bool {
        matches!(self, TaskKind::Shell)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Shell => write!(f, "shell"),
            TaskKind::Interpreted(interpreter) => write!(f, "{}", interpreter),
        }
    }
}

/// Entry of the extension lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
    /// File extension without the leading dot
    pub extension: &'static str,

    /// How scripts with this extension are run
    pub kind: TaskKind,

    /// Prefix of comment lines in this kind of script
    pub comment_marker: &'static str,
}

/// Interpreter used for shell scripts that lack a `#!` line
pub const FALLBACK_SHELL: &str = "sh";

/// Supported script kinds, keyed by extension
pub const KINDS: &[KindSpec] = &[
    KindSpec {
        extension: "sh",
        kind: TaskKind::Shell,
        comment_marker: "#",
    },
    KindSpec {
        extension: "bash",
        kind: TaskKind::Shell,
        comment_marker: "#",
    },
    KindSpec {
        extension: "py",
        kind: TaskKind::Interpreted("python3"),
        comment_marker: "#",
    },
    KindSpec {
        extension: "rb",
        kind: TaskKind::Interpreted("ruby"),
        comment_marker: "#",
    },
    KindSpec {
        extension: "pl",
        kind: TaskKind::Interpreted("perl"),
        comment_marker: "#",
    },
];

/// Look up the kind for a file extension
pub fn kind_for_extension(extension: &str) -> Option<&'static KindSpec> {
    KINDS.iter().find(|spec| spec.extension == extension)
}

/// Look up the kind for a script path
pub fn kind_for_path(path: &Path) -> Option<&'static KindSpec> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(kind_for_extension)
}
