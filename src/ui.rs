//! Terminal output
//!
//! Diagnostics go to stderr through a [`Reporter`] that is handed to the parts
//! that need it. Task listings are rendered as plain strings so the caller
//! decides where they go.

use crate::discovery::{Task, TaskRegistry};
use colored::Colorize;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

/// Verbosity-aware sink for diagnostics
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    verbosity: Verbosity,
}

impl Reporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Reporter { verbosity }
    }

    /// Reporter that prints nothing
    pub fn silent() -> Self {
        Self::new(Verbosity::Silent)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[INFO]".green(), message);
        }
    }

    /// Print warning message
    pub fn warn(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "[WARN]".yellow(), message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "[ERROR]".red().bold(), message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "[DEBUG]".dimmed(), message);
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}

/// Indent every line of `text` by `prefix`
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One listing entry: marker, scoped name, first help line, rest of the help
pub fn format_task(task: &Task, registry: &TaskRegistry, runnable: bool) -> String {
    let marker = if runnable { "🏃" } else { "💤" };
    let long_name = task.long_name(registry.root());

    let mut entry = if runnable {
        format!("  {} {}", marker, long_name.bold())
    } else {
        format!("  {} {}", marker, long_name.dimmed())
    };

    let summary = task.summary();
    if !summary.is_empty() {
        entry.push_str(&format!(" ({})", summary));
    }

    if let Some((_, rest)) = task.help.split_once('\n') {
        entry.push('\n');
        entry.push_str(&indent(rest, "      "));
    }

    entry
}

/// Render every task of the registry plus a note for each conflict
pub fn format_task_list<F>(registry: &TaskRegistry, is_runnable: F) -> String
where
    F: Fn(&Task) -> bool,
{
    let mut lines = vec!["💯 ✨ qox - quality out of the box - available tasks ✨ 💯".to_string()];

    for task in registry.tasks() {
        lines.push(format_task(task, registry, is_runnable(task)));
    }

    for conflict in registry.conflicts() {
        let files = conflict
            .paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "  {} {} (conflicting definitions: {})",
            "🐛".yellow(),
            conflict.name,
            files
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Conflict;
    use crate::script::{ChangeDir, TaskKind};
    use std::path::PathBuf;

    fn task(name: &str, scope: &str, help: &str) -> Task {
        Task {
            name: name.to_string(),
            path: PathBuf::from(format!("{}/.qox/{}.sh", scope, name)),
            scope: PathBuf::from(scope),
            kind: TaskKind::Shell,
            help: help.to_string(),
            changedir: ChangeDir::Inherit,
            runnable: true,
        }
    }

    #[test]
    fn test_verbosity_levels() {
        assert!(Verbosity::Verbose > Verbosity::Normal);
        assert!(Verbosity::Normal > Verbosity::Quiet);
        assert!(Verbosity::Quiet > Verbosity::Silent);
    }

    #[test]
    fn test_reporter_defaults() {
        assert_eq!(Reporter::default().verbosity(), Verbosity::Normal);
        assert_eq!(Reporter::silent().verbosity(), Verbosity::Silent);
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\n\nb", "  "), "  a\n\n  b");
    }

    #[test]
    fn test_format_task_with_multi_line_help() {
        let registry = TaskRegistry::new(PathBuf::from("/p"), PathBuf::from("/p"));
        let t = task("test", "/p/sub", "run tests\nneeds pytest");

        let entry = format_task(&t, &registry, true);
        assert!(entry.contains("[sub] test"));
        assert!(entry.contains("(run tests)"));
        assert!(entry.ends_with("\n      needs pytest"));
        assert!(entry.contains("🏃"));
    }

    #[test]
    fn test_format_task_list_marks_dormant_and_conflicts() {
        let mut registry = TaskRegistry::new(PathBuf::from("/p"), PathBuf::from("/p"));
        registry.insert(task("deploy", "/p", ""));
        registry.insert(task("lint", "/p", "run linters"));
        registry.add_conflict(Conflict {
            name: "fmt".to_string(),
            scope: PathBuf::from("/p"),
            paths: vec![PathBuf::from("/p/.qox/fmt.py"), PathBuf::from("/p/.qox/fmt.sh")],
        });

        let listing = format_task_list(&registry, |t| t.name != "deploy");
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("💤") && lines[1].contains("deploy"));
        assert!(lines[2].contains("🏃") && lines[2].contains("(run linters)"));
        assert!(lines[3].contains("fmt.py, fmt.sh"));
    }
}
