//! Scope scanning

use crate::discovery::{find_project_root, scope_dirs, Conflict, Task, TaskRegistry, QOX_FOLDER};
use crate::error::Result;
use crate::script::kind_for_path;
use crate::ui::Reporter;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Files inside `.qox` folders that are skipped without a warning
const IGNORED_PATTERNS: &[&str] = &["*.ini", "*~", "*.swp", "*.bak"];

/// Build the registry of tasks visible from `start_dir`
///
/// Scopes are visited nearest first, so a task defined closer to `start_dir`
/// hides a same-named task further up.
pub fn discover(start_dir: &Path, reporter: &Reporter) -> Result<TaskRegistry> {
    let start_dir = start_dir.canonicalize()?;
    let root = find_project_root(&start_dir)?;
    reporter.debug(&format!("project root: {}", root.display()));

    let ignored = ignored_files();
    let mut registry = TaskRegistry::new(root.clone(), start_dir.clone());

    for scope in scope_dirs(&root, &start_dir) {
        let candidates = scan_scope(&scope, &ignored, reporter);
        merge_scope(&mut registry, &scope, candidates, reporter);
    }

    Ok(registry)
}

/// Collect the task candidates of one `.qox` folder, sorted by file name
pub fn scan_scope(scope: &Path, ignored: &GlobSet, reporter: &Reporter) -> Vec<Task> {
    let folder = scope.join(QOX_FOLDER);
    let entries = match fs::read_dir(&folder) {
        Ok(entries) => entries,
        Err(e) => {
            reporter.warn(&format!("cannot read {}: {}", folder.display(), e));
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut tasks = Vec::new();
    for path in paths {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if file_name.starts_with('_') || file_name.starts_with('.') {
            reporter.debug(&format!("[SKIP] {}", path.display()));
            continue;
        }

        if ignored.is_match(file_name) {
            continue;
        }

        let Some(spec) = kind_for_path(&path) else {
            reporter.warn(&format!("[IGNORE] no task handler for {}", path.display()));
            continue;
        };

        let text = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                reporter.warn(&format!("[IGNORE] cannot read {}: {}", path.display(), e));
                continue;
            }
        };

        if let Some(task) = Task::from_script(&path, scope, spec, &text) {
            tasks.push(task);
        }
    }

    tasks
}

/// Add the candidates of one scope to the registry
///
/// Names already claimed by a nearer scope are skipped. Names defined twice
/// within this scope become conflicts.
fn merge_scope(registry: &mut TaskRegistry, scope: &Path, candidates: Vec<Task>, reporter: &Reporter) {
    let mut by_name: BTreeMap<String, Vec<Task>> = BTreeMap::new();
    for task in candidates {
        by_name.entry(task.name.clone()).or_default().push(task);
    }

    for (name, mut tasks) in by_name {
        if registry.is_claimed(&name) {
            for task in &tasks {
                reporter.debug(&format!("[SHADOWED] {}", task.path.display()));
            }
            continue;
        }

        if tasks.len() > 1 {
            let conflict = Conflict {
                name,
                scope: scope.to_path_buf(),
                paths: tasks.into_iter().map(|t| t.path).collect(),
            };
            reporter.warn(&format!(
                "task '{}' is defined more than once in {} - ignoring it",
                conflict.name,
                scope.join(QOX_FOLDER).display()
            ));
            registry.add_conflict(conflict);
            continue;
        }

        if let Some(task) = tasks.pop() {
            reporter.debug(&format!("[TASK] {} -> {}", task.name, task.path.display()));
            registry.insert(task);
        }
    }
}

/// Glob set of file names that never become tasks
pub fn ignored_files() -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in IGNORED_PATTERNS {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
}
