//! Task registry

use crate::discovery::Task;
use crate::error::{DiscoveryError, DiscoveryResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Same-named scripts found in one scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub name: String,
    pub scope: PathBuf,
    pub paths: Vec<PathBuf>,
}

impl Conflict {
    fn to_error(&self) -> DiscoveryError {
        DiscoveryError::Conflict {
            name: self.name.clone(),
            scope: self.scope.clone(),
            paths: self
                .paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// All tasks visible from the start directory, at most one per name
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    root: PathBuf,
    start_dir: PathBuf,
    tasks: BTreeMap<String, Task>,
    conflicts: Vec<Conflict>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new(root: PathBuf, start_dir: PathBuf) -> Self {
        TaskRegistry {
            root,
            start_dir,
            tasks: BTreeMap::new(),
            conflicts: Vec::new(),
        }
    }

    /// Project root the walk started from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory discovery was invoked from
    pub fn start_dir(&self) -> &Path {
        &self.start_dir
    }

    /// Whether a task or conflict already holds `name`
    pub fn is_claimed(&self, name: &str) -> bool {
        self.tasks.contains_key(name) || self.conflicts.iter().any(|c| c.name == name)
    }

    /// Register a task unless its name is already claimed
    ///
    /// Returns false when a nearer scope already holds the name.
    pub fn insert(&mut self, task: Task) -> bool {
        if self.is_claimed(&task.name) {
            return false;
        }
        self.tasks.insert(task.name.clone(), task);
        true
    }

    /// Record a same-scope conflict, reserving its name
    pub fn add_conflict(&mut self, conflict: Conflict) {
        self.tasks.remove(&conflict.name);
        self.conflicts.push(conflict);
    }

    /// Look up a task by name
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Look up a task by name, explaining why it is unavailable
    pub fn fetch(&self, name: &str) -> DiscoveryResult<&Task> {
        if let Some(task) = self.tasks.get(name) {
            return Ok(task);
        }

        if let Some(conflict) = self.conflicts.iter().find(|c| c.name == name) {
            return Err(conflict.to_error());
        }

        Err(DiscoveryError::TaskNotFound {
            name: name.to_string(),
            available: self.names().join(", "),
        })
    }

    /// Tasks sorted by name
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Task names sorted
    pub fn names(&self) -> Vec<String> {
        self.tasks.keys().cloned().collect()
    }

    /// Same-scope conflicts found during discovery
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Whether some names were dropped because of conflicts
    pub fn is_degraded(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{ChangeDir, TaskKind};

    fn task(name: &str, scope: &str) -> Task {
        Task {
            name: name.to_string(),
            path: PathBuf::from(format!("{}/.qox/{}.sh", scope, name)),
            scope: PathBuf::from(scope),
            kind: TaskKind::Shell,
            help: String::new(),
            changedir: ChangeDir::Inherit,
            runnable: true,
        }
    }

    fn registry() -> TaskRegistry {
        TaskRegistry::new(PathBuf::from("/p"), PathBuf::from("/p/sub"))
    }

    #[test]
    fn test_first_insert_wins() {
        let mut reg = registry();
        assert!(reg.insert(task("lint", "/p/sub")));
        assert!(!reg.insert(task("lint", "/p")));

        assert_eq!(reg.fetch("lint").unwrap().scope, PathBuf::from("/p/sub"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_conflict_reserves_name() {
        let mut reg = registry();
        reg.insert(task("fmt", "/p/sub"));
        reg.add_conflict(Conflict {
            name: "lint".to_string(),
            scope: PathBuf::from("/p/sub"),
            paths: vec![
                PathBuf::from("/p/sub/.qox/lint.py"),
                PathBuf::from("/p/sub/.qox/lint.sh"),
            ],
        });

        assert!(!reg.insert(task("lint", "/p")));
        assert!(reg.is_degraded());
        assert!(matches!(
            reg.fetch("lint"),
            Err(DiscoveryError::Conflict { .. })
        ));
        assert!(reg.fetch("fmt").is_ok());
    }

    #[test]
    fn test_fetch_unknown_lists_available() {
        let mut reg = registry();
        reg.insert(task("b", "/p"));
        reg.insert(task("a", "/p"));

        match reg.fetch("nope") {
            Err(DiscoveryError::TaskNotFound { name, available }) => {
                assert_eq!(name, "nope");
                assert_eq!(available, "a, b");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
