//! Per-project overrides
//!
//! A project can veto scripts or pick their working directory without
//! touching the scripts. The resolver consults a [`ContextOverride`] before it
//! looks at a script's own directives.
//!
//! The bundled implementation reads `.qox/_qox_eval_context.yml` in the
//! project root:
//!
//! ```yaml
//! scripts:
//!   .qox/deploy.sh:
//!     runnable: false
//!   sub/.qox/release.sh:
//!     changedir: ROOT
//!     when:
//!       - env-set: CI
//!       - os: linux
//! ```

use crate::discovery::QOX_FOLDER;
use crate::error::{OverrideError, OverrideResult};
use crate::runner::{evaluate_when_list, When, WhenCondition};
use crate::script::ChangeDir;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the override file inside the root `.qox` folder
pub const EVAL_CONTEXT_FILE: &str = "_qox_eval_context.yml";

/// Hook that decides runnability and working directory per script
///
/// `None` means "no opinion", leaving the decision to the script's directives.
pub trait ContextOverride {
    fn runnable(&self, script: &Path) -> Option<bool>;

    fn working_dir(&self, script: &Path) -> Option<ChangeDir>;
}

/// Override file layout
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EvalContextConfig {
    /// Entries keyed by script path relative to the project root
    #[serde(default)]
    pub scripts: HashMap<String, ScriptOverride>,
}

/// Overrides for one script
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScriptOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runnable: Option<bool>,

    /// `ROOT`, `SELF`, `HERE`, `INHERIT` or a directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changedir: Option<String>,

    /// Conditions that must all hold for the script to be runnable
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub when: Vec<When>,
}

#[derive(Debug, Clone)]
struct Entry {
    runnable: Option<bool>,
    changedir: Option<ChangeDir>,
    when: Vec<WhenCondition>,
}

/// [`ContextOverride`] backed by the project's override file
#[derive(Debug, Clone)]
pub struct EvalContextFile {
    root: PathBuf,
    entries: HashMap<String, Entry>,
}

impl EvalContextFile {
    /// Location of the override file for a project root
    pub fn path_for(root: &Path) -> PathBuf {
        root.join(QOX_FOLDER).join(EVAL_CONTEXT_FILE)
    }

    /// Load the override file of a project, if there is one
    pub fn load(root: &Path) -> OverrideResult<Option<Self>> {
        let path = Self::path_for(root);
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|e| OverrideError::Read {
            path: path.clone(),
            error: e.to_string(),
        })?;

        Self::parse(root, &contents, &path).map(Some)
    }

    /// Parse override file contents
    pub fn parse(root: &Path, yaml: &str, path: &Path) -> OverrideResult<Self> {
        let config: EvalContextConfig = if yaml.trim().is_empty() {
            EvalContextConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| OverrideError::Invalid {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?
        };

        let mut entries = HashMap::new();
        for (script, over) in config.scripts {
            let changedir = match &over.changedir {
                Some(value) => Some(parse_changedir(&script, value)?),
                None => None,
            };
            let when = over.when.iter().flat_map(When::conditions).collect();

            entries.insert(
                normalize_key(&script),
                Entry {
                    runnable: over.runnable,
                    changedir,
                    when,
                },
            );
        }

        Ok(EvalContextFile {
            root: root.to_path_buf(),
            entries,
        })
    }

    /// Number of scripts with overrides
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, script: &Path) -> Option<&Entry> {
        let rel = script.strip_prefix(&self.root).ok()?;
        self.entries.get(&relative_key(rel))
    }
}

impl ContextOverride for EvalContextFile {
    fn runnable(&self, script: &Path) -> Option<bool> {
        let entry = self.entry(script)?;
        if entry.when.is_empty() {
            return entry.runnable;
        }

        let allowed = evaluate_when_list(&entry.when, &self.root);
        Some(entry.runnable.unwrap_or(true) && allowed)
    }

    fn working_dir(&self, script: &Path) -> Option<ChangeDir> {
        self.entry(script)?.changedir.clone()
    }
}

/// Parse a `changedir` override value
fn parse_changedir(script: &str, value: &str) -> OverrideResult<ChangeDir> {
    let value = value.trim();
    if value.is_empty() {
        return Err(OverrideError::InvalidChangeDir {
            script: script.to_string(),
            value: value.to_string(),
        });
    }

    if value == "INHERIT" {
        return Ok(ChangeDir::Inherit);
    }

    Ok(ChangeDir::from_directive(value).unwrap_or_else(|| ChangeDir::Path(PathBuf::from(value))))
}

/// Relative path as `/`-separated key
fn relative_key(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_key(key: &str) -> String {
    relative_key(Path::new(key.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const YAML: &str = r#"
scripts:
  .qox/deploy.sh:
    runnable: false
  ./sub/.qox/release.sh:
    changedir: ROOT
  .qox/docs.sh:
    changedir: docs
  .qox/ci.sh:
    when:
      - env-not-set: QOX_SURELY_NOT_SET_4711
      - os: plan9
"#;

    fn parse(root: &Path) -> EvalContextFile {
        EvalContextFile::parse(root, YAML, &EvalContextFile::path_for(root)).unwrap()
    }

    #[test]
    fn test_parse_entries() {
        let root = Path::new("/p");
        let over = parse(root);
        assert_eq!(over.len(), 4);

        assert_eq!(over.runnable(&root.join(".qox/deploy.sh")), Some(false));
        assert_eq!(over.working_dir(&root.join(".qox/deploy.sh")), None);
        assert_eq!(
            over.working_dir(&root.join("sub/.qox/release.sh")),
            Some(ChangeDir::Root)
        );
        assert_eq!(
            over.working_dir(&root.join(".qox/docs.sh")),
            Some(ChangeDir::Path(PathBuf::from("docs")))
        );
    }

    #[test]
    fn test_unknown_script_has_no_opinion() {
        let root = Path::new("/p");
        let over = parse(root);
        assert_eq!(over.runnable(&root.join(".qox/lint.sh")), None);
        assert_eq!(over.working_dir(Path::new("/elsewhere/.qox/lint.sh")), None);
    }

    #[test]
    fn test_when_conditions_veto() {
        let root = Path::new("/p");
        let over = parse(root);
        assert_eq!(over.runnable(&root.join(".qox/ci.sh")), Some(false));
    }

    #[test]
    fn test_invalid_yaml() {
        let root = Path::new("/p");
        let result = EvalContextFile::parse(root, "scripts: [1, 2", Path::new("x.yml"));
        assert!(matches!(result, Err(OverrideError::Invalid { .. })));
    }

    #[test]
    fn test_empty_changedir_is_rejected() {
        let root = Path::new("/p");
        let yaml = "scripts:\n  .qox/a.sh:\n    changedir: \"\"\n";
        let result = EvalContextFile::parse(root, yaml, Path::new("x.yml"));
        assert!(matches!(result, Err(OverrideError::InvalidChangeDir { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(EvalContextFile::load(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_from_project() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join(QOX_FOLDER)).unwrap();
        fs::write(EvalContextFile::path_for(root), YAML).unwrap();

        let over = EvalContextFile::load(root).unwrap().unwrap();
        assert_eq!(over.runnable(&root.join(".qox/deploy.sh")), Some(false));
    }
}
