//! When condition evaluation
//!
//! Conditions gate whether a script may run. They come from the per-project
//! override file and are evaluated against the project root.

use crate::runner::check_command;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// A conditional expression as written in the override file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct When {
    /// Check if environment variable is set
    #[serde(rename = "env-set", skip_serializing_if = "Option::is_none")]
    pub env_set: Option<String>,

    /// Check if environment variable is not set
    #[serde(rename = "env-not-set", skip_serializing_if = "Option::is_none")]
    pub env_not_set: Option<String>,

    /// Check the operating system (`linux`, `macos`, `windows`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    /// Check if a path relative to the project root exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<String>,

    /// Check if a command succeeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// Types of when conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhenCondition {
    EnvSet(String),
    EnvNotSet(String),
    Os(String),
    Exists(String),
    Command(String),
    Always,
}

impl When {
    /// Conditions expressed by this entry; every set field is one condition
    pub fn conditions(&self) -> Vec<WhenCondition> {
        let mut conditions = Vec::new();
        if let Some(var) = &self.env_set {
            conditions.push(WhenCondition::EnvSet(var.clone()));
        }
        if let Some(var) = &self.env_not_set {
            conditions.push(WhenCondition::EnvNotSet(var.clone()));
        }
        if let Some(os) = &self.os {
            conditions.push(WhenCondition::Os(os.clone()));
        }
        if let Some(path) = &self.exists {
            conditions.push(WhenCondition::Exists(path.clone()));
        }
        if let Some(cmd) = &self.command {
            conditions.push(WhenCondition::Command(cmd.clone()));
        }
        if conditions.is_empty() {
            conditions.push(WhenCondition::Always);
        }
        conditions
    }
}

/// Evaluate a list of conditions (all must be true - AND logic)
pub fn evaluate_when_list(conditions: &[WhenCondition], root: &Path) -> bool {
    conditions.iter().all(|condition| evaluate_when(condition, root))
}

/// Evaluate a single condition
pub fn evaluate_when(condition: &WhenCondition, root: &Path) -> bool {
    match condition {
        WhenCondition::Always => true,
        WhenCondition::EnvSet(var) => env::var_os(var).is_some(),
        WhenCondition::EnvNotSet(var) => env::var_os(var).is_none(),
        WhenCondition::Os(os) => os.eq_ignore_ascii_case(env::consts::OS),
        WhenCondition::Exists(path) => root.join(path).exists(),
        WhenCondition::Command(cmd) => check_command(cmd, root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_when_is_always() {
        assert_eq!(When::default().conditions(), vec![WhenCondition::Always]);
    }

    #[test]
    fn test_every_field_is_a_condition() {
        let when = When {
            env_set: Some("CI".to_string()),
            os: Some("linux".to_string()),
            ..When::default()
        };
        assert_eq!(
            when.conditions(),
            vec![
                WhenCondition::EnvSet("CI".to_string()),
                WhenCondition::Os("linux".to_string()),
            ]
        );
    }

    #[test]
    fn test_evaluate_env() {
        let root = Path::new(".");
        assert!(evaluate_when(&WhenCondition::EnvSet("PATH".to_string()), root));
        assert!(evaluate_when(
            &WhenCondition::EnvNotSet("QOX_SURELY_NOT_SET_4711".to_string()),
            root
        ));
    }

    #[test]
    fn test_evaluate_os() {
        let root = Path::new(".");
        assert!(evaluate_when(&WhenCondition::Os(env::consts::OS.to_uppercase()), root));
        assert!(!evaluate_when(&WhenCondition::Os("plan9".to_string()), root));
    }

    #[test]
    fn test_evaluate_exists() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("Cargo.toml"), "").unwrap();

        assert!(evaluate_when(
            &WhenCondition::Exists("Cargo.toml".to_string()),
            temp_dir.path()
        ));
        assert!(!evaluate_when(
            &WhenCondition::Exists("setup.py".to_string()),
            temp_dir.path()
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_evaluate_when_list_one_false() {
        let root = Path::new(".");
        let conditions = vec![
            WhenCondition::Command("true".to_string()),
            WhenCondition::Command("false".to_string()),
        ];
        assert!(!evaluate_when_list(&conditions, root));
        assert!(evaluate_when_list(&conditions[..1], root));
    }
}
