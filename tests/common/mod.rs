//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway project with `.qox` folders
pub struct Project {
    _temp: TempDir,
    pub root: PathBuf,
}

impl Project {
    /// Create an empty project whose root holds a `.qox` folder
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir(root.join(".qox")).unwrap();
        Project { _temp: temp, root }
    }

    /// Absolute path of a directory inside the project, created if missing
    pub fn dir(&self, rel: &str) -> PathBuf {
        let dir = self.root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write a script into the `.qox` folder of `rel` ("" for the root)
    pub fn task(&self, rel: &str, file: &str, content: &str) -> PathBuf {
        let folder = self.dir(rel).join(".qox");
        fs::create_dir_all(&folder).unwrap();
        let path = folder.join(file);
        fs::write(&path, content).unwrap();
        path
    }

    /// Write the project override file
    pub fn overrides(&self, yaml: &str) {
        fs::write(self.root.join(".qox").join("_qox_eval_context.yml"), yaml).unwrap();
    }
}

/// Directory a task wrote with `pwd > ran_in.txt`
pub fn ran_in(dir: &Path) -> Option<PathBuf> {
    fs::read_to_string(dir.join("ran_in.txt"))
        .ok()
        .map(|s| PathBuf::from(s.trim()))
}
