//! Directive parsing
//!
//! Scripts describe themselves through comment lines at the top of the file:
//!
//! ```text
//! #!/usr/bin/env bash
//! # HELP: run tests
//! # CHANGEDIR: ROOT
//! pytest -l tests
//! ```
//!
//! Only the leading comment block is scanned. Parsing never fails: anything
//! that is not understood is ignored and the defaults apply.

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// ` KEY: value`, applied to a comment line with its marker removed
///
/// At least one space must separate the marker from the key.
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(?P<key>[A-Z][A-Z_]*):\s?(?P<value>.*)$").expect("directive pattern")
});

/// Where a task runs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChangeDir {
    /// Keep the directory qox was invoked from
    #[default]
    Inherit,

    /// The project root
    Root,

    /// The folder containing the script
    SelfDir,

    /// The directory owning the script's `.qox` folder
    Here,

    /// An explicit directory, relative paths are taken from the project root
    Path(PathBuf),
}

impl ChangeDir {
    /// Parse the value of a `CHANGEDIR` directive
    pub fn from_directive(value: &str) -> Option<Self> {
        match value.trim() {
            "ROOT" => Some(ChangeDir::Root),
            "SELF" => Some(ChangeDir::SelfDir),
            "HERE" => Some(ChangeDir::Here),
            _ => None,
        }
    }
}

/// Directives extracted from a script
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    /// One entry per `HELP` line, in file order
    pub help: Vec<String>,

    /// Requested working directory
    pub changedir: ChangeDir,

    /// Explicit `RUNNABLE` verdict, if any
    pub runnable: Option<bool>,
}

impl Metadata {
    /// Accumulated help text, one line per `HELP` directive
    pub fn help_text(&self) -> String {
        self.help.join("\n")
    }
}

/// Parse the directives from the leading comment block of a script
pub fn parse(script_text: &str, comment_marker: &str) -> Metadata {
    let mut metadata = Metadata::default();
    let mut changedir_seen = false;

    for line in script_text.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }

        let Some(comment) = trimmed.strip_prefix(comment_marker) else {
            break;
        };

        let Some(caps) = DIRECTIVE.captures(comment) else {
            continue;
        };
        let value = caps["value"].trim_end();

        match &caps["key"] {
            "HELP" => metadata.help.push(value.to_string()),
            "CHANGEDIR" if !changedir_seen => {
                changedir_seen = true;
                metadata.changedir = ChangeDir::from_directive(value).unwrap_or_default();
            }
            "RUNNABLE" if metadata.runnable.is_none() => {
                metadata.runnable = parse_bool(value);
            }
            _ => {}
        }
    }

    metadata
}

/// Lenient boolean used by `RUNNABLE`
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
