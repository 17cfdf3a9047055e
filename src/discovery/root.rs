//! Project root and scope lookup

use crate::error::{DiscoveryError, DiscoveryResult};
use std::path::{Path, PathBuf};

/// Name of the folders holding task scripts
pub const QOX_FOLDER: &str = ".qox";

/// Marker file that stops the upward search for the project root
pub const ROOT_MARKER: &str = ".qox-root";

/// Find the project root by searching the start directory and its parents
///
/// The root is the topmost directory containing a `.qox` folder. A directory
/// holding a [`ROOT_MARKER`] file ends the search early and becomes the root.
pub fn find_project_root(start_dir: &Path) -> DiscoveryResult<PathBuf> {
    let mut current_dir = start_dir.to_path_buf();
    let mut topmost = None;

    loop {
        if has_qox_folder(&current_dir) {
            topmost = Some(current_dir.clone());
        }

        if current_dir.join(ROOT_MARKER).is_file() {
            return match topmost {
                Some(_) => Ok(current_dir),
                None => Err(DiscoveryError::NoTaskFolder(start_dir.to_path_buf())),
            };
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => break,
        }
    }

    topmost.ok_or_else(|| DiscoveryError::NoTaskFolder(start_dir.to_path_buf()))
}

/// Directories between `start_dir` and `root` (both inclusive) that own a
/// `.qox` folder, nearest to `start_dir` first
pub fn scope_dirs(root: &Path, start_dir: &Path) -> Vec<PathBuf> {
    start_dir
        .ancestors()
        .take_while(|dir| dir.starts_with(root))
        .filter(|dir| has_qox_folder(dir))
        .map(Path::to_path_buf)
        .collect()
}

/// Whether `dir` contains a `.qox` folder
pub fn has_qox_folder(dir: &Path) -> bool {
    dir.join(QOX_FOLDER).is_dir()
}
