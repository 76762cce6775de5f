//! Directory walker for discovering spec files

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Errors that can occur while discovering spec files
#[derive(Debug)]
pub enum WalkerError {
    /// IO error
    Io(std::io::Error),
    /// The given path does not exist
    NotFound(PathBuf),
}

impl From<std::io::Error> for WalkerError {
    fn from(err: std::io::Error) -> Self {
        WalkerError::Io(err)
    }
}

impl std::fmt::Display for WalkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalkerError::Io(e) => write!(f, "IO error: {}", e),
            WalkerError::NotFound(path) => write!(f, "Path not found: {}", path.display()),
        }
    }
}

impl std::error::Error for WalkerError {}

/// Collect the spec files below `root`
///
/// A file path is returned as is, whatever its extension. Directories are
/// walked recursively in file name order and every `*.spec` file is kept.
pub fn discover_specs(root: &Path) -> Result<Vec<PathBuf>, WalkerError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.exists() {
        return Err(WalkerError::NotFound(root.to_path_buf()));
    }

    let mut specs = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::other)?;
        let path = entry.path();

        if !entry.file_type().is_file() || path.extension().and_then(|s| s.to_str()) != Some("spec")
        {
            continue;
        }
        specs.push(path.to_path_buf());
    }

    log::debug!("found {} spec files below {}", specs.len(), root.display());
    Ok(specs)
}
