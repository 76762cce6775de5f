//! Macro preprocessing of spec files
//!
//! The splitter works on fully materialized lines. A [`Preprocessor`] turns a
//! spec file path into those lines, either by running an external macro
//! expander or by reading the file as is.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Errors raised while producing the lines of a spec file
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("spec file not found: {path}", path = .0.display())]
    NotFound(PathBuf),

    #[error("IO error reading {path}: {source}", path = .0.display(), source = .1)]
    IoError(PathBuf, #[source] std::io::Error),

    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' failed on {} ({status}): {stderr}", .path.display())]
    Failed {
        program: String,
        path: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Produces the lines of one spec file
pub trait Preprocessor: Sync {
    /// Read and expand the spec file at `path`
    ///
    /// Every returned line has its trailing whitespace removed.
    fn preprocess(&self, path: &Path) -> Result<Vec<String>, PreprocessError>;
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim_end().to_string()).collect()
}

/// Runs an external macro expander such as `rpmspec -P <file>`
#[derive(Debug, Clone)]
pub struct CommandPreprocessor {
    program: String,
    args: Vec<String>,
}

impl Default for CommandPreprocessor {
    fn default() -> Self {
        Self::new("rpmspec", vec!["-P".to_string()])
    }
}

impl CommandPreprocessor {
    /// Create a preprocessor running `program args... <path>`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Preprocessor for CommandPreprocessor {
    fn preprocess(&self, path: &Path) -> Result<Vec<String>, PreprocessError> {
        if !path.is_file() {
            return Err(PreprocessError::NotFound(path.to_path_buf()));
        }

        log::debug!("running {} {:?} {}", self.program, self.args, path.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|source| PreprocessError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PreprocessError::Failed {
                program: self.program.clone(),
                path: path.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(split_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Reads spec files without macro expansion
///
/// Bytes are decoded as ISO-8859-1, which accepts any input: spec files in
/// the wild are not reliably UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPreprocessor;

impl Preprocessor for RawPreprocessor {
    fn preprocess(&self, path: &Path) -> Result<Vec<String>, PreprocessError> {
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PreprocessError::NotFound(path.to_path_buf())
            } else {
                PreprocessError::IoError(path.to_path_buf(), e)
            }
        })?;
        let text: String = bytes.iter().map(|&b| char::from(b)).collect();
        Ok(split_lines(&text))
    }
}
