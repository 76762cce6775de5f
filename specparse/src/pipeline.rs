//! Spec file processing pipeline
//!
//! This module ties the stages of processing one or more spec files together:
//! 1. **Discovery**: find spec files below a path
//! 2. **Preprocessing**: expand macros and materialize each file's lines
//! 3. **Parsing**: split the lines into sections and build the document
//!
//! Files are independent of each other; a failure in one is reported in its
//! [`ParsedSpec`] and never stops the others.

use crate::preprocess::{PreprocessError, Preprocessor};
use crate::spec_model::{self, Document, SpecError, UnknownFieldPolicy};
use crate::walker::{self, WalkerError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of parsing one spec file
#[derive(Debug)]
pub struct ParsedSpec {
    /// Path of the spec file
    pub path: PathBuf,

    /// The document, or why this file could not be parsed
    pub result: Result<Document, ParseError>,
}

impl ParsedSpec {
    /// True when the file parsed without error
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Parse preprocessed lines into a document
///
/// # Parameters
/// * `lines` - Lines of one spec file, already macro-expanded
/// * `policy` - How headers with unknown keys are handled
///
/// # Returns
/// * `Ok(Document)` - Successfully parsed document
/// * `Err(SpecError)` - Structural error or rejected header
pub fn parse_lines<S: AsRef<str>>(
    lines: &[S],
    policy: UnknownFieldPolicy,
) -> Result<Document, SpecError> {
    spec_model::parse_lines(lines, policy)
}

/// Preprocess and parse a single spec file
///
/// # Parameters
/// * `path` - Path to the spec file
/// * `preprocessor` - Produces the file's lines
/// * `policy` - How headers with unknown keys are handled
///
/// # Returns
/// * `Ok(Document)` - Successfully parsed document
/// * `Err(ParseError)` - Preprocessing failed or the content could not be parsed
pub fn parse_file(
    path: &Path,
    preprocessor: &dyn Preprocessor,
    policy: UnknownFieldPolicy,
) -> Result<Document, ParseError> {
    let lines = preprocessor.preprocess(path)?;
    let document =
        parse_lines(&lines, policy).map_err(|e| ParseError::SpecError(path.to_path_buf(), e))?;
    log::info!(
        "parsed {} ({} lines, {} changelog entries)",
        path.display(),
        lines.len(),
        document.changelog.len()
    );
    Ok(document)
}

/// Discover and parse every spec file below `root`
///
/// # Parameters
/// * `root` - A spec file or a directory to search for `*.spec` files
/// * `preprocessor` - Produces each file's lines
/// * `policy` - How headers with unknown keys are handled
///
/// # Returns
/// * `Ok(Vec<ParsedSpec>)` - One entry per discovered file, in discovery order
/// * `Err(ParseError)` - The path could not be searched
pub fn parse_path(
    root: &Path,
    preprocessor: &dyn Preprocessor,
    policy: UnknownFieldPolicy,
) -> Result<Vec<ParsedSpec>, ParseError> {
    let paths = walker::discover_specs(root)
        .map_err(|e| ParseError::DiscoveryError(root.to_path_buf(), e))?;

    let parse_one = |path: &PathBuf| {
        let result = parse_file(path, preprocessor, policy);
        if let Err(e) = &result {
            log::warn!("{}", e);
        }
        ParsedSpec {
            path: path.clone(),
            result,
        }
    };

    // Parse spec files (optionally in parallel)
    #[cfg(feature = "parallel")]
    let specs: Vec<ParsedSpec> = paths.par_iter().map(parse_one).collect();

    #[cfg(not(feature = "parallel"))]
    let specs: Vec<ParsedSpec> = paths.iter().map(parse_one).collect();

    Ok(specs)
}

/// Parsing errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot search {path}: {source}", path = .0.display(), source = .1)]
    DiscoveryError(PathBuf, #[source] WalkerError),

    #[error("Preprocessing failed: {0}")]
    PreprocessError(#[from] PreprocessError),

    #[error("Error parsing {path}: {source}", path = .0.display(), source = .1)]
    SpecError(PathBuf, #[source] SpecError),
}
