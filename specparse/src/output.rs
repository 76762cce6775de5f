//! Serialization of parsed documents

use crate::pipeline::ParsedSpec;
use crate::spec_model::Document;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

/// Output format for parsed documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML, one list entry per spec file
    #[default]
    Yaml,
    /// Pretty-printed JSON array
    Json,
}

/// One serialized spec file
#[derive(Debug, Serialize)]
struct SpecReport<'a> {
    path: String,
    spec: &'a Document,
}

/// Errors raised while serializing documents
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render every successfully parsed spec in `format`
///
/// Failed files are left out; callers report them separately.
pub fn render(specs: &[ParsedSpec], format: OutputFormat) -> Result<String, OutputError> {
    let reports: Vec<SpecReport<'_>> = specs
        .iter()
        .filter_map(|parsed| {
            parsed.result.as_ref().ok().map(|spec| SpecReport {
                path: parsed.path.display().to_string(),
                spec,
            })
        })
        .collect();

    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&reports)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&reports)?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}
