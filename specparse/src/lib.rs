//! specparse - RPM spec file metadata extraction
//!
//! Converts RPM `.spec` build descriptors into structured documents:
//! package metadata, sources and patches, dependency relations and the
//! changelog.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod config;
pub mod output;
pub mod pipeline;
pub mod preprocess;
pub mod spec_model;
pub mod walker;

pub use config::ParserConfig;
pub use pipeline::{parse_file, parse_lines, parse_path, ParseError, ParsedSpec};
pub use spec_model::{ChangelogEntry, Document, PackageSource, UnknownFieldPolicy};
