//! Parsed spec document

use super::changelog::ChangelogEntry;
use super::package::PackageSource;
use serde::Serialize;

/// Everything extracted from one spec file
///
/// Serializes as the package fields followed by a `changelog` list that
/// keeps encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Main package metadata
    #[serde(flatten)]
    pub package: PackageSource,

    /// Changelog entries in the order they appear in the file
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changelog: Vec<ChangelogEntry>,
}
