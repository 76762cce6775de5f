//! Spec file model and the two-phase text-to-tree parser
//!
//! Parsing runs in two stages:
//! 1. **Splitting**: preprocessed lines are segmented into a tree of
//!    sections, with `%if` blocks attached to their enclosing scope
//! 2. **Building**: the top-level sections of the tree are read into a
//!    typed [`Document`]

// Submodules
mod builder;
mod changelog;
mod classifier;
mod document;
mod error;
mod package;
mod section_kind;
mod section_tree;
mod splitter;

// Re-export public types
pub use builder::{field_name, parse_header, DocumentBuilder, UnknownFieldPolicy};
pub use changelog::ChangelogEntry;
pub use classifier::{Classification, Conditional, LineClassifier, Placement};
pub use document::Document;
pub use error::{SpecError, StructuralError, UnknownFieldError};
pub use package::PackageSource;
pub use section_kind::SectionKind;
pub use section_tree::{NodeId, SectionNode, SectionTree, SourceLine};
pub use splitter::{split_sections, SectionSplitter};

/// Parse preprocessed spec lines into a document
///
/// # Parameters
/// * `lines` - Lines of one spec file, trailing whitespace removed
/// * `policy` - How headers with unknown keys are handled
///
/// # Returns
/// * `Ok(Document)` - The extracted metadata and changelog
/// * `Err(SpecError)` - Unbalanced conditionals or a rejected header; no
///   partial document is produced
pub fn parse_lines<S: AsRef<str>>(
    lines: &[S],
    policy: UnknownFieldPolicy,
) -> Result<Document, SpecError> {
    let tree = split_sections(lines)?;
    let document = DocumentBuilder::new(policy).build(&tree)?;
    Ok(document)
}
