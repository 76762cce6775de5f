//! Field extraction from a finished section tree
//!
//! Only the direct children of the root are read: header lines from `_text`
//! nodes, the main package description from a bare `%description`, and
//! changelog headers from `%changelog`. Conditional blocks and subpackage
//! sections are not extracted.

use super::changelog::ChangelogEntry;
use super::document::Document;
use super::error::UnknownFieldError;
use super::package::PackageSource;
use super::section_kind::SectionKind;
use super::section_tree::{NodeId, SectionTree, SourceLine};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// What to do with a header whose key is not a known package field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Fail the whole file with [`UnknownFieldError`]
    #[default]
    Reject,
    /// Log a warning and drop the header
    Skip,
}

fn skip_regex() -> &'static Regex {
    static SKIP: OnceLock<Regex> = OnceLock::new();
    SKIP.get_or_init(|| Regex::new(r"^\s*(#.*|%.*|)$").expect("skip pattern must compile"))
}

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^\s*(?P<key>\w+(?:\([^)]*\))?)\s*:\s*(?P<value>.*?)\s*$")
            .expect("header pattern must compile")
    })
}

/// Split a `Key: value` header line
///
/// The key keeps any parenthesized qualifier, e.g. `Requires(post)`.
pub fn parse_header(line: &str) -> Option<(&str, &str)> {
    if skip_regex().is_match(line) {
        return None;
    }
    let caps = header_regex().captures(line)?;
    Some((
        caps.name("key")?.as_str(),
        caps.name("value").map_or("", |m| m.as_str()),
    ))
}

/// Field name a header key routes to: lower-cased, qualifier removed
pub fn field_name(key: &str) -> String {
    key.split('(').next().unwrap_or(key).to_lowercase()
}

/// Walks a section tree and fills a [`Document`]
pub struct DocumentBuilder {
    policy: UnknownFieldPolicy,
    document: Document,
}

impl DocumentBuilder {
    /// Create a builder with the given unknown-field policy
    pub fn new(policy: UnknownFieldPolicy) -> Self {
        Self {
            policy,
            document: Document::default(),
        }
    }

    /// Extract the document from `tree`
    ///
    /// # Returns
    /// * `Ok(Document)` - All recognized fields and changelog entries
    /// * `Err(UnknownFieldError)` - A header key is unknown and the policy is `Reject`
    pub fn build(mut self, tree: &SectionTree) -> Result<Document, UnknownFieldError> {
        for &child in tree.children(SectionTree::ROOT) {
            let node = tree.node(child);
            match node.kind {
                SectionKind::Text => {
                    for line in &node.content {
                        self.apply_header(line)?;
                    }
                }
                SectionKind::Description if node.args.is_none() => {
                    self.add_description(tree, child);
                }
                SectionKind::Changelog => {
                    self.document.changelog.extend(
                        node.content
                            .iter()
                            .filter_map(|line| ChangelogEntry::parse_header(&line.text)),
                    );
                }
                _ => {}
            }
        }
        Ok(self.document)
    }

    fn apply_header(&mut self, line: &SourceLine) -> Result<(), UnknownFieldError> {
        let Some((key, value)) = parse_header(&line.text) else {
            return Ok(());
        };
        let field = field_name(key);
        let package: &mut PackageSource = &mut self.document.package;

        if field.starts_with("source") {
            package.sources.insert(key.to_string(), value.to_string());
        } else if field.starts_with("patch") {
            package.patches.insert(key.to_string(), value.to_string());
        } else if let Some(list) = package.relation_mut(&field) {
            list.push(value.to_string());
        } else if let Some(scalar) = package.scalar_mut(&field) {
            *scalar = value.to_string();
        } else {
            match self.policy {
                UnknownFieldPolicy::Reject => {
                    return Err(UnknownFieldError {
                        line: line.number,
                        key: key.to_string(),
                    });
                }
                UnknownFieldPolicy::Skip => {
                    log::warn!("line {}: skipping unknown header field '{}'", line.number, key);
                }
            }
        }
        Ok(())
    }

    fn add_description(&mut self, tree: &SectionTree, id: NodeId) {
        // body text lives in `_text` children; conditional blocks are not extracted
        let body: Vec<&str> = tree
            .children(id)
            .iter()
            .filter(|&&child| tree.kind(child) == SectionKind::Text)
            .flat_map(|&child| tree.node(child).content.iter())
            .map(|line| line.text.as_str())
            .collect();
        let start = body.iter().position(|l| !l.trim().is_empty());
        let end = body.iter().rposition(|l| !l.trim().is_empty());
        if let (Some(start), Some(end)) = (start, end) {
            self.document
                .package
                .description
                .extend(body[start..=end].iter().map(|l| l.to_string()));
        }
    }
}
