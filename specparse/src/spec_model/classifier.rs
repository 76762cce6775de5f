//! Directive line recognition
//!
//! Every pattern is anchored at the start of the line and case-sensitive on
//! the macro keyword. Patterns are compiled once and shared by all parses.

use super::section_kind::SectionKind;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Where a recognized directive attaches in the section tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Bookkeeping subsection owned by the section whose table matched
    Scoped,
    /// New section owned by the nearest container
    TopLevel,
}

/// A recognized section-opening directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Kind of node the directive opens
    pub kind: SectionKind,
    /// Trimmed argument text after the keyword, `None` when empty
    pub args: Option<String>,
    /// How the node is attached
    pub placement: Placement,
}

/// A line of the `%if` family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conditional {
    /// `%if`, `%ifarch`, `%ifnarch`, `%ifos` or `%ifnos` with its condition
    If(Option<String>),
    /// `%else`
    Else,
    /// `%endif`
    Endif,
}

struct Pattern {
    kind: SectionKind,
    regex: Regex,
}

impl Pattern {
    fn keyword(kind: SectionKind, keyword: &str) -> Self {
        Self::new(kind, &format!(r"^%{keyword}\b(?P<args>.*?)\s*$"))
    }

    fn new(kind: SectionKind, pattern: &str) -> Self {
        Self {
            kind,
            regex: Regex::new(pattern).expect("directive pattern must compile"),
        }
    }

    fn capture(&self, line: &str) -> Option<Option<String>> {
        let caps = self.regex.captures(line)?;
        Some(
            caps.name("args")
                .map(|m| m.as_str().trim())
                .filter(|args| !args.is_empty())
                .map(str::to_string),
        )
    }
}

/// Recognizes directive lines and maps them to section kinds
pub struct LineClassifier {
    directive: Regex,
    cond_if: Regex,
    cond_else: Regex,
    cond_endif: Regex,
    openers: Vec<Pattern>,
    scoped: HashMap<SectionKind, Vec<Pattern>>,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    /// Compile all directive patterns
    pub fn new() -> Self {
        let openers = [
            (SectionKind::Description, "description"),
            (SectionKind::Package, "package"),
            (SectionKind::Prep, "prep"),
            (SectionKind::Build, "build"),
            (SectionKind::Configure, "configure"),
            (SectionKind::Install, "install"),
            (SectionKind::Check, "check"),
            (SectionKind::Clean, "clean"),
            (SectionKind::Pre, "pre"),
            (SectionKind::Preun, "preun"),
            (SectionKind::Post, "post"),
            (SectionKind::Postun, "postun"),
            (SectionKind::Files, "files"),
            (SectionKind::Changelog, "changelog"),
        ]
        .into_iter()
        .map(|(kind, keyword)| Pattern::keyword(kind, keyword))
        .collect();

        let mut scoped = HashMap::new();
        scoped.insert(
            SectionKind::Root,
            vec![
                Pattern::keyword(SectionKind::Define, "define"),
                Pattern::keyword(SectionKind::Global, "global"),
            ],
        );
        // `%description NAME` belongs to the subpackage it follows
        scoped.insert(
            SectionKind::Package,
            vec![Pattern::new(
                SectionKind::Description,
                r"^%description\s+(?P<args>.*?)\s*$",
            )],
        );
        scoped.insert(
            SectionKind::Prep,
            vec![
                Pattern::keyword(SectionKind::Setup, "setup"),
                Pattern::new(SectionKind::Patch, r"^%patch(?P<args>\d*\b.*?)\s*$"),
            ],
        );
        scoped.insert(
            SectionKind::Files,
            [
                (SectionKind::Attr, "attr"),
                (SectionKind::Config, "config"),
                (SectionKind::Defattr, "defattr"),
                (SectionKind::Dir, "dir"),
                (SectionKind::Doc, "doc"),
                (SectionKind::Docdir, "docdir"),
                (SectionKind::Lang, "lang"),
                (SectionKind::Verify, "verify"),
            ]
            .into_iter()
            .map(|(kind, keyword)| Pattern::keyword(kind, keyword))
            .collect(),
        );

        Self {
            directive: Regex::new(r"^%\w").expect("directive pattern must compile"),
            cond_if: Regex::new(r"^%(?:if|ifarch|ifnarch|ifos|ifnos)\b(?P<args>.*?)\s*$")
                .expect("conditional pattern must compile"),
            cond_else: Regex::new(r"^%else\b").expect("conditional pattern must compile"),
            cond_endif: Regex::new(r"^%endif\b").expect("conditional pattern must compile"),
            openers,
            scoped,
        }
    }

    /// Process-wide classifier instance
    pub fn shared() -> &'static LineClassifier {
        static CLASSIFIER: OnceLock<LineClassifier> = OnceLock::new();
        CLASSIFIER.get_or_init(LineClassifier::new)
    }

    /// True when the line starts with a macro sigil followed by a word character
    pub fn is_directive(&self, line: &str) -> bool {
        self.directive.is_match(line)
    }

    /// Recognize `%if`/`%else`/`%endif`, independent of the open section
    pub fn conditional(&self, line: &str) -> Option<Conditional> {
        if let Some(caps) = self.cond_if.captures(line) {
            let args = caps
                .name("args")
                .map(|m| m.as_str().trim())
                .filter(|a| !a.is_empty())
                .map(str::to_string);
            return Some(Conditional::If(args));
        }
        if self.cond_else.is_match(line) {
            return Some(Conditional::Else);
        }
        if self.cond_endif.is_match(line) {
            return Some(Conditional::Endif);
        }
        None
    }

    /// Match the directives that are only valid inside `context`
    pub fn scoped(&self, line: &str, context: SectionKind) -> Option<Classification> {
        self.scoped
            .get(&context)?
            .iter()
            .find_map(|p| p.capture(line).map(|args| (p.kind, args)))
            .map(|(kind, args)| Classification {
                kind,
                args,
                placement: Placement::Scoped,
            })
    }

    /// Match a section keyword, valid in any context
    pub fn opener(&self, line: &str) -> Option<Classification> {
        self.openers
            .iter()
            .find_map(|p| p.capture(line).map(|args| (p.kind, args)))
            .map(|(kind, args)| Classification {
                kind,
                args,
                placement: Placement::TopLevel,
            })
    }

    /// Classify a line against the section currently open
    ///
    /// Directives scoped to `context` win over section keywords.
    pub fn classify(&self, line: &str, context: SectionKind) -> Option<Classification> {
        self.scoped(line, context).or_else(|| self.opener(line))
    }
}
