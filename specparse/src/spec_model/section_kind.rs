//! Section kind identifiers

use std::fmt;

/// Kind of a node in the section tree
///
/// The structural kinds (`_root`, `_text`, `if`, `_then`, `_else`) are created
/// by the splitter itself. Section kinds are opened by a `%keyword` line, and
/// directive kinds label bookkeeping subsections for directives that are only
/// meaningful inside another section (e.g. `%doc` inside `%files`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Root,
    Text,
    If,
    Then,
    Else,

    // Sections
    Description,
    Package,
    Prep,
    Build,
    Configure,
    Install,
    Check,
    Clean,
    Pre,
    Preun,
    Post,
    Postun,
    Files,
    Changelog,

    // Directive subsections
    Define,
    Global,
    Setup,
    Patch,
    Attr,
    Config,
    Defattr,
    Dir,
    Doc,
    Docdir,
    Lang,
    Verify,
}

impl SectionKind {
    /// Name of the kind as it appears in the section tree
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Root => "_root",
            SectionKind::Text => "_text",
            SectionKind::If => "if",
            SectionKind::Then => "_then",
            SectionKind::Else => "_else",
            SectionKind::Description => "description",
            SectionKind::Package => "package",
            SectionKind::Prep => "prep",
            SectionKind::Build => "build",
            SectionKind::Configure => "configure",
            SectionKind::Install => "install",
            SectionKind::Check => "check",
            SectionKind::Clean => "clean",
            SectionKind::Pre => "pre",
            SectionKind::Preun => "preun",
            SectionKind::Post => "post",
            SectionKind::Postun => "postun",
            SectionKind::Files => "files",
            SectionKind::Changelog => "changelog",
            SectionKind::Define => "define",
            SectionKind::Global => "global",
            SectionKind::Setup => "setup",
            SectionKind::Patch => "patch",
            SectionKind::Attr => "attr",
            SectionKind::Config => "config",
            SectionKind::Defattr => "defattr",
            SectionKind::Dir => "dir",
            SectionKind::Doc => "doc",
            SectionKind::Docdir => "docdir",
            SectionKind::Lang => "lang",
            SectionKind::Verify => "verify",
        }
    }

    /// True for `_root` and every kind opened by a section keyword
    pub fn is_section(self) -> bool {
        matches!(
            self,
            SectionKind::Root
                | SectionKind::Description
                | SectionKind::Package
                | SectionKind::Prep
                | SectionKind::Build
                | SectionKind::Configure
                | SectionKind::Install
                | SectionKind::Check
                | SectionKind::Clean
                | SectionKind::Pre
                | SectionKind::Preun
                | SectionKind::Post
                | SectionKind::Postun
                | SectionKind::Files
                | SectionKind::Changelog
        )
    }

    /// True for the two branches of a conditional block
    pub fn is_branch(self) -> bool {
        matches!(self, SectionKind::Then | SectionKind::Else)
    }

    /// Nodes that may own a newly opened section: the root and conditional branches
    pub fn is_container(self) -> bool {
        self == SectionKind::Root || self.is_branch()
    }

    /// A scope bounds conditional promotion and the directive rescan
    pub fn is_scope(self) -> bool {
        self.is_section() || self.is_branch()
    }

    /// Kinds that keep raw lines in their own content instead of a `_text` child
    pub fn accumulates_directly(self) -> bool {
        matches!(
            self,
            SectionKind::Text | SectionKind::If | SectionKind::Changelog
        )
    }

    /// Directives that only ever span their own line
    ///
    /// After one of these the cursor stays in the enclosing scope, so the
    /// header lines that usually follow a `%global` remain root text.
    pub fn is_single_line(self) -> bool {
        matches!(self, SectionKind::Define | SectionKind::Global)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_kinds_are_not_sections() {
        for kind in [
            SectionKind::Text,
            SectionKind::If,
            SectionKind::Then,
            SectionKind::Else,
            SectionKind::Doc,
        ] {
            assert!(!kind.is_section(), "{} should not be a section", kind);
        }
        assert!(SectionKind::Root.is_section());
        assert!(SectionKind::Files.is_section());
    }

    #[test]
    fn test_scopes_include_branches() {
        assert!(SectionKind::Then.is_scope());
        assert!(SectionKind::Else.is_scope());
        assert!(!SectionKind::If.is_scope());
        assert!(!SectionKind::Attr.is_scope());
    }

    #[test]
    fn test_names() {
        assert_eq!(SectionKind::Root.to_string(), "_root");
        assert_eq!(SectionKind::Postun.name(), "postun");
    }
}
