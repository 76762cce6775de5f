//! Section splitter
//!
//! Consumes preprocessed spec lines one at a time and grows a [`SectionTree`].
//! The splitter keeps a cursor on the node that receives plain content. A
//! directive line either opens a section under the nearest container, opens
//! a bookkeeping subsection under the section whose directive table matched,
//! or drives the `%if`/`%else`/`%endif` state.
//!
//! # Conditional promotion
//! An `%if` opened while the cursor sits inside a bookkeeping subsection
//! (e.g. between two `%doc` lines of `%files`) is first attached to that
//! subsection. Its real scope, the nearest section or conditional branch
//! above it, is remembered and the whole block is moved there once its
//! `%endif` is seen, so a conditional never splits the section it straddles.
//! The moved block becomes a direct child of that section (e.g. `files`),
//! not of the section's `_text` node.

use super::classifier::{Classification, Conditional, LineClassifier, Placement};
use super::error::StructuralError;
use super::section_kind::SectionKind;
use super::section_tree::{NodeId, SectionTree, SourceLine};
use std::collections::HashMap;

/// Split preprocessed lines into a section tree
///
/// # Parameters
/// * `lines` - Spec file lines in order, trailing whitespace already removed
///
/// # Returns
/// * `Ok(SectionTree)` - The finished tree rooted at `_root`
/// * `Err(StructuralError)` - Unbalanced `%if`/`%else`/`%endif`
pub fn split_sections<S: AsRef<str>>(lines: &[S]) -> Result<SectionTree, StructuralError> {
    let mut splitter = SectionSplitter::new(LineClassifier::shared());
    for (index, line) in lines.iter().enumerate() {
        splitter.feed(SourceLine::new(index + 1, line.as_ref()))?;
    }
    splitter.finish()
}

/// Incremental splitter state for one spec file
pub struct SectionSplitter<'c> {
    classifier: &'c LineClassifier,
    tree: SectionTree,
    cursor: NodeId,
    /// Open `%if` nodes that must move to another scope at `%endif`
    promotions: HashMap<NodeId, NodeId>,
}

impl<'c> SectionSplitter<'c> {
    /// Create a splitter whose cursor is the root's `_text` child
    pub fn new(classifier: &'c LineClassifier) -> Self {
        let mut tree = SectionTree::new();
        let cursor = tree.new_child(SectionTree::ROOT, SectionKind::Text);
        Self {
            classifier,
            tree,
            cursor,
            promotions: HashMap::new(),
        }
    }

    /// Process the next line
    pub fn feed(&mut self, line: SourceLine) -> Result<(), StructuralError> {
        if line.text.trim().is_empty() || !self.classifier.is_directive(&line.text) {
            self.tree.append_content(self.cursor, line);
            return Ok(());
        }

        match self.classifier.conditional(&line.text) {
            Some(Conditional::If(args)) => self.open_if(line, args),
            Some(Conditional::Else) => self.open_else(line)?,
            Some(Conditional::Endif) => self.close_if(line)?,
            None => self.open_directive(line),
        }
        Ok(())
    }

    /// Finish splitting and hand out the tree
    pub fn finish(self) -> Result<SectionTree, StructuralError> {
        if let Some(open) = self.enclosing_if() {
            let line = self.tree.node(open).content.first().map_or(0, |l| l.number);
            return Err(StructuralError::UnterminatedConditional { line });
        }
        log::trace!("section tree:\n{}", self.tree.outline(SectionTree::ROOT));
        Ok(self.tree)
    }

    fn enclosing_if(&self) -> Option<NodeId> {
        self.tree.nearest(self.cursor, |kind| kind == SectionKind::If)
    }

    fn open_if(&mut self, line: SourceLine, args: Option<String>) {
        let host = self
            .tree
            .nearest(self.cursor, |kind| kind != SectionKind::Text)
            .unwrap_or(SectionTree::ROOT);
        let scope = self
            .tree
            .nearest(host, SectionKind::is_scope)
            .unwrap_or(SectionTree::ROOT);

        let node = self.tree.new_child(host, SectionKind::If);
        self.tree.set_args(node, args);
        self.tree.push_content(node, line);
        if scope != host {
            self.promotions.insert(node, scope);
        }
        self.cursor = self.tree.new_child(node, SectionKind::Then);
    }

    fn open_else(&mut self, line: SourceLine) -> Result<(), StructuralError> {
        let node = self
            .enclosing_if()
            .ok_or(StructuralError::ElseWithoutIf { line: line.number })?;
        self.tree.push_content(node, line);
        self.cursor = self.tree.merge_or_create(node, SectionKind::Else);
        Ok(())
    }

    fn close_if(&mut self, line: SourceLine) -> Result<(), StructuralError> {
        let node = self
            .enclosing_if()
            .ok_or(StructuralError::EndifWithoutIf { line: line.number })?;
        let number = line.number;
        self.tree.push_content(node, line);

        if let Some(scope) = self.promotions.remove(&node) {
            log::debug!(
                "line {}: moving conditional block into enclosing {}",
                number,
                self.tree.kind(scope)
            );
            self.tree.relocate(node, scope);
        }
        self.cursor = self.tree.parent(node).unwrap_or(SectionTree::ROOT);
        Ok(())
    }

    /// Find the node a directive line opens and where it attaches
    ///
    /// Directive tables are tried from the cursor outward until a true
    /// section has been checked. A match found beyond a conditional branch is
    /// attached to that branch instead, keeping it inside the conditional.
    fn resolve(&self, text: &str) -> Option<(NodeId, Classification)> {
        let mut branch = None;
        for node in self.tree.ancestors(self.cursor) {
            let kind = self.tree.kind(node);
            if let Some(found) = self.classifier.scoped(text, kind) {
                return Some((branch.unwrap_or(node), found));
            }
            if kind.is_branch() && branch.is_none() {
                branch = Some(node);
            }
            if kind.is_section() {
                break;
            }
        }

        let found = self.classifier.opener(text)?;
        let container = self
            .tree
            .nearest(self.cursor, SectionKind::is_container)
            .unwrap_or(SectionTree::ROOT);
        Some((container, found))
    }

    fn open_directive(&mut self, line: SourceLine) {
        let Some((parent, found)) = self.resolve(&line.text) else {
            // unknown macros are ordinary content
            self.tree.append_content(self.cursor, line);
            return;
        };

        let node = match found.placement {
            Placement::Scoped => self.tree.merge_or_create(parent, found.kind),
            Placement::TopLevel => self.tree.new_child(parent, found.kind),
        };
        log::debug!(
            "line {}: {} opens {} under {}",
            line.number,
            line.text,
            found.kind,
            self.tree.kind(parent)
        );
        self.tree.set_args(node, found.args);
        self.tree.push_content(node, line);

        // free lines that follow reach the node's `_text` child through content routing
        self.cursor = if found.kind.is_single_line() {
            parent
        } else {
            node
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_kinds(tree: &SectionTree, id: NodeId) -> Vec<SectionKind> {
        tree.children(id).iter().map(|&c| tree.kind(c)).collect()
    }

    fn child(tree: &SectionTree, id: NodeId, index: usize) -> NodeId {
        tree.children(id)[index]
    }

    fn texts(tree: &SectionTree, id: NodeId) -> Vec<&str> {
        tree.node(id).content.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_sections_split_at_directives() {
        let lines = [
            "Name: foo",
            "Version: 1.0",
            "",
            "%description",
            "A tool.",
            "%prep",
            "%setup -q",
            "%build",
            "make",
            "%files",
            "%doc README",
            "/usr/bin/foo",
            "%changelog",
            "* Mon Jan 1 2020 Jane Doe <jane@example.com> - 1.0-1",
            "- first",
        ];
        let tree = split_sections(&lines).unwrap();
        let root = SectionTree::ROOT;
        use SectionKind::*;
        assert_eq!(
            child_kinds(&tree, root),
            vec![Text, Description, Prep, Build, Files, Changelog]
        );

        let header = child(&tree, root, 0);
        assert_eq!(texts(&tree, header), vec!["Name: foo", "Version: 1.0", ""]);

        let description = child(&tree, root, 1);
        assert_eq!(texts(&tree, description), vec!["%description"]);
        assert_eq!(texts(&tree, child(&tree, description, 0)), vec!["A tool."]);

        let prep = child(&tree, root, 2);
        assert_eq!(child_kinds(&tree, prep), vec![Setup]);
        let setup = child(&tree, prep, 0);
        assert_eq!(tree.node(setup).args.as_deref(), Some("-q"));

        let build = child(&tree, root, 3);
        assert_eq!(texts(&tree, child(&tree, build, 0)), vec!["make"]);

        let files = child(&tree, root, 4);
        assert_eq!(child_kinds(&tree, files), vec![Doc]);
        let doc = child(&tree, files, 0);
        assert_eq!(texts(&tree, doc), vec!["%doc README"]);
        assert_eq!(texts(&tree, child(&tree, doc, 0)), vec!["/usr/bin/foo"]);

        let changelog = child(&tree, root, 5);
        assert_eq!(tree.node(changelog).content.len(), 3);
        assert!(tree.children(changelog).is_empty());
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let tree = split_sections(&["Name: foo", "%build"]).unwrap();
        let header = child(&tree, SectionTree::ROOT, 0);
        assert_eq!(tree.node(header).content[0].number, 1);
        let build = child(&tree, SectionTree::ROOT, 1);
        assert_eq!(tree.node(build).content[0].number, 2);
    }

    #[test]
    fn test_consecutive_directives_merge() {
        let lines = ["%files", "%doc README", "%doc COPYING", "%dir /etc/foo", "%doc NEWS"];
        let tree = split_sections(&lines).unwrap();
        let files = child(&tree, SectionTree::ROOT, 1);
        use SectionKind::*;
        assert_eq!(child_kinds(&tree, files), vec![Doc, Dir, Doc]);
        let doc = child(&tree, files, 0);
        assert_eq!(texts(&tree, doc), vec!["%doc README", "%doc COPYING"]);
        assert_eq!(tree.node(doc).args.as_deref(), Some("README"));
    }

    #[test]
    fn test_repeated_sections_do_not_merge() {
        let lines = ["%files", "/usr/bin/foo", "%files devel", "/usr/include/foo.h"];
        let tree = split_sections(&lines).unwrap();
        use SectionKind::*;
        assert_eq!(child_kinds(&tree, SectionTree::ROOT), vec![Text, Files, Files]);
        let devel = child(&tree, SectionTree::ROOT, 2);
        assert_eq!(tree.node(devel).args.as_deref(), Some("devel"));
    }

    #[test]
    fn test_top_level_conditional() {
        let lines = [
            "Name: foo",
            "%if 0%{?rhel}",
            "Requires: a",
            "%else",
            "Requires: b",
            "%endif",
            "BuildRequires: c",
        ];
        let tree = split_sections(&lines).unwrap();
        let root = SectionTree::ROOT;
        use SectionKind::*;
        assert_eq!(child_kinds(&tree, root), vec![Text, If, Text]);

        let cond = child(&tree, root, 1);
        assert_eq!(tree.node(cond).args.as_deref(), Some("0%{?rhel}"));
        assert_eq!(texts(&tree, cond), vec!["%if 0%{?rhel}", "%else", "%endif"]);
        assert_eq!(child_kinds(&tree, cond), vec![Then, Else]);

        let then = child(&tree, cond, 0);
        assert_eq!(texts(&tree, child(&tree, then, 0)), vec!["Requires: a"]);
        let otherwise = child(&tree, cond, 1);
        assert_eq!(texts(&tree, child(&tree, otherwise, 0)), vec!["Requires: b"]);

        assert_eq!(texts(&tree, child(&tree, root, 2)), vec!["BuildRequires: c"]);
    }

    #[test]
    fn test_conditional_between_doc_lines_is_promoted() {
        let lines = [
            "%files",
            "%doc README",
            "%if %{with docs}",
            "%doc manual.pdf",
            "%else",
            "%doc manual.txt",
            "%endif",
            "%doc NEWS",
        ];
        let tree = split_sections(&lines).unwrap();
        use SectionKind::*;
        let files = child(&tree, SectionTree::ROOT, 1);
        assert_eq!(child_kinds(&tree, files), vec![Doc, If, Doc]);

        // the first doc node is left intact and holds nothing of the conditional
        let first_doc = child(&tree, files, 0);
        assert_eq!(texts(&tree, first_doc), vec!["%doc README"]);
        assert!(tree.children(first_doc).is_empty());

        let cond = child(&tree, files, 1);
        assert_eq!(tree.parent(cond), Some(files));
        let then = child(&tree, cond, 0);
        let otherwise = child(&tree, cond, 1);
        assert_eq!(child_kinds(&tree, then), vec![Doc]);
        assert_eq!(texts(&tree, child(&tree, then, 0)), vec!["%doc manual.pdf"]);
        assert_eq!(child_kinds(&tree, otherwise), vec![Doc]);
        assert_eq!(texts(&tree, child(&tree, otherwise, 0)), vec!["%doc manual.txt"]);

        assert_eq!(texts(&tree, child(&tree, files, 2)), vec!["%doc NEWS"]);
    }

    #[test]
    fn test_conditional_inside_prep_is_promoted_to_prep() {
        let lines = ["%prep", "%setup -q", "%if 0%{?fedora}", "%patch0 -p1", "%endif", "make"];
        let tree = split_sections(&lines).unwrap();
        use SectionKind::*;
        let prep = child(&tree, SectionTree::ROOT, 1);
        assert_eq!(child_kinds(&tree, prep), vec![Setup, If, Text]);
        let cond = child(&tree, prep, 1);
        let then = child(&tree, cond, 0);
        assert_eq!(child_kinds(&tree, then), vec![Patch]);
        assert_eq!(texts(&tree, child(&tree, prep, 2)), vec!["make"]);
    }

    #[test]
    fn test_nested_conditionals_resolve_innermost() {
        let lines = [
            "%if a", "%if b", "x", "%else", "y", "%endif", "%else", "z", "%endif",
        ];
        let tree = split_sections(&lines).unwrap();
        use SectionKind::*;
        let root = SectionTree::ROOT;
        assert_eq!(child_kinds(&tree, root), vec![Text, If]);

        let outer = child(&tree, root, 1);
        assert_eq!(texts(&tree, outer), vec!["%if a", "%else", "%endif"]);
        assert_eq!(child_kinds(&tree, outer), vec![Then, Else]);

        let outer_then = child(&tree, outer, 0);
        assert_eq!(child_kinds(&tree, outer_then), vec![If]);
        let inner = child(&tree, outer_then, 0);
        assert_eq!(texts(&tree, inner), vec!["%if b", "%else", "%endif"]);
        let inner_else = child(&tree, inner, 1);
        assert_eq!(texts(&tree, child(&tree, inner_else, 0)), vec!["y"]);

        let outer_else = child(&tree, outer, 1);
        assert_eq!(texts(&tree, child(&tree, outer_else, 0)), vec!["z"]);
    }

    #[test]
    fn test_nested_conditional_in_files_stays_in_branch() {
        let lines = [
            "%files",
            "%doc README",
            "%if a",
            "%doc A",
            "%if b",
            "%doc B",
            "%endif",
            "%endif",
        ];
        let tree = split_sections(&lines).unwrap();
        use SectionKind::*;
        let files = child(&tree, SectionTree::ROOT, 1);
        assert_eq!(child_kinds(&tree, files), vec![Doc, If]);
        let outer_then = child(&tree, child(&tree, files, 1), 0);
        // the inner block is moved out of the doc node but not out of the branch
        assert_eq!(child_kinds(&tree, outer_then), vec![Doc, If]);
    }

    #[test]
    fn test_promoted_conditional_carries_nested_section() {
        let lines = [
            "%files",
            "%doc README",
            "%if a",
            "%files devel",
            "/x",
            "%endif",
            "%doc NEWS",
        ];
        let tree = split_sections(&lines).unwrap();
        use SectionKind::*;
        let files = child(&tree, SectionTree::ROOT, 1);
        assert_eq!(child_kinds(&tree, files), vec![Doc, If, Doc]);
        assert!(tree.children(child(&tree, files, 0)).is_empty());

        let cond = child(&tree, files, 1);
        let then = child(&tree, cond, 0);
        assert_eq!(child_kinds(&tree, then), vec![Files]);
        let devel = child(&tree, then, 0);
        assert_eq!(tree.node(devel).args.as_deref(), Some("devel"));
        assert_eq!(texts(&tree, child(&tree, devel, 0)), vec!["/x"]);

        assert_eq!(texts(&tree, child(&tree, files, 2)), vec!["%doc NEWS"]);
    }

    #[test]
    fn test_section_opened_inside_branch() {
        let lines = [
            "%if %{with devel}",
            "%files devel",
            "/usr/include/foo.h",
            "%endif",
            "%changelog",
        ];
        let tree = split_sections(&lines).unwrap();
        use SectionKind::*;
        let root = SectionTree::ROOT;
        assert_eq!(child_kinds(&tree, root), vec![Text, If, Changelog]);
        let then = child(&tree, child(&tree, root, 1), 0);
        assert_eq!(child_kinds(&tree, then), vec![Files]);
    }

    #[test]
    fn test_global_macros_keep_headers_at_root() {
        let lines = ["%global debug_package %{nil}", "Name: foo"];
        let tree = split_sections(&lines).unwrap();
        use SectionKind::*;
        let root = SectionTree::ROOT;
        assert_eq!(child_kinds(&tree, root), vec![Text, Global, Text]);
        assert_eq!(texts(&tree, child(&tree, root, 2)), vec!["Name: foo"]);
    }

    #[test]
    fn test_unknown_macros_are_content() {
        let lines = ["%build", "%configure_wrapper", "%make_build"];
        let tree = split_sections(&lines).unwrap();
        let build = child(&tree, SectionTree::ROOT, 1);
        assert_eq!(
            texts(&tree, child(&tree, build, 0)),
            vec!["%configure_wrapper", "%make_build"]
        );
    }

    #[test]
    fn test_subpackage_description_belongs_to_package() {
        let lines = ["%package devel", "Summary: headers", "%description devel", "Headers."];
        let tree = split_sections(&lines).unwrap();
        use SectionKind::*;
        let package = child(&tree, SectionTree::ROOT, 1);
        assert_eq!(child_kinds(&tree, package), vec![Text, Description]);
        let description = child(&tree, package, 1);
        assert_eq!(texts(&tree, child(&tree, description, 0)), vec!["Headers."]);
    }

    #[test]
    fn test_else_without_if() {
        let err = split_sections(&["Name: foo", "%else"]).unwrap_err();
        assert_eq!(err, StructuralError::ElseWithoutIf { line: 2 });
    }

    #[test]
    fn test_endif_without_if() {
        let err = split_sections(&["%if a", "%endif", "%endif"]).unwrap_err();
        assert_eq!(err, StructuralError::EndifWithoutIf { line: 3 });
    }

    #[test]
    fn test_unterminated_if() {
        let err = split_sections(&["Name: foo", "%if a", "x"]).unwrap_err();
        assert_eq!(err, StructuralError::UnterminatedConditional { line: 2 });
    }
}
