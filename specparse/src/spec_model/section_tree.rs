//! Arena-backed section tree built by the splitter
//!
//! Nodes live in a single vector and refer to each other by index. Parents
//! own their children through the `children` list; the `parent` field is a
//! plain back-reference, so moving a subtree only rewrites two index lists.

use super::section_kind::SectionKind;

/// Index of a node in a [`SectionTree`]
pub type NodeId = usize;

/// A raw input line together with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the preprocessed input
    pub number: usize,

    /// Line text, trailing whitespace already removed
    pub text: String,
}

impl SourceLine {
    /// Create a new source line
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// One node of the section tree
#[derive(Debug, Clone)]
pub struct SectionNode {
    /// Kind of the node
    pub kind: SectionKind,

    /// Argument string captured from the directive that opened the node
    pub args: Option<String>,

    /// Raw lines owned by this node
    pub content: Vec<SourceLine>,

    /// Child nodes in encounter order
    pub children: Vec<NodeId>,

    /// Parent node, `None` only for the root
    pub parent: Option<NodeId>,
}

impl SectionNode {
    fn new(kind: SectionKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            args: None,
            content: Vec::new(),
            children: Vec::new(),
            parent,
        }
    }
}

/// Nested sections of one spec file
#[derive(Debug, Clone)]
pub struct SectionTree {
    nodes: Vec<SectionNode>,
}

impl Default for SectionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTree {
    /// Index of the `_root` node
    pub const ROOT: NodeId = 0;

    /// Create a tree holding only the `_root` node
    pub fn new() -> Self {
        Self {
            nodes: vec![SectionNode::new(SectionKind::Root, None)],
        }
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> &SectionNode {
        &self.nodes[id]
    }

    /// Kind of a node
    pub fn kind(&self, id: NodeId) -> SectionKind {
        self.nodes[id].kind
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Children of a node in encounter order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Iterate over `id` and its ancestors up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Nearest node (starting at `id` itself) matching `predicate`
    pub fn nearest(&self, id: NodeId, predicate: impl Fn(SectionKind) -> bool) -> Option<NodeId> {
        self.ancestors(id).find(|&n| predicate(self.kind(n)))
    }

    /// Record the directive arguments of a node unless already set
    pub fn set_args(&mut self, id: NodeId, args: Option<String>) {
        let node = &mut self.nodes[id];
        if node.args.is_none() {
            node.args = args;
        }
    }

    /// Create a new child of `parent` and append it to its children
    pub fn new_child(&mut self, parent: NodeId, kind: SectionKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SectionNode::new(kind, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// Return the last child of `parent` if it has `kind`, otherwise create one
    ///
    /// Only the last child is considered: a kind that reappears after
    /// unrelated siblings gets a fresh node.
    pub fn merge_or_create(&mut self, parent: NodeId, kind: SectionKind) -> NodeId {
        match self.nodes[parent].children.last() {
            Some(&last) if self.nodes[last].kind == kind => last,
            _ => self.new_child(parent, kind),
        }
    }

    /// Append a line to the node's own content, bypassing `_text` routing
    pub fn push_content(&mut self, id: NodeId, line: SourceLine) {
        self.nodes[id].content.push(line);
    }

    /// Append a content line, routed through a `_text` child where needed
    ///
    /// Returns the node that received the line.
    pub fn append_content(&mut self, id: NodeId, line: SourceLine) -> NodeId {
        let target = if self.kind(id).accumulates_directly() {
            id
        } else {
            self.merge_or_create(id, SectionKind::Text)
        };
        self.nodes[target].content.push(line);
        target
    }

    /// Detach `id` from its parent and append it to `new_parent`'s children
    pub fn relocate(&mut self, id: NodeId, new_parent: NodeId) {
        debug_assert!(
            !self.ancestors(new_parent).any(|n| n == id),
            "cannot move a node below itself"
        );
        if let Some(old_parent) = self.nodes[id].parent {
            self.nodes[old_parent].children.retain(|&child| child != id);
        }
        self.nodes[new_parent].children.push(id);
        self.nodes[id].parent = Some(new_parent);
    }

    /// Indented outline of the subtree at `id`, one node per line
    pub fn outline(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_outline(id, 0, &mut out);
        out
    }

    fn write_outline(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id];
        out.push_str(&"  ".repeat(depth));
        out.push_str(node.kind.name());
        if let Some(args) = node.args.as_deref().filter(|a| !a.is_empty()) {
            out.push(' ');
            out.push_str(args);
        }
        out.push('\n');
        for &child in &node.children {
            self.write_outline(child, depth + 1, out);
        }
    }
}

/// Iterator over a node and its ancestors
pub struct Ancestors<'a> {
    tree: &'a SectionTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
