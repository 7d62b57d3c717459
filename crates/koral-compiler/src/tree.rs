//! Language-neutral parse tree adapter.
//!
//! Frontends receive their input as a `ParseTree`: an arena of labeled
//! nodes produced by whatever parser generated the concrete syntax. The
//! compiler never sees parser types directly; it only asks for a node's
//! category label, its surface text, and its children.

/// Index of a node in a [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParseId(pub u32);

impl std::fmt::Display for ParseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct ParseNodeData {
    category: String,
    text: String,
    offset: Option<usize>,
    children: Vec<ParseId>,
}

/// Arena of parse nodes with a single designated root.
///
/// An empty tree (no root) is a legal input and compiles to an empty
/// query with a `MalformedQuery` diagnostic.
#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    nodes: Vec<ParseNodeData>,
    root: Option<ParseId>,
}

impl ParseTree {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<ParseId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Category label of a node (`"segment"`, `"relation"`, ...).
    pub fn category(&self, id: ParseId) -> &str {
        &self.nodes[id.0 as usize].category
    }

    /// Surface text carried by a node; empty for pure interior nodes.
    pub fn text(&self, id: ParseId) -> &str {
        &self.nodes[id.0 as usize].text
    }

    /// Byte offset of the node in the original query string, if recorded.
    pub fn offset(&self, id: ParseId) -> Option<usize> {
        self.nodes[id.0 as usize].offset
    }

    pub fn children(&self, id: ParseId) -> &[ParseId] {
        &self.nodes[id.0 as usize].children
    }

    pub fn child_count(&self, id: ParseId) -> usize {
        self.nodes[id.0 as usize].children.len()
    }

    pub fn child(&self, id: ParseId, index: usize) -> Option<ParseId> {
        self.nodes[id.0 as usize].children.get(index).copied()
    }

    /// First child carrying the given category label.
    pub fn child_by_category(&self, id: ParseId, category: &str) -> Option<ParseId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.category(c) == category)
    }

    /// All children carrying the given category label, in order.
    pub fn children_by_category(&self, id: ParseId, category: &str) -> Vec<ParseId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.category(c) == category)
            .collect()
    }
}

/// Builder used by parser adapters to assemble a [`ParseTree`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<ParseNodeData>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, data: ParseNodeData) -> ParseId {
        let id = ParseId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    /// Leaf node with surface text and no children.
    pub fn leaf(&mut self, category: impl Into<String>, text: impl Into<String>) -> ParseId {
        self.alloc(ParseNodeData {
            category: category.into(),
            text: text.into(),
            offset: None,
            children: Vec::new(),
        })
    }

    /// Leaf node with a recorded byte offset into the query string.
    pub fn leaf_at(
        &mut self,
        category: impl Into<String>,
        text: impl Into<String>,
        offset: usize,
    ) -> ParseId {
        self.alloc(ParseNodeData {
            category: category.into(),
            text: text.into(),
            offset: Some(offset),
            children: Vec::new(),
        })
    }

    /// Interior node with children and no surface text.
    pub fn node(&mut self, category: impl Into<String>, children: Vec<ParseId>) -> ParseId {
        self.alloc(ParseNodeData {
            category: category.into(),
            text: String::new(),
            offset: None,
            children,
        })
    }

    /// Interior node that also carries surface text (operator labels etc.).
    pub fn node_with_text(
        &mut self,
        category: impl Into<String>,
        text: impl Into<String>,
        children: Vec<ParseId>,
    ) -> ParseId {
        self.alloc(ParseNodeData {
            category: category.into(),
            text: text.into(),
            offset: None,
            children,
        })
    }

    pub fn build(self, root: ParseId) -> ParseTree {
        ParseTree {
            nodes: self.nodes,
            root: Some(root),
        }
    }
}
