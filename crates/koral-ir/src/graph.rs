//! Arena-backed IR graph and builder constructors.
//!
//! All IR nodes live in a `QueryGraph`; composites refer to operands by
//! `NodeId`. Constructors are the only way frontends create nodes, which
//! guarantees every composite starts with a freshly allocated operand
//! list.

use crate::boundary::Boundary;
use crate::node::{
    GroupOperation, MatchOp, PositionFrame, QueryNode, ReferenceOp, Term, TermRelation,
};

/// Index of a node in a [`QueryGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arena of IR nodes for one compilation.
#[derive(Debug, Clone, Default)]
pub struct QueryGraph {
    nodes: Vec<QueryNode>,
}

impl QueryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &QueryNode {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut QueryNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Drop all nodes (query-level reset after a fatal semantic error).
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    fn alloc(&mut self, node: QueryNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn token(&mut self) -> NodeId {
        self.alloc(QueryNode::Token { wrap: None })
    }

    pub fn span(&mut self) -> NodeId {
        self.alloc(QueryNode::Span { wrap: None })
    }

    pub fn term(&mut self, term: Term) -> NodeId {
        self.alloc(QueryNode::Term(term))
    }

    pub fn term_group(&mut self, relation: TermRelation) -> NodeId {
        self.alloc(QueryNode::TermGroup {
            relation,
            operands: Vec::new(),
        })
    }

    pub fn group(&mut self, operation: GroupOperation) -> NodeId {
        self.alloc(QueryNode::Group {
            operation,
            class_id: None,
            boundary: None,
            distances: Vec::new(),
            operands: Vec::new(),
        })
    }

    /// Repetition group with an attached boundary node.
    pub fn repetition(&mut self, boundary: Boundary) -> NodeId {
        let b = self.boundary(boundary);
        self.alloc(QueryNode::Group {
            operation: GroupOperation::Repetition,
            class_id: None,
            boundary: Some(b),
            distances: Vec::new(),
            operands: Vec::new(),
        })
    }

    pub fn relation(&mut self, kind: Term) -> NodeId {
        self.alloc(QueryNode::Relation {
            kind,
            boundary: None,
            operands: Vec::new(),
        })
    }

    pub fn position(&mut self, frames: Vec<PositionFrame>) -> NodeId {
        self.alloc(QueryNode::Position {
            frames,
            operands: Vec::new(),
        })
    }

    pub fn reference(&mut self, operation: ReferenceOp, class_refs: Vec<u16>) -> NodeId {
        self.alloc(QueryNode::Reference {
            operation,
            class_refs,
            operands: Vec::new(),
        })
    }

    pub fn boundary(&mut self, boundary: Boundary) -> NodeId {
        self.alloc(QueryNode::Boundary(boundary))
    }

    pub fn distance(&mut self, key: impl Into<String>, boundary: Boundary) -> NodeId {
        self.alloc(QueryNode::Distance {
            key: key.into(),
            boundary,
        })
    }

    pub fn doc(&mut self, key: impl Into<String>, value: impl Into<String>, op: MatchOp) -> NodeId {
        self.alloc(QueryNode::Doc {
            key: key.into(),
            value: value.into(),
            match_op: op,
        })
    }

    pub fn doc_group(&mut self, relation: TermRelation) -> NodeId {
        self.alloc(QueryNode::DocGroup {
            relation,
            operands: Vec::new(),
        })
    }

    pub fn empty(&mut self) -> NodeId {
        self.alloc(QueryNode::Empty)
    }

    /// Empty class group carrying `class_id`; operands are attached by the caller.
    pub fn class_group(&mut self, class_id: u16) -> NodeId {
        self.alloc(QueryNode::Group {
            operation: GroupOperation::Class,
            class_id: Some(class_id),
            boundary: None,
            distances: Vec::new(),
            operands: Vec::new(),
        })
    }

    /// Wrap `node` in a class group carrying `class_id`.
    pub fn wrap_in_class(&mut self, node: NodeId, class_id: u16) -> NodeId {
        self.alloc(QueryNode::Group {
            operation: GroupOperation::Class,
            class_id: Some(class_id),
            boundary: None,
            distances: Vec::new(),
            operands: vec![node],
        })
    }

    /// Wrap `node` in a focus reference on `class_id`.
    pub fn wrap_in_focus(&mut self, node: NodeId, class_id: u16) -> NodeId {
        self.alloc(QueryNode::Reference {
            operation: ReferenceOp::Focus,
            class_refs: vec![class_id],
            operands: vec![node],
        })
    }

    /// Append `child` to the operand list of `parent`.
    ///
    /// Returns false (and leaves the graph untouched) when `parent` is a leaf.
    pub fn push_operand(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.nodes[parent.0 as usize].operands_mut() {
            Some(ops) => {
                ops.push(child);
                true
            }
            None => false,
        }
    }

    pub fn operands(&self, id: NodeId) -> &[NodeId] {
        self.node(id).operands().unwrap_or(&[])
    }

    /// Set the `wrap` slot of a token or span node.
    pub fn set_wrap(&mut self, id: NodeId, wrap: NodeId) -> bool {
        match self.node_mut(id) {
            QueryNode::Token { wrap: slot } | QueryNode::Span { wrap: slot } => {
                *slot = Some(wrap);
                true
            }
            _ => false,
        }
    }

    /// Attach a boundary to a group or relation node.
    pub fn set_boundary(&mut self, id: NodeId, boundary: Boundary) -> bool {
        if !matches!(
            self.node(id),
            QueryNode::Group { .. } | QueryNode::Relation { .. }
        ) {
            return false;
        }
        let b = self.boundary(boundary);
        if let QueryNode::Group { boundary: slot, .. }
        | QueryNode::Relation { boundary: slot, .. } = self.node_mut(id)
        {
            *slot = Some(b);
        }
        true
    }

    /// Attach a distance node to a sequence group.
    pub fn add_distance(&mut self, group: NodeId, distance: NodeId) -> bool {
        match self.node_mut(group) {
            QueryNode::Group { distances, .. } => {
                distances.push(distance);
                true
            }
            _ => false,
        }
    }

    /// Peel class wrappers to reach the wrapped content node.
    pub fn resolve_class(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        loop {
            match self.node(cur) {
                QueryNode::Group {
                    operation: GroupOperation::Class,
                    operands,
                    ..
                } if !operands.is_empty() => cur = operands[0],
                _ => return cur,
            }
        }
    }

    /// Dump the subtree under `root` (see [`IrPrinter`](crate::dump::IrPrinter)).
    pub fn dump(&self, root: NodeId) -> String {
        crate::dump::IrPrinter::new(self).dump(root)
    }
}
