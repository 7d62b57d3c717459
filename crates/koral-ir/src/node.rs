//! The closed `QueryNode` sum type.
//!
//! Every IR shape the frontends can produce is a variant here. Composite
//! variants own their operand lists exclusively; sharing between siblings
//! is expressed with `Reference` nodes, never by aliasing.

use serde::Serialize;

use crate::boundary::Boundary;
use crate::graph::NodeId;

/// Match comparison for a term or document constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOp {
    #[serde(rename = "match:eq")]
    Eq,
    #[serde(rename = "match:ne")]
    Ne,
}

/// Boolean connective inside a term group or document group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TermRelation {
    #[serde(rename = "relation:and")]
    And,
    #[serde(rename = "relation:or")]
    Or,
}

/// Operation carried by a `Group` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupOperation {
    #[serde(rename = "operation:sequence")]
    Sequence,
    #[serde(rename = "operation:or")]
    Or,
    #[serde(rename = "operation:class")]
    Class,
    #[serde(rename = "operation:repetition")]
    Repetition,
}

/// Operation carried by a `Reference` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferenceOp {
    #[serde(rename = "operation:focus")]
    Focus,
    #[serde(rename = "operation:split")]
    Split,
}

/// Positional frame for `Position` groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PositionFrame {
    #[serde(rename = "frames:isAround")]
    IsAround,
    #[serde(rename = "frames:isWithin")]
    IsWithin,
    #[serde(rename = "frames:startsWith")]
    StartsWith,
    #[serde(rename = "frames:endsWith")]
    EndsWith,
    #[serde(rename = "frames:overlapsLeft")]
    OverlapsLeft,
    #[serde(rename = "frames:overlapsRight")]
    OverlapsRight,
    #[serde(rename = "frames:matches")]
    Matches,
}

/// A single annotation constraint: `foundry/layer=key` with a match op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub foundry: Option<String>,
    pub layer: Option<String>,
    pub key: String,
    pub value: Option<String>,
    pub match_op: MatchOp,
}

impl Term {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            foundry: None,
            layer: None,
            key: key.into(),
            value: None,
            match_op: MatchOp::Eq,
        }
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn with_foundry(mut self, foundry: impl Into<String>) -> Self {
        self.foundry = Some(foundry.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_match(mut self, op: MatchOp) -> Self {
        self.match_op = op;
        self
    }
}

/// A node in the KoralQuery IR graph.
///
/// Operands are arena indices into the owning [`QueryGraph`](crate::graph::QueryGraph);
/// every composite gets its own freshly allocated operand vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// A token position, optionally constrained by a wrapped term or term group.
    Token { wrap: Option<NodeId> },
    /// A span (element) annotation, optionally constrained by a wrapped term.
    Span { wrap: Option<NodeId> },
    /// A leaf annotation constraint.
    Term(Term),
    /// Boolean combination of terms inside a single token/span.
    TermGroup {
        relation: TermRelation,
        operands: Vec<NodeId>,
    },
    /// Generic group: sequence, disjunction, class wrapper, or repetition.
    Group {
        operation: GroupOperation,
        class_id: Option<u16>,
        boundary: Option<NodeId>,
        distances: Vec<NodeId>,
        operands: Vec<NodeId>,
    },
    /// Typed binary relation between two operands (dominance, precedence, pointing).
    Relation {
        kind: Term,
        boundary: Option<NodeId>,
        operands: Vec<NodeId>,
    },
    /// Positional constraint between two operands.
    Position {
        frames: Vec<PositionFrame>,
        operands: Vec<NodeId>,
    },
    /// Pointer at one or more previously assigned classes.
    Reference {
        operation: ReferenceOp,
        class_refs: Vec<u16>,
        operands: Vec<NodeId>,
    },
    /// A `{min,max}` quantification range; `max == None` means unbounded.
    Boundary(Boundary),
    /// A boundary qualified with a measurement unit (`w`, `s`, `p`, ...).
    Distance { key: String, boundary: Boundary },
    /// A single metadata constraint (virtual collection).
    Doc {
        key: String,
        value: String,
        match_op: MatchOp,
    },
    /// Boolean combination of metadata constraints.
    DocGroup {
        relation: TermRelation,
        operands: Vec<NodeId>,
    },
    /// Placeholder emitted for structurally malformed input; serializes to `{}`.
    Empty,
}

impl QueryNode {
    /// Operand list of a composite node, `None` for leaves.
    pub fn operands(&self) -> Option<&[NodeId]> {
        match self {
            QueryNode::TermGroup { operands, .. }
            | QueryNode::Group { operands, .. }
            | QueryNode::Relation { operands, .. }
            | QueryNode::Position { operands, .. }
            | QueryNode::Reference { operands, .. }
            | QueryNode::DocGroup { operands, .. } => Some(operands),
            _ => None,
        }
    }

    /// Mutable operand list of a composite node, `None` for leaves.
    pub fn operands_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            QueryNode::TermGroup { operands, .. }
            | QueryNode::Group { operands, .. }
            | QueryNode::Relation { operands, .. }
            | QueryNode::Position { operands, .. }
            | QueryNode::Reference { operands, .. }
            | QueryNode::DocGroup { operands, .. } => Some(operands),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        self.operands().is_some()
    }

    /// True for token nodes (used for operator/operand compatibility checks).
    pub fn is_token(&self) -> bool {
        matches!(self, QueryNode::Token { .. })
    }

    /// True for class-wrapper groups.
    pub fn is_class(&self) -> bool {
        matches!(
            self,
            QueryNode::Group {
                operation: GroupOperation::Class,
                ..
            }
        )
    }
}
