//! Dump helper for IR inspection and snapshot tests.

use std::fmt::Write;

use crate::graph::{NodeId, QueryGraph};
use crate::node::{GroupOperation, MatchOp, PositionFrame, QueryNode, ReferenceOp, Term};

/// Printer for a `QueryGraph` subtree.
///
/// One node per line, operands indented two spaces. The output is stable
/// and is what the snapshot tests assert against.
pub struct IrPrinter<'a> {
    graph: &'a QueryGraph,
}

impl<'a> IrPrinter<'a> {
    pub fn new(graph: &'a QueryGraph) -> Self {
        Self { graph }
    }

    pub fn dump(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.format(&mut out, root, 0)
            .expect("String write never fails");
        out
    }

    fn format(&self, w: &mut String, id: NodeId, depth: usize) -> std::fmt::Result {
        for _ in 0..depth {
            w.push_str("  ");
        }

        match self.graph.node(id) {
            QueryNode::Token { wrap } => {
                writeln!(w, "token")?;
                if let Some(wrap) = wrap {
                    self.format(w, *wrap, depth + 1)?;
                }
            }
            QueryNode::Span { wrap } => {
                writeln!(w, "span")?;
                if let Some(wrap) = wrap {
                    self.format(w, *wrap, depth + 1)?;
                }
            }
            QueryNode::Term(term) => {
                writeln!(w, "term {}", format_term(term))?;
            }
            QueryNode::TermGroup { relation, operands } => {
                writeln!(w, "termGroup[{}]", format_relation(*relation))?;
                self.format_children(w, operands, depth)?;
            }
            QueryNode::Group {
                operation,
                class_id,
                boundary,
                distances,
                operands,
            } => {
                match operation {
                    GroupOperation::Sequence => writeln!(w, "group[sequence]")?,
                    GroupOperation::Or => writeln!(w, "group[or]")?,
                    GroupOperation::Class => match class_id {
                        Some(id) => writeln!(w, "class[{id}]")?,
                        None => writeln!(w, "class[?]")?,
                    },
                    GroupOperation::Repetition => {
                        writeln!(w, "repetition{}", self.boundary_suffix(*boundary))?;
                    }
                }
                for d in distances {
                    self.format(w, *d, depth + 1)?;
                }
                self.format_children(w, operands, depth)?;
            }
            QueryNode::Relation {
                kind,
                boundary,
                operands,
            } => {
                writeln!(w, "relation[{}]{}", kind.key, self.boundary_suffix(*boundary))?;
                self.format_children(w, operands, depth)?;
            }
            QueryNode::Position { frames, operands } => {
                let names: Vec<&str> = frames.iter().map(|f| frame_name(*f)).collect();
                writeln!(w, "position[{}]", names.join(","))?;
                self.format_children(w, operands, depth)?;
            }
            QueryNode::Reference {
                operation,
                class_refs,
                operands,
            } => {
                let refs: Vec<String> = class_refs.iter().map(|c| c.to_string()).collect();
                let op = match operation {
                    ReferenceOp::Focus => "focus",
                    ReferenceOp::Split => "split",
                };
                writeln!(w, "{}[{}]", op, refs.join(","))?;
                self.format_children(w, operands, depth)?;
            }
            QueryNode::Boundary(b) => {
                writeln!(w, "boundary{b}")?;
            }
            QueryNode::Distance { key, boundary } => {
                writeln!(w, "distance[{key}]{boundary}")?;
            }
            QueryNode::Doc {
                key,
                value,
                match_op,
            } => {
                let eq = match match_op {
                    MatchOp::Eq => "=",
                    MatchOp::Ne => "!=",
                };
                writeln!(w, "doc {key}{eq}{value}")?;
            }
            QueryNode::DocGroup { relation, operands } => {
                writeln!(w, "docGroup[{}]", format_relation(*relation))?;
                self.format_children(w, operands, depth)?;
            }
            QueryNode::Empty => {
                writeln!(w, "empty")?;
            }
        }

        Ok(())
    }

    fn format_children(&self, w: &mut String, operands: &[NodeId], depth: usize) -> std::fmt::Result {
        for op in operands {
            self.format(w, *op, depth + 1)?;
        }
        Ok(())
    }

    fn boundary_suffix(&self, boundary: Option<NodeId>) -> String {
        match boundary {
            Some(id) => match self.graph.node(id) {
                QueryNode::Boundary(b) => b.to_string(),
                _ => String::new(),
            },
            None => String::new(),
        }
    }
}

fn format_term(term: &Term) -> String {
    let mut out = String::new();
    if let Some(foundry) = &term.foundry {
        out.push_str(foundry);
        out.push('/');
    }
    if let Some(layer) = &term.layer {
        out.push_str(layer);
        out.push_str(match term.match_op {
            MatchOp::Eq => "=",
            MatchOp::Ne => "!=",
        });
    } else if term.match_op == MatchOp::Ne {
        out.push_str("!=");
    }
    out.push_str(&term.key);
    if let Some(value) = &term.value {
        out.push(':');
        out.push_str(value);
    }
    out
}

fn format_relation(rel: crate::node::TermRelation) -> &'static str {
    match rel {
        crate::node::TermRelation::And => "and",
        crate::node::TermRelation::Or => "or",
    }
}

fn frame_name(frame: PositionFrame) -> &'static str {
    match frame {
        PositionFrame::IsAround => "isAround",
        PositionFrame::IsWithin => "isWithin",
        PositionFrame::StartsWith => "startsWith",
        PositionFrame::EndsWith => "endsWith",
        PositionFrame::OverlapsLeft => "overlapsLeft",
        PositionFrame::OverlapsRight => "overlapsRight",
        PositionFrame::Matches => "matches",
    }
}
