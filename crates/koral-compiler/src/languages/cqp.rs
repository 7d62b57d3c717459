//! CQP frontend.
//!
//! The CWB dialect: bare `"strings"`, `[attr="regex"]` segments,
//! quantifiers and `within` scopes. The parser adapter emits:
//!
//! - `query` - top-level sequence of positions
//! - `string` - a bare quoted form outside brackets
//! - `segment` - one `[...]` position with `attr` leaves and
//!   `conj`/`disj` subtrees
//! - `disjunction` - alternation between positions
//! - `repetition` - target plus a `quant` leaf
//! - `within` - positions restricted to a `scope` leaf

use koral_ir::{Boundary, GroupOperation, MatchOp, NodeId, PositionFrame, Term, TermRelation};

use crate::diagnostics::DiagnosticKind;
use crate::strategy::{LanguageStrategy, Outcome};
use crate::tree::ParseId;
use crate::walk::Walker;

#[derive(Debug, Default)]
pub struct CqpStrategy;

impl CqpStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageStrategy for CqpStrategy {
    fn name(&self) -> &'static str {
        "cqp"
    }

    fn dispatch(&mut self, w: &mut Walker<'_>, id: ParseId) -> Outcome {
        match w.tree().category(id) {
            "query" => {
                if w.tree().child_count(id) > 1 {
                    let seq = w.graph_mut().group(GroupOperation::Sequence);
                    w.open(seq);
                }
                Outcome::Continue
            }
            "string" => {
                let key = w.tree().text(id).to_string();
                let term = w.graph_mut().term(Term::new(key).with_layer("orth"));
                let tok = w.graph_mut().token();
                w.graph_mut().set_wrap(tok, term);
                w.place(tok);
                Outcome::Skip
            }
            "segment" => {
                let children: Vec<ParseId> = w.tree().children(id).to_vec();
                let tok = w.graph_mut().token();
                if let [single] = children.as_slice() {
                    let wrap = build_term_expr(w, *single);
                    w.graph_mut().set_wrap(tok, wrap);
                } else if !children.is_empty() {
                    let group = w.graph_mut().term_group(TermRelation::And);
                    for child in children {
                        let term = build_term_expr(w, child);
                        w.graph_mut().push_operand(group, term);
                    }
                    w.graph_mut().set_wrap(tok, group);
                }
                w.place(tok);
                Outcome::Skip
            }
            "disjunction" => {
                let or = w.graph_mut().group(GroupOperation::Or);
                w.open(or);
                Outcome::Continue
            }
            "repetition" => {
                let Some(quant) = w.tree().child_by_category(id, "quant") else {
                    w.report(DiagnosticKind::MalformedQuery, id)
                        .message("repetition without a quantifier")
                        .emit();
                    return Outcome::Continue;
                };
                let text = w.tree().text(quant).to_string();
                w.mark_visited(quant);
                match Boundary::from_quantifier(&text) {
                    Some(b) => {
                        let rep = w.graph_mut().repetition(b);
                        w.open(rep);
                    }
                    None => {
                        w.report(DiagnosticKind::MalformedQuery, quant)
                            .message(format!("bad quantifier `{text}`"))
                            .emit();
                    }
                }
                Outcome::Continue
            }
            "within" => {
                let Some(scope) = w.tree().child_by_category(id, "scope") else {
                    w.report(DiagnosticKind::MalformedQuery, id)
                        .message("within without a scope")
                        .emit();
                    return Outcome::Continue;
                };
                let key = w.tree().text(scope).to_string();
                w.mark_visited(scope);

                let pos = w.graph_mut().position(vec![PositionFrame::IsWithin]);
                w.open(pos);
                let term = w.graph_mut().term(Term::new(key).with_layer("s"));
                let span = w.graph_mut().span();
                w.graph_mut().set_wrap(span, term);
                w.place(span);
                Outcome::Continue
            }
            // Consumed by their parents; harmless when reached directly.
            "attr" | "conj" | "disj" | "quant" | "scope" => Outcome::Skip,
            other => {
                let other = other.to_string();
                w.report(DiagnosticKind::UnknownQueryElement, id)
                    .message(other)
                    .emit();
                Outcome::Continue
            }
        }
    }
}

fn build_term_expr(w: &mut Walker<'_>, id: ParseId) -> NodeId {
    let tree = w.tree();
    match tree.category(id) {
        "conj" | "disj" => {
            let relation = if tree.category(id) == "conj" {
                TermRelation::And
            } else {
                TermRelation::Or
            };
            let children: Vec<ParseId> = tree.children(id).to_vec();
            let group = w.graph_mut().term_group(relation);
            for child in children {
                let term = build_term_expr(w, child);
                w.graph_mut().push_operand(group, term);
            }
            group
        }
        _ => {
            let text = tree.text(id).to_string();
            w.graph_mut().term(parse_attr(&text))
        }
    }
}

/// Parse a CQP attribute constraint: `word` is the surface layer, and
/// values are regular expressions kept verbatim in the key.
fn parse_attr(text: &str) -> Term {
    let (lhs, op, key) = if let Some((lhs, key)) = text.split_once("!=") {
        (lhs.trim(), MatchOp::Ne, key)
    } else if let Some((lhs, key)) = text.split_once('=') {
        (lhs.trim(), MatchOp::Eq, key)
    } else {
        ("word", MatchOp::Eq, text)
    };
    let key = key.trim().trim_matches('"');
    let layer = match lhs {
        "word" | "" => "orth",
        other => other,
    };
    Term::new(key).with_layer(layer).with_match(op)
}
