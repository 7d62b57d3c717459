//! FCS-QL frontend (CLARIN federated content search, level 2).
//!
//! The parser adapter emits:
//!
//! - `query` - top-level sequence of positions
//! - `segment` - one `[...]` position with `expr` leaves and
//!   `conj`/`disj` subtrees; no children means the wildcard `[]`
//! - `disjunction` - alternation between positions
//! - `repetition` - target plus a `quant` leaf
//! - `within` - positions restricted to a named scope
//!
//! FCS layer identifiers (`text`, `lemma`, `pos`) map onto the common
//! annotation layers; a qualifier before `:` selects the foundry.

use koral_ir::{Boundary, GroupOperation, MatchOp, NodeId, PositionFrame, Term, TermRelation};

use crate::diagnostics::DiagnosticKind;
use crate::strategy::{LanguageStrategy, Outcome};
use crate::tree::ParseId;
use crate::walk::Walker;

#[derive(Debug, Default)]
pub struct FcsQlStrategy;

impl FcsQlStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageStrategy for FcsQlStrategy {
    fn name(&self) -> &'static str {
        "fcsql"
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
                let text = w.tree().text(scope).to_string();
                w.mark_visited(scope);
                let key = match scope_key(&text) {
                    Some(key) => key,
                    None => {
                        w.report(DiagnosticKind::UnknownQueryElement, scope)
                            .message(format!("scope `{text}`"))
                            .emit();
                        return Outcome::Continue;
                    }
                };

                let pos = w.graph_mut().position(vec![PositionFrame::IsWithin]);
                w.open(pos);
                let term = w.graph_mut().term(Term::new(key).with_layer("s"));
                let span = w.graph_mut().span();
                w.graph_mut().set_wrap(span, term);
                w.place(span);
                Outcome::Continue
            }
            // Consumed by their parents; harmless when reached directly.
            "expr" | "conj" | "disj" | "quant" | "scope" => Outcome::Skip,
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

/// FCS scope names map onto single-letter structure keys.
fn scope_key(scope: &str) -> Option<&'static str> {
    match scope {
        "sentence" | "s" => Some("s"),
        "paragraph" | "p" => Some("p"),
        "text" | "t" => Some("t"),
        _ => None,
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
            w.graph_mut().term(parse_expr(&text))
        }
    }
}

/// Parse an FCS expression like `text = "Haus"`, `tt:pos != "NN"`.
fn parse_expr(text: &str) -> Term {
    let (lhs, op, key) = if let Some((lhs, key)) = text.split_once("!=") {
        (lhs.trim(), MatchOp::Ne, key)
    } else if let Some((lhs, key)) = text.split_once('=') {
        (lhs.trim(), MatchOp::Eq, key)
    } else {
        ("", MatchOp::Eq, text)
    };
    let key = key.trim().trim_matches('"');

    let mut term = Term::new(key).with_match(op);
    let (qualifier, layer) = match lhs.split_once(':') {
        Some((q, l)) => (Some(q), l),
        None => (None, lhs),
    };
    if let Some(qualifier) = qualifier {
        term = term.with_foundry(qualifier);
    }
    let layer = match layer {
        "" | "text" | "token" => "orth",
        "lemma" => "lemma",
        other => other,
    };
    term.with_layer(layer)
}
