//! Poliqarp+ frontend.
//!
//! Sequences of `[...]` segments with boolean attribute expressions,
//! regex-style quantifiers, `within` scopes, explicit `@n` classes and
//! `focus(...)`. The parser adapter emits:
//!
//! - `query` - top-level sequence of positions
//! - `segment` - one token position; `attr` leaves and `conj`/`disj`
//!   subtrees form its wrap, no children means `[]`
//! - `element` - a markup span like `<s>`
//! - `disjunction` - alternation between positions
//! - `repetition` - target plus a `quant` leaf (`*`, `+`, `?`, `{m,n}`)
//! - `within` - a `scope` leaf plus the scoped positions
//! - `spanclass` - a `classId` leaf plus the classed positions
//! - `focus` - `classRef` leaves plus the focused positions

use koral_ir::{
    Boundary, GroupOperation, MatchOp, NodeId, PositionFrame, ReferenceOp, Term, TermRelation,
};

use crate::diagnostics::DiagnosticKind;
use crate::strategy::{LanguageStrategy, Outcome};
use crate::tree::ParseId;
use crate::walk::Walker;

/// Highest class id the query syntax itself may use.
const MAX_USER_CLASS: u16 = 128;

#[derive(Debug, Default)]
pub struct PoliqarpStrategy;

impl PoliqarpStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageStrategy for PoliqarpStrategy {
    fn name(&self) -> &'static str {
        "poliqarp"
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
                match children.as_slice() {
                    [] => {}
                    [single] => {
                        let wrap = build_term_expr(w, *single);
                        w.graph_mut().set_wrap(tok, wrap);
                    }
                    many => {
                        // Adjacent attributes conjoin: [pos=subst orth=a].
                        let group = w.graph_mut().term_group(TermRelation::And);
                        for &child in many {
                            let term = build_term_expr(w, child);
                            w.graph_mut().push_operand(group, term);
                        }
                        w.graph_mut().set_wrap(tok, group);
                    }
                }
                w.place(tok);
                Outcome::Skip
            }
            "element" => {
                let key = w.tree().text(id).to_string();
                let term = w.graph_mut().term(Term::new(key).with_layer("s"));
                let span = w.graph_mut().span();
                w.graph_mut().set_wrap(span, term);
                w.place(span);
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
            "spanclass" => {
                let class_id = w
                    .tree()
                    .child_by_category(id, "classId")
                    .and_then(|c| w.tree().text(c).parse::<u16>().ok());
                match class_id {
                    Some(n) if (1..=MAX_USER_CLASS).contains(&n) => {
                        if let Some(c) = w.tree().child_by_category(id, "classId") {
                            w.mark_visited(c);
                        }
                        let class = w.graph_mut().class_group(n);
                        w.open(class);
                    }
                    _ => {
                        w.report(DiagnosticKind::MalformedQuery, id)
                            .message("class id must be between 1 and 128")
                            .emit();
                    }
                }
                Outcome::Continue
            }
            "focus" => {
                let refs: Vec<ParseId> = w.tree().children_by_category(id, "classRef");
                let mut ids = Vec::new();
                for r in refs {
                    match w.tree().text(r).parse::<u16>() {
                        Ok(n) => ids.push(n),
                        Err(_) => {
                            let text = w.tree().text(r).to_string();
                            w.report(DiagnosticKind::InvalidClassReference, r)
                                .message(text)
                                .emit();
                        }
                    }
                    w.mark_visited(r);
                }
                let focus = w.graph_mut().reference(ReferenceOp::Focus, ids);
                w.open(focus);
                Outcome::Continue
            }
            // Consumed by their parents; harmless when reached directly.
            "attr" | "conj" | "disj" | "quant" | "scope" | "classId" | "classRef" => Outcome::Skip,
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

/// Build a term or term group from an `attr`/`conj`/`disj` subtree.
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

/// Parse `foundry/attr=value` with Poliqarp attribute names: `base` is
/// the lemma layer, a bare value matches the surface form.
fn parse_attr(text: &str) -> Term {
    let (lhs, op, key) = if let Some((lhs, key)) = text.split_once("!=") {
        (lhs.trim(), MatchOp::Ne, key)
    } else if let Some((lhs, key)) = text.split_once('=') {
        (lhs.trim(), MatchOp::Eq, key)
    } else {
        ("", MatchOp::Eq, text)
    };
    let key = key.trim().trim_matches('"');

    let mut term = Term::new(key).with_match(op);
    let (foundry, layer) = match lhs.split_once('/') {
        Some((f, l)) => (Some(f), l),
        None => (None, lhs),
    };
    if let Some(foundry) = foundry {
        term = term.with_foundry(foundry);
    }
    let layer = match layer {
        "" | "orth" => "orth",
        "base" => "lemma",
        other => other,
    };
    term.with_layer(layer)
}
