//! CQL frontend (SRU contextual query language, level 1).
//!
//! The parser adapter emits:
//!
//! - `boolean` - text `and` or `or`, two operand children
//! - `searchClause` - optional `index` and `relop` leaves plus a `term`
//!   leaf; a multi-word term is a phrase and becomes a sequence
//!
//! Only surface search is supported: the accepted indexes all target
//! the `orth` layer.

use koral_ir::{GroupOperation, MatchOp, Term};

use crate::diagnostics::DiagnosticKind;
use crate::strategy::{LanguageStrategy, Outcome};
use crate::tree::ParseId;
use crate::walk::Walker;

#[derive(Debug, Default)]
pub struct CqlStrategy;

impl CqlStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageStrategy for CqlStrategy {
    fn name(&self) -> &'static str {
        "cql"
    }

    fn dispatch(&mut self, w: &mut Walker<'_>, id: ParseId) -> Outcome {
        match w.tree().category(id) {
            "boolean" => {
                let op = w.tree().text(id).to_ascii_lowercase();
                match op.as_str() {
                    "or" => {
                        let or = w.graph_mut().group(GroupOperation::Or);
                        w.open(or);
                    }
                    // `and` over positions is adjacency in this profile.
                    "and" => {
                        let seq = w.graph_mut().group(GroupOperation::Sequence);
                        w.open(seq);
                    }
                    _ => {
                        w.report(DiagnosticKind::MalformedQuery, id)
                            .message(format!("unsupported boolean `{op}`"))
                            .emit();
                    }
                }
                Outcome::Continue
            }
            "searchClause" => {
                let tree = w.tree();
                if let Some(index) = tree.child_by_category(id, "index") {
                    let name = tree.text(index).to_string();
                    if !matches!(name.as_str(), "" | "text" | "words" | "serverChoice" | "cql.serverChoice") {
                        w.report(DiagnosticKind::UnknownQueryElement, index)
                            .message(format!("index `{name}`"))
                            .emit();
                    }
                }
                let op = match tree.child_by_category(id, "relop") {
                    Some(relop) if tree.text(relop) == "<>" => MatchOp::Ne,
                    _ => MatchOp::Eq,
                };
                let Some(term) = tree.child_by_category(id, "term") else {
                    w.report(DiagnosticKind::MalformedQuery, id)
                        .message("search clause without a term")
                        .emit();
                    return Outcome::Skip;
                };

                let words: Vec<String> =
                    tree.text(term).split_whitespace().map(String::from).collect();
                match words.as_slice() {
                    [] => {
                        w.report(DiagnosticKind::MalformedQuery, term)
                            .message("empty search term")
                            .emit();
                    }
                    [word] => {
                        let tok = build_token(w, word, op);
                        w.place(tok);
                    }
                    many => {
                        // A quoted phrase matches the words in order.
                        let seq = w.graph_mut().group(GroupOperation::Sequence);
                        w.open(seq);
                        for word in many {
                            let tok = build_token(w, word, op);
                            w.place(tok);
                        }
                    }
                }
                Outcome::Skip
            }
            // Consumed by `searchClause`; harmless when reached directly.
            "index" | "relop" | "term" => Outcome::Skip,
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

fn build_token(w: &mut Walker<'_>, word: &str, op: MatchOp) -> koral_ir::NodeId {
    let term = w
        .graph_mut()
        .term(Term::new(word).with_layer("orth").with_match(op));
    let tok = w.graph_mut().token();
    w.graph_mut().set_wrap(tok, term);
    tok
}
