//! COSMAS II frontend.
//!
//! Infix operator syntax over words and text elements. The parser
//! adapter emits:
//!
//! - `query` - transparent wrapper
//! - `word` - a surface form, wildcards kept verbatim
//! - `elem` - a text structure element (`#ELEM(S)`)
//! - `opOR` / `opAND` - the `oder` / `und` connectives
//! - `opPROX` - `/w5`-style proximity: a `dist` leaf (`+w:2:4`) plus
//!   two operands
//! - `opIN` / `opOV` - containment and overlap; the first operand is
//!   the search term, the second the range
//!
//! `#IN` and `#OV` only match the search term, not the whole range, so
//! the search operand is wrapped in a compiler class and the position
//! group in a focus on that class. The class container is handed to the
//! walker's wrap table; the walker opens it when the operand's subtree
//! is reached.

use koral_ir::{Boundary, GroupOperation, PositionFrame, Term};

use crate::diagnostics::DiagnosticKind;
use crate::strategy::{LanguageStrategy, Outcome};
use crate::tree::ParseId;
use crate::walk::Walker;

#[derive(Debug, Default)]
pub struct Cosmas2Strategy;

impl Cosmas2Strategy {
    pub fn new() -> Self {
        Self
    }

    /// Shared shape of `#IN` and `#OV`: a focus on the classed search
    /// operand around a position group holding both operands.
    fn dispatch_position_op(
        &self,
        w: &mut Walker<'_>,
        id: ParseId,
        frames: Vec<PositionFrame>,
    ) -> Outcome {
        let Some(search) = w.tree().child(id, 0) else {
            w.report(DiagnosticKind::MalformedQuery, id)
                .message("operator without operands")
                .emit();
            return Outcome::Continue;
        };

        let class_id = w.alloc_system_class();
        let pos = w.graph_mut().position(frames);
        let focus = w.graph_mut().wrap_in_focus(pos, class_id);
        w.place(focus);
        w.open_detached(pos);

        let container = w.graph_mut().class_group(class_id);
        w.register_wrap(search, container);
        Outcome::Continue
    }
}

impl LanguageStrategy for Cosmas2Strategy {
    fn name(&self) -> &'static str {
        "cosmas2"
    }

    fn dispatch(&mut self, w: &mut Walker<'_>, id: ParseId) -> Outcome {
        match w.tree().category(id) {
            "query" => Outcome::Continue,
            "word" => {
                let key = w.tree().text(id).to_string();
                let term = w.graph_mut().term(Term::new(key).with_layer("orth"));
                let tok = w.graph_mut().token();
                w.graph_mut().set_wrap(tok, term);
                w.place(tok);
                Outcome::Skip
            }
            "elem" => {
                let key = w.tree().text(id).to_lowercase();
                let term = w.graph_mut().term(Term::new(key).with_layer("s"));
                let span = w.graph_mut().span();
                w.graph_mut().set_wrap(span, term);
                w.place(span);
                Outcome::Skip
            }
            "opOR" => {
                let or = w.graph_mut().group(GroupOperation::Or);
                w.open(or);
                Outcome::Continue
            }
            "opAND" => {
                // `und` requires both operands in the same match region.
                let pos = w.graph_mut().position(vec![PositionFrame::Matches]);
                w.open(pos);
                Outcome::Continue
            }
            "opPROX" => {
                let seq = w.graph_mut().group(GroupOperation::Sequence);
                match w.tree().child_by_category(id, "dist") {
                    Some(dist) => {
                        let text = w.tree().text(dist).to_string();
                        w.mark_visited(dist);
                        match parse_distance(&text) {
                            Some((unit, boundary)) => {
                                let d = w.graph_mut().distance(unit, boundary);
                                w.graph_mut().add_distance(seq, d);
                            }
                            None => {
                                w.report(DiagnosticKind::MalformedQuery, dist)
                                    .message(format!("bad distance `{text}`"))
                                    .emit();
                            }
                        }
                    }
                    None => {
                        w.report(DiagnosticKind::MalformedQuery, id)
                            .message("proximity without a distance")
                            .emit();
                    }
                }
                w.open(seq);
                Outcome::Continue
            }
            "opIN" => self.dispatch_position_op(w, id, vec![PositionFrame::IsWithin]),
            "opOV" => self.dispatch_position_op(
                w,
                id,
                vec![PositionFrame::OverlapsLeft, PositionFrame::OverlapsRight],
            ),
            // Consumed by `opPROX`; harmless when reached directly.
            "dist" => Outcome::Skip,
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

/// Parse a proximity distance like `w:1:5` or `+s:0:2`. The optional
/// direction prefix is accepted and dropped; KoralQuery sequences are
/// ordered anyway.
fn parse_distance(text: &str) -> Option<(String, Boundary)> {
    let text = text.trim_start_matches(['+', '-']);
    let mut parts = text.split(':');
    let unit = parts.next()?;
    if unit.is_empty() || !unit.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let min: u32 = parts.next()?.parse().ok()?;
    let max: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || max < min {
        return None;
    }
    Some((unit.to_string(), Boundary::new(min, Some(max))))
}
