//! ANNIS QL frontend.
//!
//! ANNIS queries declare annotation nodes and connect them with typed
//! relations (`.` precedence, `>` dominance, `->label` pointing). The
//! parser adapter emits:
//!
//! - `exprTop` - disjunction of alternatives
//! - `andExpr` - one alternative, a conjunction of declarations and
//!   relations
//! - `annotation` - node declaration, optionally named via a `var`
//!   child, with an `anno` leaf (`lemma=Baum`), a `conj`/`disj` term
//!   group, or a bare `nodeAny` as content
//! - `relation` - two `reference` children around a `prec`, `dom` or
//!   `point` operator child
//! - `reference` - `#1` or `#name`, also legal standalone
//!
//! Declarations register their IR node with the walker's registry and
//! produce nothing in place; relations pull their operands out of the
//! registry, which decides between handing over the node, promoting it
//! into a class, or pointing at it with a focus reference.

use koral_ir::{Boundary, GroupOperation, MatchOp, NodeId, Term, TermRelation};

use crate::diagnostics::DiagnosticKind;
use crate::strategy::{LanguageStrategy, Outcome};
use crate::tree::{ParseId, ParseTree};
use crate::walk::Walker;

#[derive(Debug, Default)]
pub struct AnnisStrategy {
    /// Declarations seen so far; unnamed nodes get their ordinal as id.
    node_count: u32,
}

impl AnnisStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    fn reference_id(tree: &ParseTree, node: ParseId) -> String {
        tree.text(node).trim_start_matches('#').to_string()
    }

    /// Build the IR content of one declaration.
    fn build_declaration(&self, w: &mut Walker<'_>, id: ParseId) -> NodeId {
        let tree = w.tree();
        if let Some(anno) = tree.child_by_category(id, "anno") {
            let text = tree.text(anno).to_string();
            return build_anno(w, &text);
        }
        if let Some(group) = tree
            .child_by_category(id, "conj")
            .or_else(|| tree.child_by_category(id, "disj"))
        {
            let wrap = build_term_tree(w, group);
            let tok = w.graph_mut().token();
            w.graph_mut().set_wrap(tok, wrap);
            return tok;
        }
        // `node` matches any node at all.
        w.graph_mut().span()
    }

    fn dispatch_relation(&mut self, w: &mut Walker<'_>, id: ParseId) -> Outcome {
        let tree = w.tree();
        let refs: Vec<String> = tree
            .children_by_category(id, "reference")
            .into_iter()
            .map(|r| Self::reference_id(tree, r))
            .collect();
        if refs.len() != 2 {
            w.report(DiagnosticKind::MalformedQuery, id)
                .message("a relation needs exactly two operands")
                .emit();
            return Outcome::Skip;
        }
        if !w.can_resolve(&refs) {
            return Outcome::Deferred(refs);
        }

        let operator = tree.children(id).iter().copied().find(|&c| {
            matches!(tree.category(c), "prec" | "dom" | "point")
        });
        let Some(operator) = operator else {
            w.report(DiagnosticKind::MalformedQuery, id)
                .message("relation without an operator")
                .emit();
            return Outcome::Skip;
        };

        let category = tree.category(operator);
        let op_text = tree.text(operator).to_string();
        let dominance = category == "dom";
        let kind = match category {
            "prec" => Term::new("prec"),
            "dom" => Term::new("dom").with_layer("c"),
            // Pointing relations carry their label, e.g. `->dep`.
            _ => Term::new(op_text.clone()).with_layer("d"),
        };

        let rel = w.graph_mut().relation(kind);
        if category == "prec" && !op_text.is_empty() {
            match Boundary::from_quantifier(&format!("{{{op_text}}}")) {
                Some(b) => {
                    w.graph_mut().set_boundary(rel, b);
                }
                None => {
                    w.report(DiagnosticKind::MalformedQuery, operator)
                        .message(format!("bad precedence range `{op_text}`"))
                        .emit();
                }
            }
        }
        w.open(rel);

        let ref_nodes = tree.children_by_category(id, "reference");
        for (ref_id, at) in refs.iter().zip(ref_nodes) {
            match w.use_ref(ref_id, at) {
                Some(operand) => {
                    let content = w.graph().resolve_class(operand);
                    if dominance && w.graph().node(content).is_token() {
                        w.report(DiagnosticKind::IncompatibleOperatorAndOperand, at)
                            .message("dominance cannot target a token")
                            .emit();
                    }
                    w.place(operand);
                }
                None => {
                    let placeholder = w.graph_mut().empty();
                    w.place(placeholder);
                }
            }
        }
        Outcome::Skip
    }
}

impl LanguageStrategy for AnnisStrategy {
    fn name(&self) -> &'static str {
        "annis"
    }

    fn prepare(&mut self, tree: &ParseTree, walker: &mut Walker<'_>) {
        fn count(tree: &ParseTree, id: ParseId, walker: &mut Walker<'_>) {
            if tree.category(id) == "reference" {
                walker.note_reference(&AnnisStrategy::reference_id(tree, id));
            }
            for &c in tree.children(id) {
                count(tree, c, walker);
            }
        }
        if let Some(root) = tree.root() {
            count(tree, root, walker);
        }
    }

    fn dispatch(&mut self, w: &mut Walker<'_>, id: ParseId) -> Outcome {
        match w.tree().category(id) {
            "exprTop" => {
                if w.tree().child_count(id) > 1 {
                    let or = w.graph_mut().group(GroupOperation::Or);
                    w.open(or);
                }
                Outcome::Continue
            }
            "andExpr" => {
                // A conjunction places one object per relation, per
                // declaration no relation refers to, and per standalone
                // reference; more than one needs a shared frame.
                let tree = w.tree();
                let mut ordinal = self.node_count;
                let mut placed = 0usize;
                for &c in tree.children(id) {
                    match tree.category(c) {
                        "relation" | "reference" => placed += 1,
                        "annotation" => {
                            ordinal += 1;
                            let name = match tree.child_by_category(c, "var") {
                                Some(var) => tree.text(var).trim_end_matches('#').to_string(),
                                None => ordinal.to_string(),
                            };
                            if w.expected_uses(&name) == 0 {
                                placed += 1;
                            }
                        }
                        _ => {}
                    }
                }
                if placed > 1 {
                    let seq = w.graph_mut().group(GroupOperation::Sequence);
                    w.open(seq);
                }
                Outcome::Continue
            }
            "annotation" => {
                self.node_count += 1;
                let tree = w.tree();
                let name = match tree.child_by_category(id, "var") {
                    Some(var) => tree.text(var).trim_end_matches('#').to_string(),
                    None => self.node_count.to_string(),
                };
                let node = self.build_declaration(w, id);
                if w.expected_uses(&name) == 0 {
                    // Never referenced by a relation; it stands for itself.
                    w.place(node);
                } else if !w.register_node(&name, node) {
                    w.report(DiagnosticKind::MalformedQuery, id)
                        .message(format!("node `{name}` declared twice"))
                        .emit();
                }
                Outcome::Skip
            }
            "relation" => self.dispatch_relation(w, id),
            "reference" => {
                let ref_id = Self::reference_id(w.tree(), id);
                if let Some(operand) = w.use_ref(&ref_id, id) {
                    w.place(operand);
                }
                Outcome::Skip
            }
            // Consumed by their parents; harmless when reached directly.
            "var" | "anno" | "conj" | "disj" | "nodeAny" | "prec" | "dom" | "point" => {
                Outcome::Skip
            }
            other => {
                let other = other.to_string();
                w.report(DiagnosticKind::UnknownQueryElement, id)
                    .message(other)
                    .emit();
                Outcome::Continue
            }
        }
    }

    fn is_relation(&self, tree: &ParseTree, node: ParseId) -> bool {
        tree.category(node) == "relation"
    }

    fn finish(&mut self, w: &mut Walker<'_>) {
        // A query that built no structure but declared exactly one node
        // is that node.
        if w.root().is_none() {
            let unused = w.unused_refs();
            if let [(_, node)] = unused.as_slice() {
                let node = *node;
                w.place(node);
            }
        }
    }
}

/// Parse one `anno` leaf (`lemma=Baum`, `tt/pos!=NN`, `cat=S`) into a
/// token or span node. `cat` constrains a spanning element, everything
/// else a token.
fn build_anno(w: &mut Walker<'_>, text: &str) -> NodeId {
    let (term, is_span) = parse_constraint(text);
    let term = w.graph_mut().term(term);
    let node = if is_span {
        w.graph_mut().span()
    } else {
        w.graph_mut().token()
    };
    w.graph_mut().set_wrap(node, term);
    node
}

/// Build a term or term group from a `conj`/`disj`/`anno` subtree.
fn build_term_tree(w: &mut Walker<'_>, id: ParseId) -> NodeId {
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
                let term = build_term_tree(w, child);
                w.graph_mut().push_operand(group, term);
            }
            group
        }
        _ => {
            let text = tree.text(id).to_string();
            let (term, _) = parse_constraint(&text);
            w.graph_mut().term(term)
        }
    }
}

/// Parse `foundry/layer=key` (or `!=`) into a term. A bare value means
/// an `orth` match; `tok` maps to `orth`, `cat` to the constituency
/// layer `c` on a span.
fn parse_constraint(text: &str) -> (Term, bool) {
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
    let (layer, is_span) = match layer {
        "tok" | "" => ("orth", false),
        "cat" => ("c", true),
        other => (other, false),
    };
    (term.with_layer(layer), is_span)
}
