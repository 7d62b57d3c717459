use crate::boundary::Boundary;
use crate::graph::QueryGraph;
use crate::node::{GroupOperation, QueryNode, Term, TermRelation};

#[test]
fn sibling_groups_do_not_alias() {
    let mut g = QueryGraph::new();
    let a = g.group(GroupOperation::Or);
    let b = g.group(GroupOperation::Or);

    let t = g.token();
    g.push_operand(a, t);
    g.push_operand(a, t);

    assert_eq!(g.operands(a).len(), 2);
    assert_eq!(g.operands(b).len(), 0);
}

#[test]
fn push_operand_rejects_leaves() {
    let mut g = QueryGraph::new();
    let tok = g.token();
    let term = g.term(Term::new("Haus"));
    assert!(!g.push_operand(tok, term));
    assert!(g.set_wrap(tok, term));
}

#[test]
fn wrap_in_class_owns_the_node() {
    let mut g = QueryGraph::new();
    let tok = g.token();
    let class = g.wrap_in_class(tok, 129);

    assert!(g.node(class).is_class());
    assert_eq!(g.operands(class), &[tok]);
    assert_eq!(g.resolve_class(class), tok);
}

#[test]
fn resolve_class_peels_nested_wrappers() {
    let mut g = QueryGraph::new();
    let tok = g.token();
    let inner = g.wrap_in_class(tok, 129);
    let outer = g.wrap_in_class(inner, 130);
    assert_eq!(g.resolve_class(outer), tok);
}

#[test]
fn repetition_carries_boundary() {
    let mut g = QueryGraph::new();
    let rep = g.repetition(Boundary::new(1, Some(3)));
    match g.node(rep) {
        QueryNode::Group {
            operation: GroupOperation::Repetition,
            boundary: Some(b),
            ..
        } => match g.node(*b) {
            QueryNode::Boundary(b) => assert_eq!(*b, Boundary::new(1, Some(3))),
            other => panic!("expected boundary node, got {other:?}"),
        },
        other => panic!("expected repetition group, got {other:?}"),
    }
}

#[test]
fn dump_token_with_term() {
    let mut g = QueryGraph::new();
    let term = g.term(Term::new("Haus").with_layer("orth"));
    let tok = g.token();
    g.set_wrap(tok, term);

    insta::assert_snapshot!(g.dump(tok), @r"
    token
      term orth=Haus
    ");
}

#[test]
fn dump_sequence_with_class_and_focus() {
    let mut g = QueryGraph::new();
    let seq = g.group(GroupOperation::Sequence);
    let tok = g.token();
    let class = g.wrap_in_class(tok, 129);
    g.push_operand(seq, class);
    let focus = g.reference(crate::node::ReferenceOp::Focus, vec![129]);
    g.push_operand(seq, focus);

    insta::assert_snapshot!(g.dump(seq), @r"
    group[sequence]
      class[129]
        token
      focus[129]
    ");
}

#[test]
fn dump_term_group() {
    let mut g = QueryGraph::new();
    let a = g.term(Term::new("NN").with_layer("pos"));
    let b = g.term(
        Term::new("Haus")
            .with_layer("lemma")
            .with_match(crate::node::MatchOp::Ne),
    );
    let tg = g.term_group(TermRelation::And);
    g.push_operand(tg, a);
    g.push_operand(tg, b);

    insta::assert_snapshot!(g.dump(tg), @r"
    termGroup[and]
      term pos=NN
      term lemma!=Haus
    ");
}

#[test]
fn clear_resets_arena() {
    let mut g = QueryGraph::new();
    g.token();
    g.token();
    assert_eq!(g.len(), 2);
    g.clear();
    assert!(g.is_empty());
}
