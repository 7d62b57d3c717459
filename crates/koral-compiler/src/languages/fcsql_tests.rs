use crate::compile::{Compilation, Compiler};
use crate::strategy::QueryLanguage;
use crate::test_utils::tree;

fn compile(src: &str) -> Compilation {
    Compiler::new(QueryLanguage::FcsQl)
        .compile(&tree(src))
        .unwrap()
}

#[test]
fn text_layer_maps_to_orth() {
    let c = compile(r#"(query (segment (expr "text=Haus")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      term orth=Haus
    ");
}

#[test]
fn qualified_layer_keeps_its_foundry() {
    let c = compile(r#"(query (segment (expr "tt:pos=NN")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      term tt/pos=NN
    ");
}

#[test]
fn wildcard_segment_between_constraints() {
    let c = compile(concat!(
        "(query",
        r#" (segment (expr "lemma=gehen"))"#,
        " (segment)",
        r#" (segment (expr "pos=NOUN")))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[sequence]
      token
        term lemma=gehen
      token
      token
        term pos=NOUN
    ");
}

#[test]
fn boolean_expression_inside_a_segment() {
    let c = compile(concat!(
        "(query (segment (disj",
        r#" (expr "pos=NOUN")"#,
        r#" (expr "pos=PROPN"))))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      termGroup[or]
        term pos=NOUN
        term pos=PROPN
    ");
}

#[test]
fn quantified_segment() {
    let c = compile(concat!(
        "(query (repetition",
        r#" (segment (expr "pos=ADJ")) (quant "+")))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    repetition{1,}
      token
        term pos=ADJ
    ");
}

#[test]
fn within_sentence_scope() {
    let c = compile(concat!(
        "(query (within (scope \"sentence\")",
        r#" (segment (expr "lemma=Baum"))))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    position[isWithin]
      span
        term s=s
      token
        term lemma=Baum
    ");
}

#[test]
fn unknown_scope_reports_307() {
    let c = compile(concat!(
        "(query (within (scope \"chapter\")",
        r#" (segment (expr "lemma=Baum"))))"#,
    ));
    assert!(c.diagnostics().iter().any(|d| d.code() == 307));
    // The inner segment still compiles, unscoped.
    assert!(c.dump().contains("lemma=Baum"));
}
