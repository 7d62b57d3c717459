use crate::compile::{Compilation, Compiler};
use crate::strategy::QueryLanguage;
use crate::test_utils::tree;

fn compile(src: &str) -> Compilation {
    Compiler::new(QueryLanguage::PoliqarpPlus)
        .compile(&tree(src))
        .unwrap()
}

#[test]
fn empty_segment_is_a_bare_token() {
    let c = compile("(query (segment))");
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @"token");
}

#[test]
fn base_attribute_maps_to_lemma() {
    let c = compile(r#"(query (segment (attr "base=drzewo")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      term lemma=drzewo
    ");
}

#[test]
fn segment_sequence() {
    let c = compile(concat!(
        "(query",
        r#" (segment (attr "orth=der"))"#,
        r#" (segment (attr "pos=NN")))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[sequence]
      token
        term orth=der
      token
        term pos=NN
    ");
}

#[test]
fn boolean_attribute_expression() {
    let c = compile(concat!(
        "(query (segment (disj",
        r#" (attr "pos=subst")"#,
        r#" (conj (attr "pos=adj") (attr "orth!=nowy")))))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      termGroup[or]
        term pos=subst
        termGroup[and]
          term pos=adj
          term orth!=nowy
    ");
}

#[test]
fn adjacent_attributes_conjoin() {
    let c = compile(r#"(query (segment (attr "pos=subst") (attr "base=rok")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      termGroup[and]
        term pos=subst
        term lemma=rok
    ");
}

#[test]
fn quantifier_opens_a_repetition() {
    let c = compile(concat!(
        "(query",
        r#" (segment (attr "pos=adj"))"#,
        r#" (repetition (segment (attr "pos=subst")) (quant "{1,3}")))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[sequence]
      token
        term pos=adj
      repetition{1,3}
        token
          term pos=subst
    ");
}

#[test]
fn bad_quantifier_reports_302_and_keeps_the_target() {
    let c = compile(r#"(query (repetition (segment) (quant "{x}")))"#);
    assert!(c.diagnostics().iter().any(|d| d.code() == 302));
    // The segment still compiles, just unquantified.
    insta::assert_snapshot!(c.dump(), @"token");
}

#[test]
fn within_scopes_the_query_to_a_span() {
    let c = compile(concat!(
        "(query (within (scope \"s\")",
        r#" (segment (attr "pos=subst"))))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    position[isWithin]
      span
        term s=s
      token
        term pos=subst
    ");
}

#[test]
fn explicit_class_wraps_its_positions() {
    let c = compile(concat!(
        "(query (spanclass (classId \"2\")",
        r#" (segment (attr "pos=adj"))))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    class[2]
      token
        term pos=adj
    ");
}

#[test]
fn class_id_out_of_range_reports_302() {
    let c = compile(r#"(query (spanclass (classId "200") (segment)))"#);
    assert!(c.diagnostics().iter().any(|d| d.code() == 302));
}

#[test]
fn focus_references_user_classes() {
    let c = compile(concat!(
        "(query (focus (classRef \"2\")",
        r#" (spanclass (classId "2") (segment (attr "pos=subst")))))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    focus[2]
      class[2]
        token
          term pos=subst
    ");
}

#[test]
fn markup_element_is_a_span() {
    let c = compile(concat!(
        "(query (element \"s\")",
        r#" (segment (attr "orth=Der")))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[sequence]
      span
        term s=s
      token
        term orth=Der
    ");
}

#[test]
fn disjunction_of_positions() {
    let c = compile(concat!(
        "(query (disjunction",
        r#" (segment (attr "base=dom"))"#,
        r#" (segment (attr "base=mieszkanie"))))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[or]
      token
        term lemma=dom
      token
        term lemma=mieszkanie
    ");
}
