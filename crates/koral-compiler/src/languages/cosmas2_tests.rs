use crate::compile::{Compilation, Compiler};
use crate::strategy::QueryLanguage;
use crate::test_utils::tree;

fn compile(src: &str) -> Compilation {
    Compiler::new(QueryLanguage::Cosmas2)
        .compile(&tree(src))
        .unwrap()
}

#[test]
fn single_word() {
    let c = compile(r#"(query (word "Baum"))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      term orth=Baum
    ");
}

#[test]
fn oder_is_a_disjunction() {
    let c = compile(r#"(query (opOR (word "Baum") (word "Haus")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[or]
      token
        term orth=Baum
      token
        term orth=Haus
    ");
}

#[test]
fn und_requires_a_shared_match_region() {
    let c = compile(r#"(query (opAND (word "Baum") (word "Haus")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    position[matches]
      token
        term orth=Baum
      token
        term orth=Haus
    ");
}

#[test]
fn proximity_attaches_a_distance() {
    let c = compile(concat!(
        r#"(query (opPROX (dist "+w:1:3")"#,
        r#" (word "Baum") (word "Haus")))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[sequence]
      distance[w]{1,3}
      token
        term orth=Baum
      token
        term orth=Haus
    ");
}

#[test]
fn bad_distance_reports_302_but_keeps_the_sequence() {
    let c = compile(concat!(
        r#"(query (opPROX (dist "w:9:1")"#,
        r#" (word "Baum") (word "Haus")))"#,
    ));
    assert!(c.diagnostics().iter().any(|d| d.code() == 302));
    assert!(c.dump().starts_with("group[sequence]"));
}

#[test]
fn containment_focuses_the_search_term() {
    let c = compile(r#"(query (opIN (word "Baum") (elem "S")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    focus[129]
      position[isWithin]
        class[129]
          token
            term orth=Baum
        span
          term s=s
    ");
}

#[test]
fn overlap_uses_both_overlap_frames() {
    let c = compile(r#"(query (opOV (word "Baum") (elem "NP")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    focus[129]
      position[overlapsLeft,overlapsRight]
        class[129]
          token
            term orth=Baum
        span
          term s=np
    ");
}

#[test]
fn nested_operators_compose() {
    let c = compile(concat!(
        r#"(query (opOR (opPROX (dist "w:0:2") (word "rote") (word "Rose"))"#,
        r#" (word "Nelke")))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[or]
      group[sequence]
        distance[w]{0,2}
        token
          term orth=rote
        token
          term orth=Rose
      token
        term orth=Nelke
    ");
}

#[test]
fn unknown_category_reports_307() {
    let c = compile(r#"(query (opBED (word "Baum")))"#);
    assert!(c.diagnostics().iter().any(|d| d.code() == 307));
}
