use crate::compile::{Compilation, Compiler};
use crate::strategy::QueryLanguage;
use crate::test_utils::tree;

fn compile(src: &str) -> Compilation {
    Compiler::new(QueryLanguage::Cqp)
        .compile(&tree(src))
        .unwrap()
}

#[test]
fn bare_string_matches_the_surface() {
    let c = compile(r#"(query (string "Haus"))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      term orth=Haus
    ");
}

#[test]
fn word_attribute_maps_to_orth() {
    let c = compile(r#"(query (segment (attr "word=geh.*")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      term orth=geh.*
    ");
}

#[test]
fn string_sequence_with_quantified_gap() {
    let c = compile(concat!(
        "(query",
        r#" (string "der")"#,
        r#" (repetition (segment) (quant "*"))"#,
        r#" (string "Baum"))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[sequence]
      token
        term orth=der
      repetition{0,}
        token
      token
        term orth=Baum
    ");
}

#[test]
fn negated_attribute() {
    let c = compile(r#"(query (segment (attr "lemma!=gehen")))"#);
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      term lemma!=gehen
    ");
}

#[test]
fn boolean_expression_inside_a_segment() {
    let c = compile(concat!(
        "(query (segment (conj",
        r#" (attr "pos=ADJA")"#,
        r#" (disj (attr "word=gut") (attr "word=schlecht")))))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    token
      termGroup[and]
        term pos=ADJA
        termGroup[or]
          term orth=gut
          term orth=schlecht
    ");
}

#[test]
fn within_sentence() {
    let c = compile(concat!(
        "(query (within (scope \"s\")",
        r#" (string "Anfang") (string "Ende")))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    position[isWithin]
      span
        term s=s
      token
        term orth=Anfang
      token
        term orth=Ende
    ");
}

#[test]
fn disjunction_of_positions() {
    let c = compile(concat!(
        "(query (disjunction",
        r#" (string "Hund") (string "Katze")))"#,
    ));
    assert!(c.is_valid());
    insta::assert_snapshot!(c.dump(), @r"
    group[or]
      token
        term orth=Hund
      token
        term orth=Katze
    ");
}

#[test]
fn unknown_category_reports_307() {
    let c = compile(r#"(query (label "a"))"#);
    assert!(c.diagnostics().iter().any(|d| d.code() == 307));
}
