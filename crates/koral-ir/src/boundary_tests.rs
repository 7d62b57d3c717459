use crate::boundary::Boundary;

#[test]
fn star_plus_question() {
    assert_eq!(Boundary::from_quantifier("*"), Some(Boundary::new(0, None)));
    assert_eq!(Boundary::from_quantifier("+"), Some(Boundary::new(1, None)));
    assert_eq!(
        Boundary::from_quantifier("?"),
        Some(Boundary::new(0, Some(1)))
    );
}

#[test]
fn braced_ranges() {
    assert_eq!(
        Boundary::from_quantifier("{2,4}"),
        Some(Boundary::new(2, Some(4)))
    );
    assert_eq!(
        Boundary::from_quantifier("{,4}"),
        Some(Boundary::new(0, Some(4)))
    );
    assert_eq!(
        Boundary::from_quantifier("{2,}"),
        Some(Boundary::new(2, None))
    );
    assert_eq!(
        Boundary::from_quantifier("{3}"),
        Some(Boundary::new(3, Some(3)))
    );
}

#[test]
fn whitespace_tolerated_inside_braces() {
    assert_eq!(
        Boundary::from_quantifier("{ 2 , 4 }"),
        Some(Boundary::new(2, Some(4)))
    );
}

#[test]
fn rejects_garbage() {
    assert_eq!(Boundary::from_quantifier(""), None);
    assert_eq!(Boundary::from_quantifier("{a,b}"), None);
    assert_eq!(Boundary::from_quantifier("{1,2"), None);
    assert_eq!(Boundary::from_quantifier("**"), None);
}

#[test]
fn display_round_trip() {
    assert_eq!(Boundary::new(2, Some(4)).to_string(), "{2,4}");
    assert_eq!(Boundary::new(1, None).to_string(), "{1,}");
}
