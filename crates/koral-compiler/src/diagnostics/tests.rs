use super::{DiagnosticKind, Diagnostics, Severity};

#[test]
fn codes_are_stable() {
    assert_eq!(DiagnosticKind::MalformedQuery.code(), 302);
    assert_eq!(DiagnosticKind::InvalidClassReference.code(), 304);
    assert_eq!(DiagnosticKind::IncompatibleOperatorAndOperand.code(), 305);
    assert_eq!(DiagnosticKind::UnknownQueryElement.code(), 307);
    assert_eq!(DiagnosticKind::UnboundRelation.code(), 308);
}

#[test]
fn report_uses_fallback_message() {
    let mut diags = Diagnostics::new();
    diags.report(DiagnosticKind::UnboundRelation, None).emit();

    assert_eq!(diags.len(), 1);
    let msg = diags.iter().next().unwrap();
    assert_eq!(msg.message, "relation could not be bound to the query");
    assert!(msg.is_error());
}

#[test]
fn custom_detail_appends_to_fallback() {
    let mut diags = Diagnostics::new();
    diags
        .report(DiagnosticKind::InvalidClassReference, Some(4))
        .message("#3")
        .emit();

    let msg = diags.iter().next().unwrap();
    assert_eq!(msg.message, "reference to an undeclared node: #3");
    assert_eq!(msg.offset, Some(4));
}

#[test]
fn severity_override() {
    let mut diags = Diagnostics::new();
    diags
        .report(DiagnosticKind::UnknownQueryElement, None)
        .severity(Severity::Warning)
        .emit();

    assert!(!diags.has_errors());
    assert!(diags.has_warnings());
}

#[test]
fn display_includes_code_and_offset() {
    let mut diags = Diagnostics::new();
    diags
        .report(DiagnosticKind::MalformedQuery, Some(12))
        .emit();

    let rendered = diags.iter().next().unwrap().to_string();
    assert_eq!(rendered, "error 302: malformed query (at 12)");
}
