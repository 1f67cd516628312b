use rowan::TextRange;

use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::NoViableAlternative,
            TextRange::new(0.into(), 1.into()),
        )
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert_eq!(
        diagnostics.as_slice()[0].message(),
        "no viable alternative"
    );
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UnknownCharacter,
            TextRange::new(0.into(), 1.into()),
        )
        .message("&")
        .emit();

    let diag = &diagnostics.as_slice()[0];
    assert_eq!(diag.message(), "unknown character `&`");
    assert_eq!(diag.kind(), DiagnosticKind::UnknownCharacter);
    assert_eq!(diag.offset(), 0);
}

#[test]
fn expected_kinds_are_kept() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UnexpectedToken,
            TextRange::new(4.into(), 5.into()),
        )
        .message("found `,`, expected `RParen`")
        .expected(["RParen"])
        .emit();

    let diag = &diagnostics.as_slice()[0];
    assert_eq!(diag.expected(), ["RParen"]);
    assert_eq!(
        diag.to_string(),
        "error at 4..5: unexpected token: found `,`, expected `RParen`"
    );
}

#[test]
fn warnings_are_not_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InsertedBracket, TextRange::empty(0.into()))
        .message("(")
        .emit();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn builder_with_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UnexpectedToken,
            TextRange::new(7.into(), 8.into()),
        )
        .message("found `4`, expected `RParen`")
        .related_to("group opened here", TextRange::new(0.into(), 1.into()))
        .emit();

    let diag = &diagnostics.as_slice()[0];
    assert_eq!(diag.related()[0].message(), "group opened here");
    assert_eq!(
        diag.to_string(),
        "error at 7..8: unexpected token: found `4`, expected `RParen` (related: group opened here at 0..1)"
    );

    let result = diagnostics.render("(1 + 2 4");
    insta::assert_snapshot!(result, @r"
    error: unexpected token: found `4`, expected `RParen`
      |
    1 | (1 + 2 4
      | -      ^
      | |
      | group opened here
    ");
}

#[test]
fn builder_with_fix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::NotAllInputConsumed,
            TextRange::new(2.into(), 3.into()),
        )
        .message("x")
        .fix("use `*` for multiplication", "*")
        .emit();

    let result = diagnostics.render("2 x 3");
    insta::assert_snapshot!(result, @r"
    error: unexpected `x` after expression
      |
    1 | 2 x 3
      |   ^
      |
    help: use `*` for multiplication
      |
    1 - 2 x 3
    1 + 2 * 3
      |
    ");
}

#[test]
fn printer_colored() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UnknownCharacter,
            TextRange::new(0.into(), 1.into()),
        )
        .message("&")
        .emit();

    let result = diagnostics.render_colored("&", true);
    assert!(result.contains("unknown character"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();
    let result = diagnostics.render("source");
    assert!(result.is_empty());
}

#[test]
fn printer_labels_expected_kinds() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UnexpectedToken,
            TextRange::new(7.into(), 8.into()),
        )
        .message("found `4`, expected `RParen`")
        .expected(["RParen"])
        .emit();
    diagnostics
        .report(
            DiagnosticKind::NoViableAlternative,
            TextRange::new(3.into(), 4.into()),
        )
        .message("found `+`")
        .expected(["Number", "LParen"])
        .emit();

    insta::assert_snapshot!(diagnostics.render("(1 + 2 4"), @r"
    error: unexpected token: found `4`, expected `RParen`
      |
    1 | (1 + 2 4
      |        ^ expected `RParen`

    error: no viable alternative: found `+`
      |
    1 | (1 + 2 4
      |    ^ expected one of 2 token kinds
    ");
}

#[test]
fn printer_zero_width_span() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InsertedBracket, TextRange::empty(0.into()))
        .message("(")
        .inserted("(")
        .emit();

    let result = diagnostics.render("4)");
    insta::assert_snapshot!(result, @r"
    warning: unbalanced bracket; inserted `(`
      |
    1 | 4)
      | ^ `(` inserted here
    ");
}

#[test]
fn printer_multiple_diagnostics() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UnknownCharacter,
            TextRange::new(0.into(), 1.into()),
        )
        .message("&")
        .emit();
    diagnostics
        .report(
            DiagnosticKind::UnknownCharacter,
            TextRange::new(3.into(), 4.into()),
        )
        .message("|")
        .emit();

    let result = diagnostics.render("&4-|*3");
    insta::assert_snapshot!(result, @r"
    error: unknown character `&`
      |
    1 | &4-|*3
      | ^

    error: unknown character `|`
      |
    1 | &4-|*3
      |    ^
    ");
}

#[test]
fn plain_rendering_is_one_line_each() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnexpectedEndOfInput, TextRange::empty(5.into()))
        .message("expected one of `Number`, `LParen`")
        .emit();
    diagnostics
        .report(DiagnosticKind::EarlyExit, TextRange::new(2.into(), 3.into()))
        .fix("add an argument", "0)")
        .emit();

    insta::assert_snapshot!(diagnostics.to_string(), @r"
    error at 5..5: unexpected end of input: expected one of `Number`, `LParen`
    error at 2..3: expected at least one repetition (fix: add an argument)
    ");
}

#[test]
fn diagnostic_kind_custom_messages() {
    assert_eq!(
        DiagnosticKind::NoViableAlternative.custom_message(),
        "no viable alternative: {}"
    );
    assert_eq!(
        DiagnosticKind::NotAllInputConsumed.message(Some(",")),
        "unexpected `,` after expression"
    );
    assert_eq!(
        DiagnosticKind::EarlyExit.message(None),
        "expected at least one repetition"
    );
}
