use super::{Lexed, Lexicon, TokenDef};
use crate::Error;

fn arithmetic() -> Vec<TokenDef> {
    vec![
        TokenDef::whitespace(),
        TokenDef::regex("Number", r"[0-9]+(\.[0-9]+)?"),
        TokenDef::literal("Minus", "-"),
        TokenDef::literal("Star", "*"),
    ]
}

fn dump(lexicon: &Lexicon, source: &str) -> String {
    let Lexed { tokens, unknown } = lexicon.lex(source);
    let mut out: Vec<String> = tokens
        .iter()
        .map(|t| {
            format!(
                "{} {:?}",
                lexicon.name(t.kind),
                &source[usize::from(t.span.start())..usize::from(t.span.end())]
            )
        })
        .collect();
    out.extend(unknown.iter().map(|r| format!("unknown {:?}", r)));
    out.join("\n")
}

#[test]
fn skips_whitespace() {
    let lexicon = Lexicon::build(arithmetic()).unwrap();

    insta::assert_snapshot!(dump(&lexicon, " 34 -  3.5 "), @r#"
    Number "34"
    Minus "-"
    Number "3.5"
    "#);
}

#[test]
fn regex_matches_only_at_the_cursor() {
    let lexicon = Lexicon::build(arithmetic()).unwrap();

    // `3.` is not a number; the match backs off to `3`, and `.x` is unknown.
    insta::assert_snapshot!(dump(&lexicon, "3.x-2"), @r#"
    Number "3"
    Minus "-"
    Number "2"
    unknown 1..3
    "#);
}

#[test]
fn registration_order_wins_without_constraints() {
    let mut defs = arithmetic();
    defs.push(TokenDef::literal("Power", "**"));
    let lexicon = Lexicon::build(defs).unwrap();

    insta::assert_snapshot!(dump(&lexicon, "2**3"), @r#"
    Number "2"
    Star "*"
    Star "*"
    Number "3"
    "#);
}

#[test]
fn before_constraint_reorders() {
    let mut defs = arithmetic();
    defs.push(TokenDef::literal("Power", "**").before("Star"));
    let lexicon = Lexicon::build(defs).unwrap();

    insta::assert_snapshot!(dump(&lexicon, "2**3*4"), @r#"
    Number "2"
    Power "**"
    Number "3"
    Star "*"
    Number "4"
    "#);
}

#[test]
fn keyword_yields_to_longer_identifier() {
    let defs = vec![
        TokenDef::whitespace(),
        TokenDef::regex("Identifier", r"[A-Za-z_][A-Za-z0-9_]*"),
        TokenDef::literal("Mod", "mod")
            .before("Identifier")
            .longer_alt("Identifier"),
    ];
    let lexicon = Lexicon::build(defs).unwrap();

    insta::assert_snapshot!(dump(&lexicon, "model mod x"), @r#"
    Identifier "model"
    Mod "mod"
    Identifier "x"
    "#);
}

#[test]
fn unknown_characters_are_coalesced() {
    let lexicon = Lexicon::build(arithmetic()).unwrap();

    let lexed = lexicon.lex("&4-|*3");
    let starts: Vec<u32> = lexed.unknown.iter().map(|r| r.start().into()).collect();
    assert_eq!(starts, [0, 3]);
    assert_eq!(lexed.tokens.len(), 4);

    insta::assert_snapshot!(dump(&lexicon, "1 &&% 2"), @r#"
    Number "1"
    Number "2"
    unknown 2..5
    "#);
}

#[test]
fn offsets_are_bytes() {
    let lexicon = Lexicon::build(arithmetic()).unwrap();

    let lexed = lexicon.lex("2×3");
    assert_eq!(format!("{:?}", lexed.unknown), "[1..3]");
    assert_eq!(u32::from(lexed.tokens[1].span.start()), 3);
}

#[test]
fn identical_redeclaration_is_merged() {
    let mut defs = arithmetic();
    defs.push(TokenDef::literal("Minus", "-"));
    let lexicon = Lexicon::build(defs).unwrap();

    assert_eq!(lexicon.len(), 4);
}

#[test]
fn conflicting_redeclaration() {
    let mut defs = arithmetic();
    defs.push(TokenDef::literal("Minus", "−"));

    let err = Lexicon::build(defs).err().unwrap();
    assert_eq!(err, Error::ConflictingToken("Minus".into()));
}

#[test]
fn empty_patterns_are_rejected() {
    let err = Lexicon::build([TokenDef::regex("Digits", "[0-9]*")])
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "token kind `Digits` can match the empty string");

    let err = Lexicon::build([TokenDef::literal("Nothing", "")])
        .err()
        .unwrap();
    assert_eq!(err, Error::EmptyTokenPattern("Nothing".into()));
}

#[test]
fn invalid_regex() {
    let err = Lexicon::build([TokenDef::regex("Broken", "(")]).err().unwrap();

    assert!(matches!(err, Error::InvalidTokenPattern { ref kind, .. } if kind == "Broken"));
}

#[test]
fn ordering_errors() {
    let err = Lexicon::build([
        TokenDef::literal("A", "a").before("B"),
        TokenDef::literal("B", "b").before("A"),
    ])
    .err()
    .unwrap();
    assert_eq!(err, Error::TokenOrderCycle("A".into()));

    let err = Lexicon::build([TokenDef::literal("A", "a").before("Z")])
        .err()
        .unwrap();
    assert_eq!(
        err.to_string(),
        "token kind `A` refers to unknown token kind `Z`"
    );
}
