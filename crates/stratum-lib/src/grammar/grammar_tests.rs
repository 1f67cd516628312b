use stratum_core::Assoc;

use crate::builtin;
use crate::feature::{Feature, Relation};
use crate::lexer::TokenDef;
use crate::test_utils::{builtin_grammar, small_recovery_grammar};
use crate::{Error, Grammar};

fn op(name: &str, relation: Relation, text: &str) -> Feature {
    Feature::binary(name, Assoc::Left, relation, TokenDef::literal(name, text))
}

#[test]
fn builtin_layers() {
    let grammar = builtin_grammar();

    insta::assert_snapshot!(grammar.dump_layers(), @r"
    p0: prefix(groupRecovery) exhaustive
    p1: suffix(subtract add)
    p2: suffix(modulo divide multiply)
    p3: prefix(unarySubtract)
    p4: suffix(exponent)
    p5: suffix(factorial)
    base: number call variable groupRecoveryBase
    ");
}

#[test]
fn lower_than_opens_layer_below_target() {
    let grammar = small_recovery_grammar();

    assert_eq!(
        grammar.layer_names(),
        [
            vec!["groupRecovery"],
            vec!["add"],
            vec!["multiply"],
            vec!["unarySubtract"],
        ]
    );
}

#[test]
fn lower_than_several_targets_goes_below_loosest() {
    let features = vec![
        op("tight", Relation::highest(), "#"),
        op("loose", Relation::lower_than(["tight"]), "@"),
        op("bottom", Relation::lower_than(["tight", "loose"]), "$"),
    ];
    let grammar = Grammar::new(features, vec![builtin::number()]).unwrap();

    assert_eq!(
        grammar.layer_names(),
        [vec!["bottom"], vec!["loose"], vec!["tight"]]
    );
}

#[test]
fn same_as_is_positioned_against_leading_member() {
    let features = vec![
        op("x", Relation::highest(), "#"),
        op("y", Relation::same_as("x"), "@"),
        op("z", Relation::same_as_after("x"), "$"),
    ];
    let grammar = Grammar::new(features, vec![builtin::number()]).unwrap();

    assert_eq!(grammar.layer_names(), [vec!["y", "z", "x"]]);
}

#[test]
fn relation_targets_are_placed_first() {
    let features = vec![
        op("sum", Relation::lower_than(["product"]), "+"),
        op("product", Relation::highest(), "*"),
    ];
    let grammar = Grammar::new(features, vec![builtin::number()]).unwrap();

    insta::assert_snapshot!(grammar.dump_layers(), @r"
    p0: suffix(sum)
    p1: suffix(product)
    base: number
    ");
}

#[test]
fn bases_only() {
    let grammar = Grammar::new(vec![], vec![builtin::number()]).unwrap();

    assert_eq!(grammar.layer_count(), 0);
    insta::assert_snapshot!(grammar.expect_valid_cst("4"), @r#"
    number
      Number "4"
    "#);
}

#[test]
fn precedence_cycle_is_fatal() {
    let features = vec![
        op("a", Relation::lower_than(["b"]), "+"),
        op("b", Relation::lower_than(["a"]), "*"),
    ];
    let err = Grammar::new(features, vec![builtin::number()]).unwrap_err();

    assert_eq!(err, Error::PrecedenceCycle("a".into()));
    insta::assert_snapshot!(err, @"precedence dependency cycle involving feature `a`");
}

#[test]
fn unknown_target_names_both_features() {
    let features = vec![op("a", Relation::lower_than(["missing"]), "+")];
    let err = Grammar::new(features, vec![builtin::number()]).unwrap_err();

    insta::assert_snapshot!(err, @"feature `a` references unknown feature `missing`");
}

#[test]
fn unknown_same_as_target() {
    let features = vec![op("a", Relation::same_as("missing"), "+")];
    let err = Grammar::new(features, vec![builtin::number()]).unwrap_err();

    assert_eq!(
        err,
        Error::UnknownFeature {
            feature: "a".into(),
            target: "missing".into(),
        }
    );
}

#[test]
fn duplicate_feature() {
    let features = vec![builtin::add(), builtin::add(), builtin::multiply()];
    let err = Grammar::new(features, vec![builtin::number()]).unwrap_err();

    assert_eq!(err, Error::DuplicateFeature("add".into()));
}

#[test]
fn duplicate_base() {
    let err = Grammar::new(vec![], vec![builtin::number(), builtin::number()]).unwrap_err();

    assert_eq!(err, Error::DuplicateFeature("number".into()));
}

#[test]
fn base_among_operators() {
    let err = Grammar::new(vec![builtin::number()], vec![]).unwrap_err();

    insta::assert_snapshot!(err, @"feature `number` is `base` and cannot be supplied as an operator");
}

#[test]
fn operator_among_bases() {
    let err = Grammar::new(vec![], vec![builtin::factorial()]).unwrap_err();

    insta::assert_snapshot!(err, @"feature `factorial` is `suffix` and cannot be supplied as a base feature");
}

#[test]
fn conflicting_token_declarations() {
    let features = vec![
        op("a", Relation::highest(), "+"),
        Feature::binary(
            "b",
            Assoc::Left,
            Relation::same_as("a"),
            TokenDef::literal("a", "++"),
        ),
    ];
    let err = Grammar::new(features, vec![builtin::number()]).unwrap_err();

    assert_eq!(err, Error::ConflictingToken("a".into()));
}

#[test]
fn left_assoc_recurses_into_next_layer() {
    let grammar = builtin_grammar();

    insta::assert_snapshot!(grammar.expect_valid_cst("1 - 2 - 3"), @r#"
    subtract p1 left
      subtract p1 left
        number
          Number "1"
        Minus "-"
        number
          Number "2"
      Minus "-"
      number
        Number "3"
    "#);
}

#[test]
fn right_assoc_recurses_into_same_layer() {
    let grammar = builtin_grammar();

    insta::assert_snapshot!(grammar.expect_valid_cst("2^3^2"), @r#"
    exponent p4 right
      number
        Number "2"
      Caret "^"
      exponent p4 right
        number
          Number "3"
        Caret "^"
        number
          Number "2"
    "#);
}

#[test]
fn prefix_falls_through_to_tighter_layers() {
    let grammar = builtin_grammar();

    insta::assert_snapshot!(grammar.expect_valid_cst("-2^2!"), @r#"
    unarySubtract p3 prefix
      Minus "-"
      exponent p4 right
        number
          Number "2"
        Caret "^"
        factorial p5 suffix
          number
            Number "2"
          Bang "!"
    "#);
}

#[test]
fn prefix_recurses_into_own_layer() {
    let grammar = builtin_grammar();

    insta::assert_snapshot!(grammar.expect_valid_cst("--4"), @r#"
    unarySubtract p3 prefix
      Minus "-"
      unarySubtract p3 prefix
        Minus "-"
        number
          Number "4"
    "#);
}

#[test]
fn top_rule_and_lookup() {
    let grammar = builtin_grammar();

    assert_eq!(grammar.top_rule(), crate::Rule::Expression);
    assert!(grammar.feature("modulo").is_some());
    assert!(grammar.feature("missing").is_none());
    assert!(grammar.lexicon().kind("Mod").is_some());
}
