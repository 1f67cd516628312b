use std::cell::Cell;
use std::rc::Rc;

use stratum_core::{Element, Leaf, NodeOrToken};

use super::{ParseContext, ParseResult, Parser, Speculation};
use crate::builtin::{self, NUMBER};
use crate::feature::{Feature, Relation};
use crate::lexer::TokenDef;
use crate::Grammar;

fn number_token() -> TokenDef {
    TokenDef::regex("Number", NUMBER)
}

fn bases_only(bases: Vec<Feature>) -> Grammar {
    Grammar::new(vec![], bases).unwrap()
}

fn tokens(leaves: impl IntoIterator<Item = Leaf>) -> Vec<Element> {
    leaves.into_iter().map(NodeOrToken::Token).collect()
}

fn number_leaf(p: &mut Parser<'_>) -> ParseResult<Leaf> {
    p.consume("Number")
}

fn identifier_leaf(p: &mut Parser<'_>) -> ParseResult<Leaf> {
    p.consume("Identifier")
}

#[test]
fn optional_token() {
    let signed = Feature::base("signed", |p, x| {
        let sign = p.optional(|p| p.consume("Plus"))?;
        let value = p.consume("Number")?;
        Ok(x.node(tokens(sign.into_iter().chain([value]))))
    })
    .token(TokenDef::literal("Plus", "+"))
    .token(number_token());
    let grammar = bases_only(vec![signed]);

    insta::assert_snapshot!(grammar.expect_valid_cst("+4"), @r#"
    signed
      Plus "+"
      Number "4"
    "#);
    insta::assert_snapshot!(grammar.expect_valid_cst("4"), @r#"
    signed
      Number "4"
    "#);
}

#[test]
fn choice_takes_first_match() {
    let literal = Feature::base("literal", |p, x| {
        let leaf = p.choice(&[&number_leaf, &identifier_leaf])?;
        Ok(x.node(tokens([leaf])))
    })
    .token(number_token())
    .token(TokenDef::regex("Identifier", builtin::IDENTIFIER))
    .token(TokenDef::literal("Plus", "+"));
    let grammar = bases_only(vec![literal]);

    insta::assert_snapshot!(grammar.expect_valid_cst("abc"), @r#"
    literal
      Identifier "abc"
    "#);
    insta::assert_snapshot!(grammar.expect_invalid("+"), @"error at 0..1: no viable alternative: found `+`, expected one of `Number`, `Identifier`");
}

#[test]
fn many_collects_until_failure() {
    let list = Feature::base("list", |p, x| {
        let open = p.consume("LBracket")?;
        let items = p.many(number_leaf)?;
        let close = p.consume("RBracket")?;
        Ok(x.node(tokens([open].into_iter().chain(items).chain([close]))))
    })
    .token(TokenDef::literal("LBracket", "["))
    .token(TokenDef::literal("RBracket", "]"))
    .token(number_token());
    let grammar = bases_only(vec![list]);

    insta::assert_snapshot!(grammar.expect_valid_cst("[1 2 3]"), @r#"
    list
      LBracket "["
      Number "1"
      Number "2"
      Number "3"
      RBracket "]"
    "#);
    insta::assert_snapshot!(grammar.expect_valid_cst("[]"), @r#"
    list
      LBracket "["
      RBracket "]"
    "#);
    insta::assert_snapshot!(grammar.expect_invalid("[1 2"), @"error at 4..4: unexpected end of input: expected `RBracket`");
}

#[test]
fn many_stops_when_nothing_is_consumed() {
    let rounds = Rc::new(Cell::new(0));
    let seen = rounds.clone();
    let list = Feature::base("list", move |p, x| {
        let items = p.many(|p| p.optional(number_leaf))?;
        seen.set(items.len());
        Ok(x.node(tokens(items.into_iter().flatten())))
    })
    .token(number_token());
    let grammar = bases_only(vec![list]);

    let cst = grammar.expect_valid("1 2");

    assert_eq!(cst.leaves().len(), 2);
    // The last round matched nothing and ended the loop.
    assert_eq!(rounds.get(), 3);
}

#[test]
fn at_least_one_requires_a_match() {
    let sum = Feature::base("sum", |p, x| {
        let plus = p.consume("Plus")?;
        let items = p.at_least_one(number_leaf)?;
        Ok(x.node(tokens([plus].into_iter().chain(items))))
    })
    .token(TokenDef::literal("Plus", "+"))
    .token(number_token());
    let grammar = bases_only(vec![sum]);

    insta::assert_snapshot!(grammar.expect_valid_cst("+1 2"), @r#"
    sum
      Plus "+"
      Number "1"
      Number "2"
    "#);
    insta::assert_snapshot!(grammar.expect_invalid("+"), @"error at 1..1: expected at least one repetition: expected `Number`");
}

fn pair_tokens(p: &mut Parser<'_>) -> ParseResult<Vec<Element>> {
    let key = p.consume("Number")?;
    let colon = p.consume("Colon")?;
    let value = p.consume("Number")?;
    Ok(tokens([key, colon, value]))
}

fn pair_features(backtrack: bool) -> Vec<Feature> {
    let pair = Feature::base("pair", move |p, x| {
        let children = if backtrack {
            p.attempt(pair_tokens)?
        } else {
            pair_tokens(p)?
        };
        Ok(x.node(children))
    })
    .token(number_token())
    .token(TokenDef::literal("Colon", ":"));
    vec![pair, builtin::number()]
}

#[test]
fn consumed_failure_commits() {
    let grammar = bases_only(pair_features(false));

    insta::assert_snapshot!(grammar.expect_valid_cst("1:2"), @r#"
    pair
      Number "1"
      Colon ":"
      Number "2"
    "#);
    insta::assert_snapshot!(grammar.expect_invalid("1"), @"error at 1..1: unexpected end of input: expected `Colon`");
}

#[test]
fn attempt_backtracks_to_next_alternative() {
    let grammar = bases_only(pair_features(true));

    insta::assert_snapshot!(grammar.expect_valid_cst("1"), @r#"
    number
      Number "1"
    "#);
    insta::assert_snapshot!(grammar.expect_valid_cst("1:2"), @r#"
    pair
      Number "1"
      Colon ":"
      Number "2"
    "#);
}

#[test]
fn try_rule_leaves_revert_to_caller() {
    let maybe = Feature::prefix("maybe", Relation::lower_than(["add"]), |p, x| {
        let mark = p.consume("Question")?;
        let Speculation { result, checkpoint } = p.try_rule(x.operand());
        let mut children = vec![NodeOrToken::Token(mark)];
        match result {
            Ok(operand) => children.push(NodeOrToken::Node(operand)),
            Err(_) => p.revert(checkpoint),
        }
        Ok(x.node(children))
    })
    .token(TokenDef::literal("Question", "?"));
    let grammar = Grammar::new(
        vec![
            maybe,
            builtin::add(),
            builtin::multiply(),
            builtin::unary_subtract(),
        ],
        vec![builtin::number()],
    )
    .unwrap();

    insta::assert_snapshot!(grammar.expect_valid_cst("?1+2"), @r#"
    maybe p0 prefix
      Question "?"
      add p1 left
        number
          Number "1"
        Plus "+"
        number
          Number "2"
    "#);
    insta::assert_snapshot!(grammar.expect_valid_cst("?"), @r#"
    maybe p0 prefix
      Question "?"
    "#);
}

#[test]
fn revert_restores_position_context_and_insertions() {
    const KEY: &str = "snapshot.value";
    let observed = Rc::new(Cell::new(None));
    let seen = observed.clone();
    let snapshot = Feature::base("snapshot", move |p, x| {
        let checkpoint = p.checkpoint();
        p.context_mut().set(KEY, 7);
        p.consume("Number")?;
        p.insert_synthetic("LParen", 2);
        assert_eq!(p.count_ahead("LParen"), 2);
        p.revert(checkpoint);

        seen.set(Some((p.position(), p.context().get(KEY), p.count_ahead("LParen"))));
        let leaf = p.consume("Number")?;
        Ok(x.node(tokens([leaf])))
    })
    .token(number_token())
    .token(TokenDef::literal("LParen", "("))
    .init(|ctx| ctx.set(KEY, 1));
    let grammar = bases_only(vec![snapshot]);

    let cst = grammar.expect_valid("5");

    assert_eq!(cst.text(), "5");
    assert_eq!(observed.get(), Some((0, 1, 0)));
}

#[test]
fn context_values() {
    let mut ctx = ParseContext::new();
    assert!(ctx.is_empty());
    assert_eq!(ctx.get("depth"), 0);

    assert_eq!(ctx.increment("depth"), 1);
    assert_eq!(ctx.increment("depth"), 2);
    assert_eq!(ctx.decrement("depth"), 1);
    ctx.set("other", -3);
    assert_eq!(ctx.get("other"), -3);

    ctx.reset("depth");
    assert_eq!(ctx.get("depth"), 0);
    ctx.reset("other");
    assert!(ctx.is_empty());
}
