//! Arithmetic feature set.
//!
//! Numbers, variables, calls and groups at the base; `+ -`, `* / mod`,
//! unary `-`, right-associative `^` and postfix `!` above, loosest first.
//! With recovery, unbalanced parentheses are repaired.

use stratum_core::{Assoc, NodeOrToken};

use crate::feature::{Feature, Relation};
use crate::grammar::{Grammar, Rule};
use crate::lexer::TokenDef;
use crate::recovery::{
    Brackets, IdenticalOperatorRun, PrecedenceInvariant, RedundantGroup, Validators,
    group_recovery, group_recovery_base,
};
use crate::Result;

pub const NUMBER: &str = r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?";
pub const IDENTIFIER: &str = r"[A-Za-z_][A-Za-z0-9_]*";

pub fn number() -> Feature {
    Feature::terminal("number", TokenDef::regex("Number", NUMBER))
}

pub fn variable() -> Feature {
    Feature::terminal("variable", TokenDef::regex("Identifier", IDENTIFIER))
}

/// `name(arg, ...)` with at least one argument.
pub fn call() -> Feature {
    Feature::base("call", |p, x| {
        if !(p.at("Identifier") && p.nth_is(1, "LParen")) {
            return Err(p.expected(["Identifier"]));
        }
        let name = p.consume("Identifier")?;
        let open = p.consume("LParen")?;
        let args = p.at_least_one_sep("Comma", |p| p.call(Rule::Expression))?;
        let close = p.consume("RParen")?;

        let mut children = Vec::with_capacity(args.len() + 3);
        children.push(NodeOrToken::Token(name));
        children.push(NodeOrToken::Token(open));
        children.extend(args);
        children.push(NodeOrToken::Token(close));
        Ok(x.node(children))
    })
    .token(TokenDef::regex("Identifier", IDENTIFIER))
    .token(TokenDef::literal("LParen", "("))
    .token(TokenDef::literal("Comma", ","))
    .token(TokenDef::literal("RParen", ")"))
}

/// Parenthesized expression without recovery.
pub fn group() -> Feature {
    Feature::base("group", |p, x| {
        let open = p.consume("LParen")?;
        let content = p.call(Rule::Expression)?;
        let close = p.consume("RParen")?;
        Ok(x.node(vec![
            NodeOrToken::Token(open),
            NodeOrToken::Node(content),
            NodeOrToken::Token(close),
        ]))
    })
    .token(TokenDef::literal("LParen", "("))
    .token(TokenDef::literal("RParen", ")"))
}

pub fn group_recovery_parens() -> Feature {
    group_recovery(Relation::lower_than(["add"]), Brackets::parens())
}

pub fn group_recovery_base_parens() -> Feature {
    group_recovery_base(Brackets::parens())
}

pub fn add() -> Feature {
    Feature::binary(
        "add",
        Assoc::Left,
        Relation::lower_than(["multiply"]),
        TokenDef::literal("Plus", "+"),
    )
}

pub fn subtract() -> Feature {
    Feature::binary(
        "subtract",
        Assoc::Left,
        Relation::same_as("add"),
        TokenDef::literal("Minus", "-"),
    )
}

pub fn multiply() -> Feature {
    Feature::binary(
        "multiply",
        Assoc::Left,
        Relation::lower_than(["unarySubtract"]),
        TokenDef::literal("Star", "*"),
    )
    .suggest("×", "*")
    .suggest("x", "*")
}

pub fn divide() -> Feature {
    Feature::binary(
        "divide",
        Assoc::Left,
        Relation::same_as("multiply"),
        TokenDef::literal("Slash", "/"),
    )
    .suggest("÷", "/")
}

pub fn modulo() -> Feature {
    Feature::binary(
        "modulo",
        Assoc::Left,
        Relation::same_as("multiply"),
        TokenDef::literal("Mod", "mod")
            .before("Identifier")
            .longer_alt("Identifier"),
    )
}

pub fn unary_subtract() -> Feature {
    Feature::unary(
        "unarySubtract",
        Relation::highest(),
        TokenDef::literal("Minus", "-"),
    )
}

pub fn exponent() -> Feature {
    Feature::binary(
        "exponent",
        Assoc::Right,
        Relation::highest(),
        TokenDef::literal("Caret", "^"),
    )
}

pub fn factorial() -> Feature {
    Feature::postfix(
        "factorial",
        Relation::highest(),
        TokenDef::literal("Bang", "!"),
    )
}

fn arithmetic() -> Vec<Feature> {
    vec![
        add(),
        subtract(),
        multiply(),
        divide(),
        modulo(),
        unary_subtract(),
        exponent(),
        factorial(),
    ]
}

/// Operators and bases of [`grammar`], in declaration order.
pub fn features() -> (Vec<Feature>, Vec<Feature>) {
    let mut operators = vec![group_recovery_parens()];
    operators.extend(arithmetic());
    let bases = vec![number(), call(), variable(), group_recovery_base_parens()];
    (operators, bases)
}

/// Arithmetic with bracket recovery.
pub fn grammar() -> Result<Grammar> {
    let (operators, bases) = features();
    Grammar::new(operators, bases)
}

/// Arithmetic where unbalanced brackets are plain syntax errors.
pub fn strict_grammar() -> Result<Grammar> {
    Grammar::new(arithmetic(), vec![number(), call(), variable(), group()])
}

/// Validators matching [`grammar`]: `+` and `*` are associative.
pub fn validators() -> Validators {
    Validators::new()
        .with_node(IdenticalOperatorRun::only(["add", "multiply"]))
        .with_node(RedundantGroup::strict())
        .with_tree(PrecedenceInvariant)
}
