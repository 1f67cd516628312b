//! Features that detect unbalanced brackets and repair them.

use stratum_core::{Node, NodeOrToken};

use super::{GROUP, RECOVERY_GROUP};
use crate::feature::{Exec, Feature, Relation};
use crate::grammar::Rule;
use crate::lexer::TokenDef;
use crate::parser::{ParseResult, Parser, Speculation};

const DEPTH: &str = "groupRecovery.depth";

/// Opening and closing token of a bracket pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brackets {
    pub open: TokenDef,
    pub close: TokenDef,
}

impl Brackets {
    pub fn new(open: TokenDef, close: TokenDef) -> Self {
        Self { open, close }
    }

    pub fn parens() -> Self {
        Self::new(
            TokenDef::literal("LParen", "("),
            TokenDef::literal("RParen", ")"),
        )
    }
}

/// Prefix-base feature wrapping the expression below it.
///
/// At the outermost entry it tries an increasing number of synthetic
/// openers in front of the input, as long as a parse succeeds and leaves a
/// closer as the next token. If every count up to the limit still leaves a
/// closer, the input is parsed without openers. Nested entries parse their
/// operand unchanged.
pub fn group_recovery(relation: Relation, brackets: Brackets) -> Feature {
    let open = brackets.open.name().to_string();
    let close = brackets.close.name().to_string();
    Feature::prefix_base("groupRecovery", relation, move |p, x| {
        let outermost = p.context().get(DEPTH) == 0;
        p.context_mut().increment(DEPTH);
        let result = if outermost {
            detect(p, x, &open, &close)
        } else {
            p.call(x.operand())
        };
        p.context_mut().decrement(DEPTH);
        result
    })
    .token(brackets.open)
    .token(brackets.close)
    .init(|ctx| ctx.set(DEPTH, 0))
}

fn detect(p: &mut Parser<'_>, x: &Exec, open: &str, close: &str) -> ParseResult<Node> {
    let limit = p.count_ahead(close).min(p.config().max_recovery_brackets);
    let mut accepted = 0;

    for k in 0..=limit {
        let Speculation { result, checkpoint } = p.try_with(|p| {
            p.insert_synthetic(open, k);
            p.call(x.operand())
        });
        match result {
            Ok(node) if !p.at(close) => {
                tracing::debug!(openers = k, "bracket recovery settled");
                return Ok(node);
            }
            Ok(_) if k < limit => {
                accepted = k;
                p.revert(checkpoint);
            }
            Ok(_) => {
                tracing::debug!(openers = k, "bracket recovery ran out of openers");
                accepted = 0;
                p.revert(checkpoint);
            }
            Err(failure) if k == 0 || failure.is_fatal() => return Err(failure),
            Err(_) => {
                p.revert(checkpoint);
                break;
            }
        }
    }

    tracing::debug!(openers = accepted, "bracket recovery fell back");
    p.insert_synthetic(open, accepted);
    p.call(x.operand())
}

/// Base feature for bracket groups; either bracket may be synthetic.
///
/// A missing closer is replaced by a synthetic one pinned after the group's
/// expression. Groups with a synthetic bracket get the `recoveryGroup` type.
pub fn group_recovery_base(brackets: Brackets) -> Feature {
    let open = brackets.open.name().to_string();
    let close = brackets.close.name().to_string();
    Feature::base("groupRecoveryBase", move |p, x| {
        let opener = p.consume(&open)?;
        let content = p.call(Rule::Expression)?;
        let closer = if p.at(&close) {
            p.consume(&close)?
        } else {
            p.synthetic_leaf(&close)
        };
        let kind = if opener.is_synthetic() || closer.is_synthetic() {
            RECOVERY_GROUP
        } else {
            GROUP
        };
        Ok(x.node_of_kind(
            kind,
            vec![
                NodeOrToken::Token(opener),
                NodeOrToken::Node(content),
                NodeOrToken::Token(closer),
            ],
        ))
    })
    .token(brackets.open)
    .token(brackets.close)
}
