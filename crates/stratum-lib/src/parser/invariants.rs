//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::core::Parser;
use crate::lexer::TokenKind;

impl Parser<'_> {
    /// Token kinds named by feature code must be declared by some feature.
    #[inline]
    pub(super) fn ensure_kind(&self, name: &str) -> TokenKind {
        self.grammar.lexicon().kind(name).unwrap_or_else(|| {
            panic!(
                "broken parser invariant: token kind `{name}` is not declared by any feature"
            )
        })
    }

    /// Only literal kinds have a fixed text to give a synthetic token.
    #[inline]
    pub(super) fn ensure_literal(&self, kind: TokenKind) -> &str {
        self.grammar.lexicon().literal(kind).unwrap_or_else(|| {
            panic!(
                "broken parser invariant: synthetic `{}` needs a literal token kind",
                self.grammar.lexicon().name(kind)
            )
        })
    }

    #[inline]
    pub(super) fn ensure_lhs(lhs: Option<stratum_core::Node>, feature: &str) -> stratum_core::Node {
        lhs.unwrap_or_else(|| {
            panic!("broken parser invariant: `{feature}` folds an operand but none was parsed")
        })
    }
}
