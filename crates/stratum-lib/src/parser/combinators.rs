//! Combinators available to feature exec functions.
//!
//! Alternatives are ordered and commit on consume: a failure that did not
//! move past the starting token lets the caller try something else, one
//! that did is propagated as is.

use stratum_core::{Element, Node, NodeOrToken};

use super::core::{Checkpoint, ParseResult, Parser};
use super::ParseFailure;
use crate::diagnostics::DiagnosticKind;
use crate::grammar::Rule;

/// Outcome of a speculative call, with the state to revert to.
#[derive(Debug)]
pub struct Speculation<T> {
    pub result: ParseResult<T>,
    pub checkpoint: Checkpoint,
}

impl Parser<'_> {
    /// Runs `f`; an uncommitted failure is reverted and handed back as
    /// `Ok(Err(_))`, anything else passes through.
    pub(super) fn speculate<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Result<T, ParseFailure>> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => Ok(Ok(value)),
            Err(failure) if failure.is_committed(checkpoint.pos) => Err(failure),
            Err(failure) => {
                self.revert(checkpoint);
                Ok(Err(failure))
            }
        }
    }

    /// Runs `f` without reverting; the caller decides with the checkpoint.
    pub fn try_with<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> Speculation<T> {
        let checkpoint = self.checkpoint();
        let result = f(self);
        Speculation { result, checkpoint }
    }

    pub fn try_rule(&mut self, rule: Rule) -> Speculation<Node> {
        self.try_with(|p| p.call(rule))
    }

    /// Like `f`, but any non-fatal failure is reverted and reported as if
    /// nothing had been consumed, so enclosing alternatives still run.
    pub fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let Speculation { result, checkpoint } = self.try_with(f);
        match result {
            Err(failure) if !failure.is_fatal() => {
                let pos = checkpoint.pos;
                self.revert(checkpoint);
                Err(failure.at(pos))
            }
            other => other,
        }
    }

    pub fn optional<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Option<T>> {
        Ok(self.speculate(f)?.ok())
    }

    /// First alternative that succeeds. When all fail uncommitted, the
    /// failure is a no-viable-alternative carrying every expected kind.
    pub fn choice<T>(&mut self, alternatives: &[&dyn Fn(&mut Self) -> ParseResult<T>]) -> ParseResult<T> {
        let mut failures = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            match self.speculate(alternative)? {
                Ok(value) => return Ok(value),
                Err(failure) => failures.push(failure),
            }
        }
        Err(self.no_viable(failures))
    }

    /// Zero or more repetitions of `f`. Stops at the first uncommitted
    /// failure or at an iteration that consumed nothing.
    pub fn many<T>(&mut self, mut f: impl FnMut(&mut Self) -> ParseResult<T>) -> ParseResult<Vec<T>> {
        let mut items = Vec::new();
        loop {
            let start = self.position();
            match self.speculate(&mut f)? {
                Ok(item) => items.push(item),
                Err(_) => break,
            }
            if self.position() == start {
                break;
            }
        }
        Ok(items)
    }

    pub fn at_least_one<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        let first = self.first_repetition(&mut f)?;
        let mut items = vec![first];
        items.extend(self.many(f)?);
        Ok(items)
    }

    /// `f (sep f)*`, returning operands and separator leaves in order.
    pub fn at_least_one_sep(
        &mut self,
        sep: &str,
        mut f: impl FnMut(&mut Self) -> ParseResult<Node>,
    ) -> ParseResult<Vec<Element>> {
        let first = self.first_repetition(&mut f)?;
        let mut elements = vec![NodeOrToken::Node(first)];
        let rest = self.many(|p| {
            let leaf = p.consume(sep)?;
            let item = f(p)?;
            Ok((leaf, item))
        })?;
        for (leaf, item) in rest {
            elements.push(NodeOrToken::Token(leaf));
            elements.push(NodeOrToken::Node(item));
        }
        Ok(elements)
    }

    fn first_repetition<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        match self.speculate(f)? {
            Ok(item) => Ok(item),
            Err(failure) => {
                let expected = failure.expected.iter().copied();
                Err(self.failure(DiagnosticKind::EarlyExit, expected))
            }
        }
    }

    /// Merges uncommitted failures at the cursor into one.
    pub(super) fn no_viable(&self, failures: Vec<ParseFailure>) -> ParseFailure {
        let expected = failures.into_iter().flat_map(|f| f.expected);
        self.failure(DiagnosticKind::NoViableAlternative, expected)
    }
}
