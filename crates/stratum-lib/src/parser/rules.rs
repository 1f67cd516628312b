//! Rule dispatch: layers, prefix fallthrough, base alternatives.

use stratum_core::Node;

use super::core::{ParseResult, Parser};
use crate::feature::{Exec, ExecFn};
use crate::grammar::{FeatureId, Rule};

/// Below this much remaining stack, a rule call grows the stack first.
const RED_ZONE: usize = 128 * 1024;

/// Size of each stack segment allocated on growth.
const STACK_PER_RECURSION: usize = 1024 * 1024;

impl Parser<'_> {
    /// Invoke a grammar rule. Each call costs one unit of recursion fuel.
    ///
    /// Every level of nesting passes through one rule per layer, so the
    /// native stack is grown on demand and only recursion fuel bounds depth.
    pub fn call(&mut self, rule: Rule) -> ParseResult<Node> {
        self.enter_recursion()?;
        tracing::trace!(?rule, pos = self.position(), "call");
        let result = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            match self.grammar.resolve(rule) {
                Rule::Layer(i) => self.parse_layer(i),
                Rule::Prefix(i) => self.parse_prefix(i),
                Rule::Base | Rule::Expression => self.parse_base(),
            }
        });
        self.exit_recursion();
        result
    }

    /// One operand, then infix and suffix features folded in as long as
    /// one of them matches.
    fn parse_layer(&mut self, i: usize) -> ParseResult<Node> {
        let grammar = self.grammar;
        let mut lhs = self.call(Rule::Prefix(i))?;
        'fold: loop {
            for &id in &grammar.layer(i).suffix {
                let operand = lhs.clone();
                if let Ok(node) = self.speculate(|p| p.run_feature(id, Some(operand)))? {
                    lhs = node;
                    continue 'fold;
                }
            }
            return Ok(lhs);
        }
    }

    fn parse_prefix(&mut self, i: usize) -> ParseResult<Node> {
        let grammar = self.grammar;
        let layer = grammar.layer(i);
        let mut failures = Vec::with_capacity(layer.prefix.len());
        for &id in &layer.prefix {
            match self.speculate(|p| p.run_feature(id, None))? {
                Ok(node) => return Ok(node),
                Err(failure) => failures.push(failure),
            }
        }
        if layer.exhaustive {
            return Err(self.no_viable(failures));
        }

        let start = self.position();
        match self.call(grammar.next_rule(i)) {
            Err(mut failure) if !failure.is_committed(start) => {
                for f in failures {
                    failure.expected.extend(f.expected);
                }
                Err(failure)
            }
            other => other,
        }
    }

    fn parse_base(&mut self) -> ParseResult<Node> {
        let grammar = self.grammar;
        let mut failures = Vec::with_capacity(grammar.bases().len());
        for &id in grammar.bases() {
            match self.speculate(|p| p.run_feature(id, None))? {
                Ok(node) => return Ok(node),
                Err(failure) => failures.push(failure),
            }
        }
        Err(self.no_viable(failures))
    }

    fn run_feature(&mut self, id: FeatureId, lhs: Option<Node>) -> ParseResult<Node> {
        let grammar = self.grammar;
        let feature = grammar.feature_at(id);
        let slot = grammar.slot(id);
        let exec = Exec::new(feature.shared_name(), slot.operator, slot.operand);
        match feature.exec_fn() {
            ExecFn::Prefix(f) => f(self, &exec),
            ExecFn::Suffix(f) => {
                let lhs = Self::ensure_lhs(lhs, feature.name());
                f(self, &exec, lhs)
            }
        }
    }
}
