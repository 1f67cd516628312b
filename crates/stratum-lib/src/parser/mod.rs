//! Recursive-descent driver for compiled grammars.
//!
//! # Architecture
//!
//! Tokens are lexed up front into a vector; the parser is a cursor into it.
//! Every rule is a plain method and every feature an exec function handed
//! `&mut Parser`. Backtracking is explicit: a [`Checkpoint`] captures the
//! cursor, the synthetic tokens inserted so far and the [`ParseContext`].
//!
//! Failures are values ([`ParseFailure`]) propagated with `?`. A failure
//! that consumed tokens is committed and aborts the enclosing alternatives;
//! one that did not lets the next alternative run. At the parse boundary
//! the surviving failure is turned into a diagnostic.
//!
//! Fuel exhaustion (exec_fuel, recursion_fuel) is the only fatal outcome and
//! surfaces as an [`Error`](crate::Error) rather than a diagnostic.

mod combinators;
mod context;
mod core;
mod invariants;
mod rules;

#[cfg(test)]
mod combinators_tests;

use indexmap::IndexSet;
use rowan::TextRange;
use stratum_core::{Leaf, Node, NodeOrToken};

pub use combinators::Speculation;
pub use context::ParseContext;
pub use core::{Checkpoint, ParseResult, Parser};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::Grammar;
use crate::lexer::TokenKind;
use crate::recovery::{Interpretations, Validators};
use crate::Result;

/// A failed rule or token match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub(crate) kind: DiagnosticKind,
    /// Token index the failure happened at.
    pub(crate) pos: usize,
    pub(crate) range: TextRange,
    pub(crate) expected: IndexSet<TokenKind>,
    pub(crate) fatal: bool,
}

impl ParseFailure {
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn expected(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.expected.iter().copied()
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Fatal, or happened past `start`.
    pub fn is_committed(&self, start: usize) -> bool {
        self.fatal || self.pos > start
    }

    pub(crate) fn at(mut self, pos: usize) -> Self {
        self.pos = pos;
        self
    }
}

/// Result of parsing one input.
#[derive(Debug)]
pub struct ParseOutput {
    cst: Option<Node>,
    diagnostics: Diagnostics,
    exec_fuel_consumed: u32,
}

impl ParseOutput {
    /// The tree, if parsing got far enough to build one. Present alongside
    /// a not-all-input-consumed error.
    pub fn cst(&self) -> Option<&Node> {
        self.cst.as_ref()
    }

    pub fn into_cst(self) -> Option<Node> {
        self.cst
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn exec_fuel_consumed(&self) -> u32 {
        self.exec_fuel_consumed
    }

    /// A tree was built and no errors were reported. Warnings about
    /// inserted brackets do not count.
    pub fn is_valid(&self) -> bool {
        self.cst.is_some() && !self.diagnostics.has_errors()
    }

    /// Whether the tree contains synthetic brackets.
    pub fn has_recovery(&self) -> bool {
        self.cst
            .as_ref()
            .is_some_and(|cst| cst.leaves().iter().any(|l| l.is_synthetic()))
    }

    /// Every legal bracketing of the tree, the parsed one first.
    pub fn interpretations<'v>(&self, validators: &'v Validators) -> Interpretations<'v> {
        Interpretations::new(self.cst.clone(), validators)
    }

    /// Like [`ParseOutput::interpretations`], without the parsed tree.
    pub fn alternatives<'v>(&self, validators: &'v Validators) -> std::iter::Skip<Interpretations<'v>> {
        self.interpretations(validators).skip(1)
    }
}

/// Lex and parse `source` as one expression. Returns Err on fuel exhaustion.
pub(crate) fn parse(grammar: &Grammar, source: &str) -> Result<ParseOutput> {
    let lexed = grammar.lexicon().lex(source);
    let mut diagnostics = Diagnostics::new();

    if !lexed.unknown.is_empty() {
        for range in lexed.unknown {
            let text = &source[range];
            let mut report = diagnostics
                .report(DiagnosticKind::UnknownCharacter, range)
                .message(text);
            if let Some(s) = grammar.suggestion_for(text) {
                report = report.fix(format!("replace with `{}`", s.replacement), &s.replacement);
            }
            report.emit();
        }
        return Ok(ParseOutput {
            cst: None,
            diagnostics,
            exec_fuel_consumed: 0,
        });
    }

    let mut parser = Parser::new(grammar, source, lexed.tokens);
    parser.init_context();
    let result = parser.call(grammar.top_rule());

    let cst = match result {
        Ok(node) => {
            if let Some(text) = parser.current_text() {
                let mut report = diagnostics
                    .report(DiagnosticKind::NotAllInputConsumed, parser.current_span())
                    .message(text);
                if let Some(s) = grammar.suggestion_for(text) {
                    report =
                        report.fix(format!("replace with `{}`", s.replacement), &s.replacement);
                }
                report.emit();
            }
            Some(node)
        }
        Err(failure) => {
            if !failure.is_fatal() {
                report_failure(grammar, source, &failure, &mut diagnostics);
            }
            None
        }
    };
    // Fatal failures recorded their error; it wins over any diagnostics.
    let exec_fuel_consumed = parser.finish()?;

    if let Some(cst) = &cst {
        let mut inserted = Vec::new();
        collect_inserted(cst, &mut inserted);
        for InsertedBracket { leaf, partner } in inserted {
            let mut report = diagnostics
                .report(DiagnosticKind::InsertedBracket, leaf.range())
                .message(leaf.text())
                .inserted(leaf.text());
            if let Some((real, note)) = partner {
                report = report.related_to(note, real.range());
            }
            report.emit();
        }
    }

    tracing::debug!(
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        exec_fuel_consumed,
        "parsed"
    );
    Ok(ParseOutput {
        cst,
        diagnostics,
        exec_fuel_consumed,
    })
}

struct InsertedBracket {
    leaf: Leaf,
    /// Real bracket of the same group, and what it marks.
    partner: Option<(Leaf, &'static str)>,
}

/// Synthetic brackets in source order.
fn collect_inserted(node: &Node, out: &mut Vec<InsertedBracket>) {
    for (i, child) in node.children().iter().enumerate() {
        let leaf = match child {
            NodeOrToken::Node(n) => {
                collect_inserted(n, out);
                continue;
            }
            NodeOrToken::Token(leaf) if leaf.is_synthetic() => leaf,
            NodeOrToken::Token(_) => continue,
        };
        let (other, note) = if i == 0 {
            (node.last_child(), "closed here")
        } else {
            (node.first_child(), "opened here")
        };
        let partner = other
            .and_then(|c| c.as_token())
            .filter(|l| !l.is_synthetic())
            .map(|l| (l.clone(), note));
        out.push(InsertedBracket {
            leaf: leaf.clone(),
            partner,
        });
    }
}

fn report_failure(
    grammar: &Grammar,
    source: &str,
    failure: &ParseFailure,
    diagnostics: &mut Diagnostics,
) {
    let lexicon = grammar.lexicon();
    let expected: Vec<&str> = failure.expected().map(|k| lexicon.name(k)).collect();
    let found = if failure.range.is_empty() {
        None
    } else {
        Some(&source[failure.range])
    };

    let mut parts = Vec::with_capacity(2);
    if let Some(text) = found {
        parts.push(format!("found `{text}`"));
    }
    match expected.as_slice() {
        [] => {}
        [one] => parts.push(format!("expected `{one}`")),
        many => {
            let list: Vec<_> = many.iter().map(|k| format!("`{k}`")).collect();
            parts.push(format!("expected one of {}", list.join(", ")));
        }
    }

    let mut report = diagnostics.report(failure.kind, failure.range);
    if !parts.is_empty() {
        report = report.message(parts.join(", "));
    }
    let mut report = report.expected(expected);
    if let Some(s) = found.and_then(|text| grammar.suggestion_for(text)) {
        report = report.fix(format!("replace with `{}`", s.replacement), &s.replacement);
    }
    report.emit();
}
