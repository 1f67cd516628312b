//! Parser state and low-level operations.

use indexmap::IndexSet;
use rowan::{TextRange, TextSize};
use stratum_core::{Leaf, RecoveryId};

use super::ParseFailure;
use super::context::ParseContext;
use crate::Error;
use crate::config::ParserConfig;
use crate::diagnostics::DiagnosticKind;
use crate::grammar::Grammar;
use crate::lexer::{Token, TokenKind};

pub type ParseResult<T> = std::result::Result<T, ParseFailure>;

/// Saved parser state. Reverting restores the cursor, removes synthetic
/// tokens inserted since, and restores the parse context.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub(super) pos: usize,
    context: ParseContext,
    insertions: usize,
    next_recovery_id: RecoveryId,
}

impl Checkpoint {
    /// Token index the checkpoint was taken at.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Synthetic tokens spliced into the token stream.
#[derive(Debug, Clone, Copy)]
struct Insertion {
    at: usize,
    count: usize,
}

/// Recursive-descent driver over one token stream.
///
/// Feature exec functions receive `&mut Parser` and build their node with
/// the primitives defined here and in the combinator and rule modules.
pub struct Parser<'a> {
    pub(super) grammar: &'a Grammar,
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    context: ParseContext,
    insertions: Vec<Insertion>,
    next_recovery_id: RecoveryId,
    depth: u32,
    exec_fuel_initial: Option<u32>,
    exec_fuel_remaining: Option<u32>,
    recursion_fuel_limit: Option<u32>,
    fatal_error: Option<Error>,
}

impl<'a> Parser<'a> {
    pub(super) fn new(grammar: &'a Grammar, source: &'a str, tokens: Vec<Token>) -> Self {
        let config = grammar.config();
        Self {
            grammar,
            source,
            tokens,
            pos: 0,
            context: ParseContext::new(),
            insertions: Vec::new(),
            next_recovery_id: 0,
            depth: 0,
            exec_fuel_initial: config.exec_fuel,
            exec_fuel_remaining: config.exec_fuel,
            recursion_fuel_limit: config.recursion_fuel,
            fatal_error: None,
        }
    }

    /// Runs every feature's init hook against a fresh context.
    pub(super) fn init_context(&mut self) {
        self.context = ParseContext::new();
        for feature in self.grammar.features() {
            if let Some(hook) = feature.init_hook() {
                hook(&mut self.context);
            }
        }
    }

    /// Fuel consumed so far, or the fatal error that stopped the parse.
    pub(super) fn finish(self) -> Result<u32, Error> {
        if let Some(err) = self.fatal_error {
            return Err(err);
        }
        let consumed = match (self.exec_fuel_initial, self.exec_fuel_remaining) {
            (Some(initial), Some(remaining)) => initial.saturating_sub(remaining),
            _ => 0,
        };
        Ok(consumed)
    }

    pub fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    pub fn config(&self) -> &'a ParserConfig {
        self.grammar.config()
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ParseContext {
        &mut self.context
    }

    /// Index of the next unconsumed token.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Whether the next token is of kind `name`.
    pub fn at(&self, name: &str) -> bool {
        self.nth_is(0, name)
    }

    /// Kind name of the token `n` positions ahead.
    pub fn nth(&self, n: usize) -> Option<&'a str> {
        let token = self.tokens.get(self.pos + n)?;
        Some(self.grammar.lexicon().name(token.kind))
    }

    pub fn nth_is(&self, n: usize, name: &str) -> bool {
        let kind = self.ensure_kind(name);
        self.tokens.get(self.pos + n).is_some_and(|t| t.kind == kind)
    }

    /// Tokens of kind `name` between the cursor and the end of input.
    pub fn count_ahead(&self, name: &str) -> usize {
        let kind = self.ensure_kind(name);
        self.tokens[self.pos..]
            .iter()
            .filter(|t| t.kind == kind)
            .count()
    }

    /// Source text of the next token, or `None` at end of input.
    pub fn current_text(&self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?;
        Some(self.token_text(token))
    }

    pub(super) fn current_span(&self) -> TextRange {
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    /// End of the last consumed token; where a missing token would go.
    fn previous_end(&self) -> TextSize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(TextSize::from(0), |t| t.span.end())
    }

    fn token_text(&self, token: &Token) -> &'a str {
        if token.synthetic.is_some() {
            return self.grammar.lexicon().literal(token.kind).unwrap_or_default();
        }
        &self.source[token.span]
    }

    /// Consume the next token if it is of kind `name`.
    pub fn consume(&mut self, name: &str) -> ParseResult<Leaf> {
        let kind = self.ensure_kind(name);
        let Some(&token) = self.tokens.get(self.pos).filter(|t| t.kind == kind) else {
            return Err(self.failure(DiagnosticKind::UnexpectedToken, [kind]));
        };
        self.consume_exec_fuel()?;

        let lexicon = self.grammar.lexicon();
        let text = self.token_text(&token);
        let leaf = match token.synthetic {
            Some(id) => Leaf::synthetic(lexicon.shared_name(kind), text, token.span.start(), id),
            None => Leaf::new(lexicon.shared_name(kind), text, token.span),
        };
        tracing::trace!(kind = name, text, pos = self.pos, "consume");
        self.pos += 1;
        Ok(leaf)
    }

    /// Splice `count` synthetic tokens of kind `name` in front of the cursor.
    pub fn insert_synthetic(&mut self, name: &str, count: usize) {
        if count == 0 {
            return;
        }
        let kind = self.ensure_kind(name);
        self.ensure_literal(kind);
        let span = TextRange::empty(self.current_span().start());
        let tokens: Vec<_> = (0..count)
            .map(|_| Token {
                kind,
                span,
                synthetic: Some(self.fresh_recovery_id()),
            })
            .collect();
        self.tokens.splice(self.pos..self.pos, tokens);
        self.insertions.push(Insertion {
            at: self.pos,
            count,
        });
        tracing::debug!(kind = name, count, pos = self.pos, "inserted synthetic tokens");
    }

    /// Zero-width leaf of kind `name` pinned after the last consumed token,
    /// standing in for a token missing from the input.
    pub fn synthetic_leaf(&mut self, name: &str) -> Leaf {
        let kind = self.ensure_kind(name);
        let text = self.ensure_literal(kind).to_owned();
        let id = self.fresh_recovery_id();
        Leaf::synthetic(
            self.grammar.lexicon().shared_name(kind),
            text,
            self.previous_end(),
            id,
        )
    }

    fn fresh_recovery_id(&mut self) -> RecoveryId {
        let id = self.next_recovery_id;
        self.next_recovery_id += 1;
        id
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            context: self.context.clone(),
            insertions: self.insertions.len(),
            next_recovery_id: self.next_recovery_id,
        }
    }

    pub fn revert(&mut self, checkpoint: Checkpoint) {
        while self.insertions.len() > checkpoint.insertions {
            let Some(insertion) = self.insertions.pop() else {
                break;
            };
            self.tokens
                .drain(insertion.at..insertion.at + insertion.count);
        }
        self.pos = checkpoint.pos;
        self.context = checkpoint.context;
        self.next_recovery_id = checkpoint.next_recovery_id;
    }

    /// Failure at the cursor. At end of input the kind becomes
    /// [`DiagnosticKind::UnexpectedEndOfInput`].
    pub fn failure(
        &self,
        kind: DiagnosticKind,
        expected: impl IntoIterator<Item = TokenKind>,
    ) -> ParseFailure {
        let kind = match kind {
            DiagnosticKind::UnexpectedToken | DiagnosticKind::NoViableAlternative
                if self.at_eof() =>
            {
                DiagnosticKind::UnexpectedEndOfInput
            }
            other => other,
        };
        ParseFailure {
            kind,
            pos: self.pos,
            range: self.current_span(),
            expected: expected.into_iter().collect::<IndexSet<_>>(),
            fatal: false,
        }
    }

    /// Failure at the cursor expecting the named token kinds.
    pub fn expected<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> ParseFailure {
        let kinds: Vec<_> = names.into_iter().map(|n| self.ensure_kind(n)).collect();
        self.failure(DiagnosticKind::UnexpectedToken, kinds)
    }

    fn fatal(&mut self, error: Error) -> ParseFailure {
        if self.fatal_error.is_none() {
            self.fatal_error = Some(error);
        }
        ParseFailure {
            kind: DiagnosticKind::NoViableAlternative,
            pos: self.pos,
            range: self.current_span(),
            expected: IndexSet::new(),
            fatal: true,
        }
    }

    fn consume_exec_fuel(&mut self) -> ParseResult<()> {
        if let Some(ref mut remaining) = self.exec_fuel_remaining {
            if *remaining == 0 {
                return Err(self.fatal(Error::ExecFuelExhausted));
            }
            *remaining -= 1;
        }
        Ok(())
    }

    pub(super) fn enter_recursion(&mut self) -> ParseResult<()> {
        if let Some(limit) = self.recursion_fuel_limit
            && self.depth >= limit
        {
            return Err(self.fatal(Error::RecursionLimitExceeded));
        }
        self.depth += 1;
        Ok(())
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
