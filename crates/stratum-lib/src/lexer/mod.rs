//! Token kinds assembled at grammar build time.
//!
//! Features declare the token kinds they consume as [`TokenDef`]s. The
//! [`Lexicon`] merges those declarations, orders them, and matches them
//! first-match-wins at each input position. Byte offsets throughout.

mod lexicon;

#[cfg(test)]
mod lexer_tests;

use rowan::TextRange;
use stratum_core::RecoveryId;

pub use lexicon::{Lexed, Lexicon};

/// Token kind used for skipped whitespace, registered by every grammar.
pub const WHITESPACE: &str = "Whitespace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPattern {
    Literal(String),
    Regex(String),
}

/// Declaration of one token kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDef {
    name: String,
    pattern: TokenPattern,
    skip: bool,
    before: Vec<String>,
    longer_alt: Option<String>,
}

impl TokenDef {
    pub fn literal(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, TokenPattern::Literal(text.into()))
    }

    pub fn regex(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, TokenPattern::Regex(pattern.into()))
    }

    fn new(name: impl Into<String>, pattern: TokenPattern) -> Self {
        Self {
            name: name.into(),
            pattern,
            skip: false,
            before: Vec::new(),
            longer_alt: None,
        }
    }

    /// Matched but never handed to the parser.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Must be tried before `kind`, e.g. a keyword before identifiers.
    pub fn before(mut self, kind: impl Into<String>) -> Self {
        self.before.push(kind.into());
        self
    }

    /// When `kind` matches a longer text at the same position, it wins.
    pub fn longer_alt(mut self, kind: impl Into<String>) -> Self {
        self.longer_alt = Some(kind.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &TokenPattern {
        &self.pattern
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    pub(crate) fn whitespace() -> Self {
        Self::regex(WHITESPACE, r"\s+").skip()
    }
}

/// Index of a token kind inside its [`Lexicon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKind(u32);

impl TokenKind {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Zero-copy token: kind plus span into the source.
///
/// Synthetic tokens are inserted by recovery; their span is empty and
/// `synthetic` carries the recovery id handed to the resulting leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextRange,
    pub synthetic: Option<RecoveryId>,
}

impl Token {
    pub fn new(kind: TokenKind, span: TextRange) -> Self {
        Self {
            kind,
            span,
            synthetic: None,
        }
    }
}
