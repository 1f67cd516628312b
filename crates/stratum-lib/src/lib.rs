//! Stratum: operator-precedence expression parsers assembled from features.
//!
//! Every operator, literal and grouping construct is a [`Feature`] that
//! declares its fixity and its precedence relative to other features. A
//! [`Grammar`] orders those declarations into precedence layers and parses
//! with a recursive-descent driver. Inputs with unbalanced brackets are
//! repaired with synthetic brackets, and [`recovery`] enumerates every other
//! legal placement of them.
//!
//! # Example
//!
//! ```
//! use stratum_lib::builtin;
//!
//! let grammar = builtin::grammar().expect("built-in features are consistent");
//! let parse = grammar.parse("2 * 3 + 4)").expect("within fuel limits");
//!
//! assert!(parse.is_valid());
//! assert_eq!(parse.cst().unwrap().display_text(), "(2*3+4)");
//!
//! let others: Vec<_> = parse
//!     .alternatives(&builtin::validators())
//!     .map(|tree| tree.display_text())
//!     .collect();
//! assert_eq!(others, ["2*(3+4)"]);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod builtin;
pub mod config;
pub mod diagnostics;
pub mod feature;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod recovery;

#[cfg(test)]
mod test_utils;

pub use config::ParserConfig;
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use feature::{Exec, Feature, Relation};
pub use grammar::{Grammar, Rule};
pub use lexer::{TokenDef, TokenPattern};
pub use parser::{ParseContext, ParseOutput, Parser};
pub use recovery::{Validators, fits};

pub use stratum_core::{Assoc, Element, Fixity, Leaf, Node, NodeOrToken, Operator, Path};

/// Fatal errors: invalid feature sets, and exhausted fuel during a parse.
///
/// Ordinary syntax errors are never reported this way; they are collected
/// into [`Diagnostics`] next to a best-effort tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("precedence dependency cycle involving feature `{0}`")]
    PrecedenceCycle(String),

    #[error("feature `{feature}` references unknown feature `{target}`")]
    UnknownFeature { feature: String, target: String },

    #[error("feature `{0}` is declared more than once")]
    DuplicateFeature(String),

    /// A base feature among the operators, or the other way around.
    #[error("feature `{feature}` is `{fixity}` and cannot be supplied as {expected}")]
    MisplacedFeature {
        feature: String,
        fixity: Fixity,
        expected: &'static str,
    },

    #[error("token kind `{kind}` has an invalid pattern: {message}")]
    InvalidTokenPattern { kind: String, message: String },

    #[error("token kind `{0}` can match the empty string")]
    EmptyTokenPattern(String),

    #[error("token kind `{0}` is declared with conflicting patterns")]
    ConflictingToken(String),

    #[error("token ordering cycle involving `{0}`")]
    TokenOrderCycle(String),

    #[error("token kind `{kind}` refers to unknown token kind `{target}`")]
    UnknownTokenKind { kind: String, target: String },

    /// Execution fuel exhausted (too many consumed tokens).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}

pub type Result<T> = std::result::Result<T, Error>;
