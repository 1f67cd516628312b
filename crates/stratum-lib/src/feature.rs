//! Feature descriptors: one per operator, literal or grouping construct.
//!
//! A feature pairs a fixity and a precedence [`Relation`] with an exec
//! function that drives the [`Parser`] to build its node. Features are
//! immutable once built and shared by every parse of a [`Grammar`].
//!
//! [`Grammar`]: crate::Grammar

use std::fmt;
use std::rc::Rc;

use stratum_core::{Assoc, Element, Fixity, Node, NodeOrToken, Operator};

use crate::grammar::Rule;
use crate::lexer::TokenDef;
use crate::parser::{ParseContext, ParseResult, Parser};

/// Exec for base, prefix and prefix-base features.
pub type PrefixExec = Rc<dyn Fn(&mut Parser<'_>, &Exec) -> ParseResult<Node>>;

/// Exec for infix and suffix features; receives the already parsed operand.
pub type SuffixExec = Rc<dyn Fn(&mut Parser<'_>, &Exec, Node) -> ParseResult<Node>>;

/// Resets a feature's per-parse state at the start of every parse.
pub type InitHook = Rc<dyn Fn(&mut ParseContext)>;

#[derive(Clone)]
pub(crate) enum ExecFn {
    Prefix(PrefixExec),
    Suffix(SuffixExec),
}

/// Where a feature sits relative to other features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// A new layer binding looser than every named feature.
    /// Empty means a new tightest layer.
    LowerThan(Vec<String>),
    /// Joins the named feature's layer.
    SameAs { feature: String, match_after: bool },
}

impl Relation {
    pub fn lower_than<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::LowerThan(features.into_iter().map(Into::into).collect())
    }

    /// New tightest layer.
    pub fn highest() -> Self {
        Self::LowerThan(Vec::new())
    }

    pub fn same_as(feature: impl Into<String>) -> Self {
        Self::SameAs {
            feature: feature.into(),
            match_after: false,
        }
    }

    pub fn same_as_after(feature: impl Into<String>) -> Self {
        Self::SameAs {
            feature: feature.into(),
            match_after: true,
        }
    }

    pub fn targets(&self) -> Vec<&str> {
        match self {
            Self::LowerThan(features) => features.iter().map(String::as_str).collect(),
            Self::SameAs { feature, .. } => vec![feature.as_str()],
        }
    }
}

/// Replacement offered when the offending text equals `found`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub found: String,
    pub replacement: String,
}

#[derive(Clone)]
pub struct Feature {
    name: Rc<str>,
    fixity: Fixity,
    assoc: Option<Assoc>,
    relation: Relation,
    tokens: Vec<TokenDef>,
    exec: ExecFn,
    init: Option<InitHook>,
    suggestions: Vec<Suggestion>,
}

impl Feature {
    fn new(name: &str, fixity: Fixity, relation: Relation, exec: ExecFn) -> Self {
        Self {
            name: Rc::from(name),
            fixity,
            assoc: None,
            relation,
            tokens: Vec::new(),
            exec,
            init: None,
            suggestions: Vec::new(),
        }
    }

    /// Non-recursive alternative of the implicit tightest layer.
    pub fn base<F>(name: &str, exec: F) -> Self
    where
        F: Fn(&mut Parser<'_>, &Exec) -> ParseResult<Node> + 'static,
    {
        Self::new(
            name,
            Fixity::Base,
            Relation::highest(),
            ExecFn::Prefix(Rc::new(exec)),
        )
    }

    pub fn prefix<F>(name: &str, relation: Relation, exec: F) -> Self
    where
        F: Fn(&mut Parser<'_>, &Exec) -> ParseResult<Node> + 'static,
    {
        Self::new(name, Fixity::Prefix, relation, ExecFn::Prefix(Rc::new(exec)))
    }

    /// Prefix construct that makes its layer's prefix rule exhaustive.
    pub fn prefix_base<F>(name: &str, relation: Relation, exec: F) -> Self
    where
        F: Fn(&mut Parser<'_>, &Exec) -> ParseResult<Node> + 'static,
    {
        Self::new(
            name,
            Fixity::PrefixBase,
            relation,
            ExecFn::Prefix(Rc::new(exec)),
        )
    }

    pub fn infix<F>(name: &str, assoc: Assoc, relation: Relation, exec: F) -> Self
    where
        F: Fn(&mut Parser<'_>, &Exec, Node) -> ParseResult<Node> + 'static,
    {
        let mut feature = Self::new(name, Fixity::Infix, relation, ExecFn::Suffix(Rc::new(exec)));
        feature.assoc = Some(assoc);
        feature
    }

    pub fn suffix<F>(name: &str, relation: Relation, exec: F) -> Self
    where
        F: Fn(&mut Parser<'_>, &Exec, Node) -> ParseResult<Node> + 'static,
    {
        Self::new(name, Fixity::Suffix, relation, ExecFn::Suffix(Rc::new(exec)))
    }

    /// `lhs <token> operand`.
    pub fn binary(name: &str, assoc: Assoc, relation: Relation, token: TokenDef) -> Self {
        let kind = token.name().to_string();
        Self::infix(name, assoc, relation, move |p, x, lhs| {
            let op = p.consume(&kind)?;
            let rhs = p.call(x.operand())?;
            Ok(x.node(vec![
                NodeOrToken::Node(lhs),
                NodeOrToken::Token(op),
                NodeOrToken::Node(rhs),
            ]))
        })
        .token(token)
    }

    /// `<token> operand`.
    pub fn unary(name: &str, relation: Relation, token: TokenDef) -> Self {
        let kind = token.name().to_string();
        Self::prefix(name, relation, move |p, x| {
            let op = p.consume(&kind)?;
            let operand = p.call(x.operand())?;
            Ok(x.node(vec![NodeOrToken::Token(op), NodeOrToken::Node(operand)]))
        })
        .token(token)
    }

    /// `lhs <token>`.
    pub fn postfix(name: &str, relation: Relation, token: TokenDef) -> Self {
        let kind = token.name().to_string();
        Self::suffix(name, relation, move |p, x, lhs| {
            let op = p.consume(&kind)?;
            Ok(x.node(vec![NodeOrToken::Node(lhs), NodeOrToken::Token(op)]))
        })
        .token(token)
    }

    /// A single token wrapped in a node.
    pub fn terminal(name: &str, token: TokenDef) -> Self {
        let kind = token.name().to_string();
        Self::base(name, move |p, x| {
            let leaf = p.consume(&kind)?;
            Ok(x.node(vec![NodeOrToken::Token(leaf)]))
        })
        .token(token)
    }

    pub fn token(mut self, token: TokenDef) -> Self {
        self.tokens.push(token);
        self
    }

    pub fn init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ParseContext) + 'static,
    {
        self.init = Some(Rc::new(hook));
        self
    }

    pub fn suggest(mut self, found: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.suggestions.push(Suggestion {
            found: found.into(),
            replacement: replacement.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fixity(&self) -> Fixity {
        self.fixity
    }

    pub fn assoc(&self) -> Option<Assoc> {
        self.assoc
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn tokens(&self) -> &[TokenDef] {
        &self.tokens
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub(crate) fn shared_name(&self) -> Rc<str> {
        self.name.clone()
    }

    pub(crate) fn exec_fn(&self) -> &ExecFn {
        &self.exec
    }

    pub(crate) fn init_hook(&self) -> Option<&InitHook> {
        self.init.as_ref()
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("fixity", &self.fixity)
            .field("assoc", &self.assoc)
            .field("relation", &self.relation)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

/// What the driver knows about the feature it is executing.
#[derive(Debug, Clone)]
pub struct Exec {
    kind: Rc<str>,
    operator: Option<Operator>,
    operand: Rule,
}

impl Exec {
    pub(crate) fn new(kind: Rc<str>, operator: Option<Operator>, operand: Rule) -> Self {
        Self {
            kind,
            operator,
            operand,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// Rule for this feature's recursive operand, fixed by layer and associativity.
    pub fn operand(&self) -> Rule {
        self.operand
    }

    /// Node typed after the feature, stamped with its precedence metadata.
    pub fn node(&self, children: Vec<Element>) -> Node {
        Node::new(self.kind.clone(), children, self.operator)
    }

    /// Node with a custom type but the feature's precedence metadata.
    pub fn node_of_kind(&self, kind: &str, children: Vec<Element>) -> Node {
        Node::new(kind, children, self.operator)
    }
}
