use std::rc::Rc;

use indexmap::IndexMap;
use regex_automata::dfa::{Automaton, StartKind, dense};
use regex_automata::{Anchored, Input};
use rowan::{TextRange, TextSize};

use super::{Token, TokenDef, TokenKind, TokenPattern};
use crate::Error;

enum Matcher {
    Literal(String),
    Regex(dense::DFA<Vec<u32>>),
}

impl Matcher {
    fn compile(def: &TokenDef) -> Result<Self, Error> {
        match def.pattern() {
            TokenPattern::Literal(text) if text.is_empty() => {
                Err(Error::EmptyTokenPattern(def.name().to_string()))
            }
            TokenPattern::Literal(text) => Ok(Self::Literal(text.clone())),
            TokenPattern::Regex(pattern) => {
                let invalid = |message: String| Error::InvalidTokenPattern {
                    kind: def.name().to_string(),
                    message,
                };
                let hir = regex_syntax::parse(pattern).map_err(|e| invalid(e.to_string()))?;
                if hir.properties().minimum_len() == Some(0) {
                    return Err(Error::EmptyTokenPattern(def.name().to_string()));
                }
                let dfa = dense::DFA::builder()
                    .configure(dense::DFA::config().start_kind(StartKind::Anchored))
                    .build(pattern)
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(Self::Regex(dfa))
            }
        }
    }

    fn match_len(&self, source: &str, pos: usize) -> Option<usize> {
        let len = match self {
            Self::Literal(text) => source[pos..].starts_with(text.as_str()).then_some(text.len()),
            Self::Regex(dfa) => {
                let input = Input::new(source).range(pos..).anchored(Anchored::Yes);
                // Half matches end at the leftmost-first match; the start is `pos`.
                dfa.try_search_fwd(&input)
                    .ok()
                    .flatten()
                    .map(|m| m.offset() - pos)
            }
        };
        len.filter(|&n| n > 0)
    }
}

struct KindInfo {
    name: Rc<str>,
    matcher: Matcher,
    skip: bool,
    longer_alt: Option<TokenKind>,
}

/// Compiled token set.
pub struct Lexicon {
    kinds: Vec<KindInfo>,
    by_name: IndexMap<String, TokenKind>,
    order: Vec<TokenKind>,
}

/// Output of [`Lexicon::lex`]: kept tokens and runs of unrecognized input.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub unknown: Vec<TextRange>,
}

impl Lexicon {
    /// Merge declarations in registration order and fix the match order.
    ///
    /// Re-declaring a kind with the same pattern is allowed (two features
    /// may share a bracket); a different pattern is an error.
    pub fn build(defs: impl IntoIterator<Item = TokenDef>) -> Result<Self, Error> {
        let mut merged: IndexMap<String, TokenDef> = IndexMap::new();
        for def in defs {
            match merged.get_mut(def.name()) {
                None => {
                    merged.insert(def.name().to_string(), def);
                }
                Some(existing) => {
                    if existing.pattern != def.pattern || existing.skip != def.skip {
                        return Err(Error::ConflictingToken(def.name().to_string()));
                    }
                    for target in def.before {
                        if !existing.before.contains(&target) {
                            existing.before.push(target);
                        }
                    }
                    if existing.longer_alt.is_none() {
                        existing.longer_alt = def.longer_alt;
                    }
                }
            }
        }

        let by_name: IndexMap<String, TokenKind> = merged
            .keys()
            .enumerate()
            .map(|(i, name)| (name.clone(), TokenKind(i as u32)))
            .collect();
        let resolve = |kind: &str, target: &str| {
            by_name
                .get(target)
                .copied()
                .ok_or_else(|| Error::UnknownTokenKind {
                    kind: kind.to_string(),
                    target: target.to_string(),
                })
        };

        let mut kinds = Vec::with_capacity(merged.len());
        let mut edges: Vec<Vec<TokenKind>> = Vec::with_capacity(merged.len());
        for def in merged.values() {
            let longer_alt = def
                .longer_alt
                .as_deref()
                .map(|t| resolve(def.name(), t))
                .transpose()?;
            let before = def
                .before
                .iter()
                .map(|t| resolve(def.name(), t))
                .collect::<Result<Vec<_>, _>>()?;
            edges.push(before);
            kinds.push(KindInfo {
                name: Rc::from(def.name()),
                matcher: Matcher::compile(def)?,
                skip: def.skip,
                longer_alt,
            });
        }

        let order = match_order(&kinds, &edges)?;
        tracing::debug!(
            order = ?order.iter().map(|k| &*kinds[k.index()].name).collect::<Vec<_>>(),
            "token match order"
        );

        Ok(Self {
            kinds,
            by_name,
            order,
        })
    }

    pub fn kind(&self, name: &str) -> Option<TokenKind> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, kind: TokenKind) -> &str {
        &self.kinds[kind.index()].name
    }

    pub(crate) fn shared_name(&self, kind: TokenKind) -> Rc<str> {
        self.kinds[kind.index()].name.clone()
    }

    /// Fixed text of a literal kind; what a synthetic token of that kind reads as.
    pub fn literal(&self, kind: TokenKind) -> Option<&str> {
        match &self.kinds[kind.index()].matcher {
            Matcher::Literal(text) => Some(text),
            Matcher::Regex(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Tokenize `source`. Skipped kinds are dropped; consecutive unmatched
    /// characters are reported as one range.
    pub fn lex(&self, source: &str) -> Lexed {
        let mut lexed = Lexed::default();
        let mut unknown_start: Option<usize> = None;
        let mut pos = 0;

        while pos < source.len() {
            let Some((kind, len)) = self.match_at(source, pos) else {
                unknown_start.get_or_insert(pos);
                pos += source[pos..].chars().next().map_or(1, char::len_utf8);
                continue;
            };

            if let Some(start) = unknown_start.take() {
                lexed.unknown.push(range(start, pos));
            }
            if !self.kinds[kind.index()].skip {
                lexed.tokens.push(Token::new(kind, range(pos, pos + len)));
            }
            pos += len;
        }

        if let Some(start) = unknown_start {
            lexed.unknown.push(range(start, source.len()));
        }
        tracing::trace!(
            tokens = lexed.tokens.len(),
            unknown = lexed.unknown.len(),
            "lexed"
        );
        lexed
    }

    fn match_at(&self, source: &str, pos: usize) -> Option<(TokenKind, usize)> {
        for &kind in &self.order {
            let info = &self.kinds[kind.index()];
            let Some(len) = info.matcher.match_len(source, pos) else {
                continue;
            };
            if let Some(alt) = info.longer_alt
                && let Some(alt_len) = self.kinds[alt.index()].matcher.match_len(source, pos)
                && alt_len > len
            {
                return Some((alt, alt_len));
            }
            return Some((kind, len));
        }
        None
    }
}

/// Registration order, except that every `before` edge is honored.
fn match_order(kinds: &[KindInfo], edges: &[Vec<TokenKind>]) -> Result<Vec<TokenKind>, Error> {
    let mut indegree = vec![0usize; kinds.len()];
    for targets in edges {
        for t in targets {
            indegree[t.index()] += 1;
        }
    }

    let mut emitted = vec![false; kinds.len()];
    let mut order = Vec::with_capacity(kinds.len());
    while order.len() < kinds.len() {
        let Some(next) = (0..kinds.len()).find(|&i| !emitted[i] && indegree[i] == 0) else {
            let stuck = (0..kinds.len()).find(|&i| !emitted[i]).unwrap_or_default();
            return Err(Error::TokenOrderCycle(kinds[stuck].name.to_string()));
        };
        emitted[next] = true;
        for t in &edges[next] {
            indegree[t.index()] -= 1;
        }
        order.push(TokenKind(next as u32));
    }
    Ok(order)
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}
