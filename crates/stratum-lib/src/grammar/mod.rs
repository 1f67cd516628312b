//! Compiles feature declarations into an executable grammar.
//!
//! Operator features are ordered by their precedence relations and grouped
//! into layers, lowest precedence first; a layer's index is the precedence
//! stamped on the nodes its features build. Each layer gets two rules:
//!
//! - a **prefix rule** trying the layer's prefix features in order, falling
//!   through to the next layer unless a prefix-base feature makes it exhaustive;
//! - a **suffix rule** parsing one operand, then folding it into infix and
//!   suffix features for as long as one of them matches.
//!
//! Base features form an implicit tightest layer after the last one.

mod invariants;
mod layers;
mod order;

#[cfg(test)]
mod grammar_tests;

use std::fmt::Write;

use stratum_core::{Assoc, Fixity, Operator, Precedence};

use crate::config::ParserConfig;
use crate::feature::{Feature, Suggestion};
use crate::lexer::{Lexicon, TokenDef};
use crate::parser::{self, ParseOutput};
use crate::{Error, Result};

/// Entry points of the compiled grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// One full expression: the loosest layer.
    Expression,
    /// Suffix rule of a layer.
    Layer(usize),
    /// Prefix rule of a layer.
    Prefix(usize),
    /// Base alternatives.
    Base,
}

pub(crate) type FeatureId = usize;

#[derive(Debug, Clone, Default)]
pub(crate) struct Layer {
    pub(crate) prefix: Vec<FeatureId>,
    pub(crate) suffix: Vec<FeatureId>,
    pub(crate) exhaustive: bool,
}

/// Precomputed per-feature execution data.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    pub(crate) operator: Option<Operator>,
    pub(crate) operand: Rule,
}

pub struct Grammar {
    features: Vec<Feature>,
    slots: Vec<Slot>,
    layers: Vec<Layer>,
    bases: Vec<FeatureId>,
    lexicon: Lexicon,
    suggestions: Vec<Suggestion>,
    config: ParserConfig,
}

impl Grammar {
    /// Compile operator `features` and `bases` into a grammar.
    ///
    /// Fails on precedence cycles, unknown relation targets, misplaced
    /// fixities and invalid token declarations.
    pub fn new(features: Vec<Feature>, bases: Vec<Feature>) -> Result<Self> {
        for feature in &features {
            if feature.fixity() == Fixity::Base {
                return Err(misplaced(feature, "an operator"));
            }
        }
        for (i, feature) in bases.iter().enumerate() {
            if feature.fixity() != Fixity::Base {
                return Err(misplaced(feature, "a base feature"));
            }
            let taken = features.iter().chain(&bases[..i]);
            if taken.clone().any(|f| f.name() == feature.name()) {
                return Err(Error::DuplicateFeature(feature.name().to_string()));
            }
        }

        let order = order::precedence_order(&features)?;
        let members = layers::build_layers(&features, &order);

        let mut slots = vec![
            Slot {
                operator: None,
                operand: Rule::Expression,
            };
            features.len() + bases.len()
        ];
        let mut layers = Vec::with_capacity(members.len());
        for (i, ids) in members.iter().enumerate() {
            let precedence = i as Precedence;
            let next = if i + 1 < members.len() {
                Rule::Layer(i + 1)
            } else {
                Rule::Base
            };
            let mut layer = Layer::default();
            for &id in ids {
                let feature = &features[id];
                let operator = Operator::new(precedence, feature.fixity());
                let (operator, operand) = match feature.fixity() {
                    Fixity::Prefix => (operator, Rule::Prefix(i)),
                    Fixity::PrefixBase => (operator, next),
                    Fixity::Infix => match feature.assoc().unwrap_or(Assoc::Left) {
                        Assoc::Left => (operator.with_assoc(Assoc::Left), next),
                        Assoc::Right => (operator.with_assoc(Assoc::Right), Rule::Layer(i)),
                    },
                    Fixity::Suffix | Fixity::Base => (operator, next),
                };
                slots[id] = Slot {
                    operator: Some(operator),
                    operand,
                };
                match feature.fixity() {
                    Fixity::PrefixBase => {
                        layer.exhaustive = true;
                        layer.prefix.push(id);
                    }
                    Fixity::Prefix => layer.prefix.push(id),
                    _ => layer.suffix.push(id),
                }
            }
            layers.push(layer);
        }

        let base_ids: Vec<FeatureId> = (features.len()..features.len() + bases.len()).collect();
        let mut all = features;
        all.extend(bases);

        let lexicon = Lexicon::build(
            std::iter::once(TokenDef::whitespace())
                .chain(all.iter().flat_map(|f| f.tokens().iter().cloned())),
        )?;
        let suggestions = all
            .iter()
            .flat_map(|f| f.suggestions().iter().cloned())
            .collect();

        let grammar = Self {
            features: all,
            slots,
            layers,
            bases: base_ids,
            lexicon,
            suggestions,
            config: ParserConfig::default(),
        };
        tracing::debug!(layers = %grammar.dump_layers(), "compiled grammar");
        Ok(grammar)
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Set execution fuel limit. None = infinite.
    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.config = self.config.with_exec_fuel(limit);
        self
    }

    /// Set recursion depth limit. None = infinite.
    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.config = self.config.with_recursion_fuel(limit);
        self
    }

    pub fn with_max_recovery_brackets(mut self, limit: usize) -> Self {
        self.config = self.config.with_max_recovery_brackets(limit);
        self
    }

    /// Parse one expression spanning all of `source`.
    ///
    /// Syntax errors are collected in the output's diagnostics. `Err` is
    /// reserved for exhausted fuel.
    pub fn parse(&self, source: &str) -> Result<ParseOutput> {
        parser::parse(self, source)
    }

    pub fn top_rule(&self) -> Rule {
        Rule::Expression
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name() == name)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Feature names per layer, lowest precedence first.
    pub fn layer_names(&self) -> Vec<Vec<&str>> {
        self.layers
            .iter()
            .map(|layer| {
                layer
                    .prefix
                    .iter()
                    .chain(&layer.suffix)
                    .map(|&id| self.features[id].name())
                    .collect()
            })
            .collect()
    }

    pub fn dump_layers(&self) -> String {
        let mut out = String::new();
        for (i, layer) in self.layers.iter().enumerate() {
            let names = |ids: &[FeatureId]| {
                ids.iter()
                    .map(|&id| self.features[id].name())
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            write!(out, "p{i}:").expect("String write never fails");
            if !layer.prefix.is_empty() {
                write!(out, " prefix({})", names(&layer.prefix)).expect("String write never fails");
            }
            if !layer.suffix.is_empty() {
                write!(out, " suffix({})", names(&layer.suffix)).expect("String write never fails");
            }
            if layer.exhaustive {
                out.push_str(" exhaustive");
            }
            out.push('\n');
        }
        let bases: Vec<_> = self.bases.iter().map(|&id| self.features[id].name()).collect();
        writeln!(out, "base: {}", bases.join(" ")).expect("String write never fails");
        out
    }

    pub(crate) fn feature_at(&self, id: FeatureId) -> &Feature {
        &self.features[id]
    }

    pub(crate) fn features(&self) -> &[Feature] {
        &self.features
    }

    pub(crate) fn slot(&self, id: FeatureId) -> Slot {
        self.slots[id]
    }

    pub(crate) fn layer(&self, i: usize) -> &Layer {
        &self.layers[i]
    }

    pub(crate) fn bases(&self) -> &[FeatureId] {
        &self.bases
    }

    /// Rule tried after layer `i`'s own alternatives.
    pub(crate) fn next_rule(&self, i: usize) -> Rule {
        if i + 1 < self.layers.len() {
            Rule::Layer(i + 1)
        } else {
            Rule::Base
        }
    }

    pub(crate) fn resolve(&self, rule: Rule) -> Rule {
        match rule {
            Rule::Expression if self.layers.is_empty() => Rule::Base,
            Rule::Expression => Rule::Layer(0),
            other => other,
        }
    }

    pub(crate) fn suggestion_for(&self, found: &str) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.found == found)
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("layers", &self.layer_names())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn misplaced(feature: &Feature, expected: &'static str) -> Error {
    Error::MisplacedFeature {
        feature: feature.name().to_string(),
        fixity: feature.fixity(),
        expected,
    }
}
