//! Dependency order of precedence declarations.
//!
//! A feature's precedence is defined relative to the features it names, so
//! those must be placed first. Depth-first, in declaration order.

use indexmap::{IndexMap, IndexSet};

use crate::Error;
use crate::feature::Feature;

/// Indices into `features`, every relation target before its dependents.
pub(super) fn precedence_order(features: &[Feature]) -> Result<Vec<usize>, Error> {
    let mut index = IndexMap::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        if index.insert(feature.name(), i).is_some() {
            return Err(Error::DuplicateFeature(feature.name().to_string()));
        }
    }

    let mut finder = OrderFinder {
        features,
        index,
        visited: IndexSet::new(),
        on_path: IndexSet::new(),
        order: Vec::with_capacity(features.len()),
    };
    for i in 0..features.len() {
        finder.visit(i)?;
    }
    Ok(finder.order)
}

struct OrderFinder<'a> {
    features: &'a [Feature],
    index: IndexMap<&'a str, usize>,
    visited: IndexSet<usize>,
    on_path: IndexSet<usize>,
    order: Vec<usize>,
}

impl OrderFinder<'_> {
    fn visit(&mut self, i: usize) -> Result<(), Error> {
        if self.visited.contains(&i) {
            return Ok(());
        }
        let feature = &self.features[i];
        if !self.on_path.insert(i) {
            return Err(Error::PrecedenceCycle(feature.name().to_string()));
        }

        for target in feature.relation().targets() {
            let Some(&t) = self.index.get(target) else {
                return Err(Error::UnknownFeature {
                    feature: feature.name().to_string(),
                    target: target.to_string(),
                });
            };
            self.visit(t)?;
        }

        self.on_path.swap_remove(&i);
        self.visited.insert(i);
        self.order.push(i);
        Ok(())
    }
}
