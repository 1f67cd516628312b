//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::feature::Feature;

/// Layer holding `name`. Dependency order guarantees it was placed already.
pub(super) fn ensure_layer(layers: &[Vec<usize>], features: &[Feature], name: &str) -> usize {
    layers
        .iter()
        .position(|members| members.iter().any(|&m| features[m].name() == name))
        .unwrap_or_else(|| {
            panic!("broken grammar invariant: `{name}` placed before its layer exists")
        })
}
