//! Precedence layers, lowest first.

use super::invariants::ensure_layer;
use crate::feature::{Feature, Relation};

/// Group features into layers. `order` must list relation targets first.
///
/// `LowerThan` opens a new layer just below the loosest target (or on top
/// when there are none). `SameAs` joins the target's layer; its position
/// inside the layer is resolved against the layer's leading member rather
/// than the named feature, before it or, with `match_after`, right after it.
pub(super) fn build_layers(features: &[Feature], order: &[usize]) -> Vec<Vec<usize>> {
    let mut layers: Vec<Vec<usize>> = Vec::new();

    for &i in order {
        match features[i].relation() {
            Relation::LowerThan(targets) if targets.is_empty() => layers.push(vec![i]),
            Relation::LowerThan(targets) => {
                let at = targets
                    .iter()
                    .map(|t| ensure_layer(&layers, features, t))
                    .min()
                    .unwrap_or(layers.len());
                layers.insert(at, vec![i]);
            }
            Relation::SameAs {
                feature,
                match_after,
            } => {
                let at = ensure_layer(&layers, features, feature);
                layers[at].insert(usize::from(*match_after), i);
            }
        }
    }

    layers
}
