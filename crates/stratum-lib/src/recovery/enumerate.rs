//! Lazy enumeration of bracket placements.

use std::collections::HashSet;
use std::iter;
use std::rc::Rc;

use stratum_core::{Node, RecoveryId};

use super::relocate::{recovery_ids, step};
use super::validate::Validators;

type Trees = Box<dyn Iterator<Item = Node>>;

/// Every placement of the synthetic brackets of one tree.
///
/// Yields the input tree first, unvalidated. Later trees are the cartesian
/// product of each group's placements, nested groups varying first, passed
/// through the [`Validators`]; rejected and repeated trees are skipped.
pub struct Interpretations<'v> {
    raw: Trees,
    validators: &'v Validators,
    seen: HashSet<Node>,
    started: bool,
}

impl<'v> Interpretations<'v> {
    pub fn new(tree: Option<Node>, validators: &'v Validators) -> Self {
        let raw: Trees = match tree {
            Some(tree) => {
                let ids: Rc<[RecoveryId]> = recovery_ids(&tree).into();
                product(tree, ids, 0)
            }
            None => Box::new(iter::empty()),
        };
        Self {
            raw,
            validators,
            seen: HashSet::new(),
            started: false,
        }
    }
}

impl Iterator for Interpretations<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if !self.started {
            self.started = true;
            let original = self.raw.next()?;
            self.seen.insert(original.clone());
            return Some(original);
        }
        loop {
            let candidate = self.raw.next()?;
            let Some(tree) = self.validators.validate(&candidate) else {
                tracing::trace!(tree = %candidate, "rejected interpretation");
                continue;
            };
            if self.seen.insert(tree.clone()) {
                return Some(tree);
            }
        }
    }
}

/// Placements of `ids[from..]`, starting from `tree`.
fn product(tree: Node, ids: Rc<[RecoveryId]>, from: usize) -> Trees {
    let Some(&id) = ids.get(from) else {
        return Box::new(iter::once(tree));
    };
    Box::new(Placements::new(tree, id).flat_map(move |t| product(t, ids.clone(), from + 1)))
}

/// One group's placements: the tree itself, then one step at a time.
struct Placements {
    next: Option<Node>,
    id: RecoveryId,
}

impl Placements {
    fn new(tree: Node, id: RecoveryId) -> Self {
        Self {
            next: Some(tree),
            id,
        }
    }
}

impl Iterator for Placements {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let current = self.next.take()?;
        self.next = step(&current, self.id);
        Some(current)
    }
}
