//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::cst::{Leaf, Node};

impl Node {
    #[inline]
    pub(crate) fn ensure_child_index(&self, index: usize) {
        assert!(
            index < self.children().len(),
            "child index {index} out of bounds for `{}` with {} children",
            self.kind(),
            self.children().len(),
        );
    }
}

impl Leaf {
    #[inline]
    pub(crate) fn ensure_synthetic(&self) {
        assert!(
            self.is_synthetic(),
            "only synthetic leaves can be moved, `{}` at {:?} is real",
            self.kind(),
            self.range(),
        );
    }
}
