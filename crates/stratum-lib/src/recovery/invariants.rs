//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use stratum_core::Node;

/// Groups are `bracket content bracket`. Returns the content slot.
#[inline]
pub(super) fn ensure_group_shape(group: &Node) -> usize {
    assert!(
        group.children().len() == 3 && group.child_node(1).is_some(),
        "broken recovery invariant: `{}` is not a bracketed group",
        group.kind()
    );
    1
}
