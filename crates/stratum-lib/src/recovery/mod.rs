//! Bracket recovery.
//!
//! Detection lives in two features ([`group_recovery`] and
//! [`group_recovery_base`]) that repair unbalanced input with synthetic
//! brackets. The parse then commits to one placement of each synthetic
//! bracket; [`Interpretations`] enumerates the others.
//!
//! Each enumeration step moves one synthetic bracket past one operator: the
//! group gives up the operator on its edge to the enclosing tree, and the
//! result is re-seated by rotating ancestors until every node again sits in
//! a slot its precedence allows. Trees are persistent, so every step only
//! rebuilds the ancestors of the group.
//!
//! Steps never look at the real leaves, so every interpretation reproduces
//! the input tokens in order. Whether an interpretation is kept is up to
//! the [`Validators`].

mod detect;
mod enumerate;
mod invariants;
mod relocate;
mod validate;


use std::cmp::Ordering;

use stratum_core::{Assoc, Fixity, Node};

pub use detect::{Brackets, group_recovery, group_recovery_base};
pub use enumerate::Interpretations;
pub use validate::{
    IdenticalOperatorRun, NodeValidator, PrecedenceInvariant, RedundantGroup, RedundantMode,
    TreeValidator, Validators, Verdict,
};

/// Node type of a bracket group whose brackets are both real.
pub const GROUP: &str = "group";

/// Node type of a bracket group with a synthetic bracket.
pub const RECOVERY_GROUP: &str = "recoveryGroup";

/// Whether `child` may sit in `parent`'s child `slot` without brackets.
///
/// Nodes without precedence fit anywhere and host anything. Otherwise the
/// child must bind at least as tightly; on a tie, a prefix parent only hosts
/// prefix children, a right-associative child cannot take the first slot,
/// and an infix parent's last slot is reserved for right associativity.
pub fn fits(parent: &Node, slot: usize, child: &Node) -> bool {
    let (Some(p), Some(c)) = (parent.operator(), child.operator()) else {
        return true;
    };
    match c.precedence.cmp(&p.precedence) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal if p.fixity.is_prefix() => c.fixity.is_prefix(),
        Ordering::Equal if slot == 0 && c.is_right_infix() => false,
        Ordering::Equal if p.fixity == Fixity::Infix && slot == parent.last_index() => {
            p.assoc == Some(Assoc::Right)
        }
        Ordering::Equal => true,
    }
}
