#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Concrete syntax tree shared by Stratum parsers and their consumers.
//!
//! Trees are persistent: a [`Node`] is never mutated after construction, and
//! structural edits ([`Node::with_child`], [`Path::replace`]) return new roots
//! that share every untouched subtree with the original. Recovery enumeration
//! relies on this to hand out many trees without copying them.

pub mod cst;
pub mod path;
pub mod printer;

mod invariants;

#[cfg(test)]
mod path_tests;

pub use cst::{Assoc, Element, Fixity, Leaf, Node, Operator, Precedence, Preorder, RecoveryId};
pub use path::{Path, Step};
pub use printer::TreePrinter;

pub use rowan::{NodeOrToken, TextRange, TextSize};
