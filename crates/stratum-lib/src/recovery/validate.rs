//! Validator pipeline for enumerated trees.

use std::fmt;
use std::rc::Rc;

use stratum_core::{Assoc, Fixity, Node, Path};

use super::fits;
use super::relocate::{find_group, recovery_ids};

/// What a node validator decided about one recovery group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Reject,
    /// Swap the group for another node.
    Replace(Node),
}

/// Checks a whole tree: `None` rejects it, `Some` passes it on, possibly
/// rewritten.
pub trait TreeValidator {
    fn validate(&self, tree: &Node) -> Option<Node>;
}

/// Checks one recovery group, given the path from the root to it.
pub trait NodeValidator {
    fn validate(&self, group: &Path) -> Verdict;
}

impl<F> TreeValidator for F
where
    F: Fn(&Node) -> Option<Node>,
{
    fn validate(&self, tree: &Node) -> Option<Node> {
        self(tree)
    }
}

impl<F> NodeValidator for F
where
    F: Fn(&Path) -> Verdict,
{
    fn validate(&self, group: &Path) -> Verdict {
        self(group)
    }
}

/// Ordered validators. Node validators run first, on every recovery group
/// in turn; tree validators then see the result.
#[derive(Clone, Default)]
pub struct Validators {
    node: Vec<Rc<dyn NodeValidator>>,
    tree: Vec<Rc<dyn TreeValidator>>,
}

impl Validators {
    /// No validators: every enumerated tree is accepted.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, validator: impl NodeValidator + 'static) -> Self {
        self.node.push(Rc::new(validator));
        self
    }

    pub fn with_tree(mut self, validator: impl TreeValidator + 'static) -> Self {
        self.tree.push(Rc::new(validator));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_empty() && self.tree.is_empty()
    }

    /// Run the pipeline. `None` means some validator rejected the tree.
    pub fn validate(&self, tree: &Node) -> Option<Node> {
        let mut tree = tree.clone();
        if !self.node.is_empty() {
            for id in recovery_ids(&tree) {
                for validator in &self.node {
                    let Some((path, _)) = find_group(&tree, id) else {
                        break;
                    };
                    match validator.validate(&path) {
                        Verdict::Keep => {}
                        Verdict::Reject => return None,
                        Verdict::Replace(node) => tree = path.replace(node),
                    }
                }
            }
        }
        for validator in &self.tree {
            tree = validator.validate(&tree)?;
        }
        Some(tree)
    }
}

impl fmt::Debug for Validators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validators")
            .field("node", &self.node.len())
            .field("tree", &self.tree.len())
            .finish()
    }
}

/// Rejects trees where some node sits in a slot its precedence does not
/// allow; see [`fits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecedenceInvariant;

impl TreeValidator for PrecedenceInvariant {
    fn validate(&self, tree: &Node) -> Option<Node> {
        for node in tree.preorder() {
            for (slot, child) in node.children().iter().enumerate() {
                if let Some(child) = child.as_node()
                    && !fits(node, slot, child)
                {
                    tracing::trace!(parent = node.kind(), slot, child = child.kind(), "misfit");
                    return None;
                }
            }
        }
        Some(tree.clone())
    }
}

/// Rejects groups that only re-associate a run of one associative
/// operator, like `1+(2+3)`.
#[derive(Debug, Clone, Default)]
pub struct IdenticalOperatorRun {
    kinds: Option<Vec<String>>,
}

impl IdenticalOperatorRun {
    /// Applies to every infix node type.
    pub fn any() -> Self {
        Self { kinds: None }
    }

    /// Applies to the named node types only.
    pub fn only<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: Some(kinds.into_iter().map(Into::into).collect()),
        }
    }

    fn applies_to(&self, kind: &str) -> bool {
        self.kinds
            .as_ref()
            .is_none_or(|kinds| kinds.iter().any(|k| k == kind))
    }
}

impl NodeValidator for IdenticalOperatorRun {
    fn validate(&self, group: &Path) -> Verdict {
        let Some((parent, slot)) = group.parent() else {
            return Verdict::Keep;
        };
        let Some(content) = group.target().child_node(1) else {
            return Verdict::Keep;
        };
        let Some(op) = parent.operator() else {
            return Verdict::Keep;
        };
        if op.fixity != Fixity::Infix
            || content.kind() != parent.kind()
            || !self.applies_to(parent.kind())
        {
            return Verdict::Keep;
        }
        let against = match op.assoc {
            Some(Assoc::Right) => slot == 0,
            _ => slot == parent.last_index(),
        };
        if against {
            Verdict::Reject
        } else {
            Verdict::Keep
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedundantMode {
    /// Any group whose content would fit its slot without brackets.
    #[default]
    Strict,
    /// Only groups around a single operand, like `(4)`.
    AtomsOnly,
}

/// Rejects recovery groups that make no difference to the tree's shape.
///
/// A group at the root is always kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedundantGroup {
    mode: RedundantMode,
}

impl RedundantGroup {
    pub fn new(mode: RedundantMode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::new(RedundantMode::Strict)
    }

    pub fn atoms_only() -> Self {
        Self::new(RedundantMode::AtomsOnly)
    }

    pub fn mode(&self) -> RedundantMode {
        self.mode
    }
}

impl NodeValidator for RedundantGroup {
    fn validate(&self, group: &Path) -> Verdict {
        // A group enclosing the whole tree has nothing to re-associate with.
        let Some((parent, slot)) = group.parent() else {
            return Verdict::Keep;
        };
        let Some(content) = group.target().child_node(1) else {
            return Verdict::Keep;
        };
        let redundant = match self.mode {
            RedundantMode::AtomsOnly => !content.is_expression(),
            RedundantMode::Strict => fits(parent, slot, content),
        };
        if redundant {
            Verdict::Reject
        } else {
            Verdict::Keep
        }
    }
}
