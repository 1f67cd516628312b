//! One enumeration step: move a synthetic bracket past one operator.

use stratum_core::{Element, Node, NodeOrToken, Path, RecoveryId, Step};

use super::invariants::ensure_group_shape;
use super::{RECOVERY_GROUP, fits};

/// Which bracket of a group is synthetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// Synthetic opener; moves rightwards.
    Leading,
    /// Synthetic closer; moves leftwards.
    Trailing,
}

impl Side {
    /// Child followed from a node towards the synthetic bracket.
    fn edge(self, node: &Node) -> usize {
        match self {
            Self::Leading => 0,
            Self::Trailing => node.last_index(),
        }
    }

    /// Child left behind inside the group when its parent moves out.
    fn graft(self, node: &Node) -> usize {
        match self {
            Self::Leading => node.last_index(),
            Self::Trailing => 0,
        }
    }
}

pub(crate) fn synthetic_side(group: &Node, id: RecoveryId) -> Option<Side> {
    if group.kind() != RECOVERY_GROUP {
        return None;
    }
    let is_bracket = |element: Option<&Element>| {
        element
            .and_then(|e| e.as_token())
            .is_some_and(|leaf| leaf.recovery_id() == Some(id))
    };
    if is_bracket(group.first_child()) {
        Some(Side::Leading)
    } else if is_bracket(group.last_child()) {
        Some(Side::Trailing)
    } else {
        None
    }
}

/// Path to the group holding synthetic bracket `id`.
pub(crate) fn find_group(tree: &Node, id: RecoveryId) -> Option<(Path, Side)> {
    let path = Path::find(tree, |n| synthetic_side(n, id).is_some())?;
    let side = synthetic_side(path.target(), id)?;
    Some((path, side))
}

/// Synthetic bracket ids of every recovery group, deepest group first,
/// then in document order.
pub(crate) fn recovery_ids(tree: &Node) -> Vec<RecoveryId> {
    let mut found = Vec::new();
    collect_ids(tree, 0, &mut found);
    found.sort_by_key(|&(depth, _)| std::cmp::Reverse(depth));
    found.into_iter().map(|(_, id)| id).collect()
}

fn collect_ids(node: &Node, depth: usize, out: &mut Vec<(usize, RecoveryId)>) {
    for child in node.children() {
        match child {
            NodeOrToken::Node(n) => collect_ids(n, depth + 1, out),
            NodeOrToken::Token(leaf) if node.kind() == RECOVERY_GROUP => {
                if let Some(id) = leaf.recovery_id() {
                    out.push((depth, id));
                }
            }
            NodeOrToken::Token(_) => {}
        }
    }
}

/// The tree with bracket `id` moved past the operator on its group's edge,
/// or `None` when there is no operator left to move past.
pub(crate) fn step(tree: &Node, id: RecoveryId) -> Option<Node> {
    let (path, side) = find_group(tree, id)?;
    let group = path.target();
    let content_slot = ensure_group_shape(group);
    let content = group.child_node(content_slot)?;

    let anchor = edge_anchor(content, side)?;
    let lifted = anchor.target().clone();
    let graft_slot = side.graft(&lifted);
    let graft = lifted.child_node(graft_slot)?.clone();
    let content = anchor.replace(graft);

    let bracket_slot = side.edge(group);
    let offset = match side {
        Side::Leading => content.range().start(),
        Side::Trailing => content.range().end(),
    };
    let bracket = group.child(bracket_slot)?.as_token()?.moved_to(offset);

    let mut children = group.children().to_vec();
    children[bracket_slot] = NodeOrToken::Token(bracket);
    children[content_slot] = NodeOrToken::Node(content);
    let group = group.with_children(children);

    let lifted = lifted.with_child(graft_slot, NodeOrToken::Node(group));
    tracing::trace!(id, kind = lifted.kind(), "moved synthetic bracket");
    Some(reseat(path.steps().to_vec(), lifted))
}

/// Deepest expression node on the content's edge spine that has a node in
/// its graft slot.
fn edge_anchor(content: &Node, side: Side) -> Option<Path> {
    let mut cursor = Path::root(content.clone());
    let mut anchor = None;
    while cursor.target().is_expression() {
        if cursor.target().child_node(side.graft(cursor.target())).is_some() {
            anchor = Some(cursor.clone());
        }
        let edge = side.edge(cursor.target());
        let Some(next) = cursor.child(edge) else {
            break;
        };
        cursor = next;
    }
    anchor
}

/// Put `node` where the group was, rotating it above ancestors it does not
/// fit under, then rebuild up to the root.
///
/// In a first slot the ancestor adopts the node's last child; in a last
/// slot, its first child. Middle slots and ancestors without precedence
/// stop the climb, as does a leaf where a child would be adopted.
fn reseat(mut steps: Vec<Step>, mut node: Node) -> Node {
    while let Some(Step {
        node: parent,
        index: slot,
    }) = steps.last()
    {
        let slot = *slot;
        if !parent.is_expression() || fits(parent, slot, &node) {
            break;
        }
        let take = if slot == 0 {
            node.last_index()
        } else if slot == parent.last_index() {
            0
        } else {
            break;
        };
        let Some(adopted) = node.child_node(take).cloned() else {
            break;
        };
        let parent = parent.with_child(slot, NodeOrToken::Node(adopted));
        node = node.with_child(take, NodeOrToken::Node(parent));
        steps.pop();
    }

    steps.iter().rev().fold(node, |child, step| {
        step.node.with_child(step.index, NodeOrToken::Node(child))
    })
}
