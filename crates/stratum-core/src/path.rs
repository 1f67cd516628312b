//! Ancestor chains for copy-on-write edits.
//!
//! A [`Path`] remembers every node from the root down to a target together
//! with the child slot taken at each level. Replacing the target rebuilds
//! only the nodes on that chain.

use rowan::NodeOrToken;

use crate::cst::Node;

/// One level of a [`Path`]: an ancestor and the slot leading further down.
#[derive(Debug, Clone)]
pub struct Step {
    pub node: Node,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct Path {
    steps: Vec<Step>,
    target: Node,
}

impl Path {
    pub fn root(node: Node) -> Self {
        Self {
            steps: Vec::new(),
            target: node,
        }
    }

    /// First node in preorder that satisfies `pred`.
    pub fn find(root: &Node, pred: impl Fn(&Node) -> bool) -> Option<Path> {
        let mut steps = Vec::new();
        let target = find_in(root, &pred, &mut steps)?;
        Some(Self { steps, target })
    }

    pub fn target(&self) -> &Node {
        &self.target
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of ancestors above the target.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn root_node(&self) -> &Node {
        self.steps.first().map_or(&self.target, |s| &s.node)
    }

    /// The direct parent and the slot the target occupies in it.
    pub fn parent(&self) -> Option<(&Node, usize)> {
        self.steps.last().map(|s| (&s.node, s.index))
    }

    /// Path to the target's child at `index`, if that child is a node.
    pub fn child(&self, index: usize) -> Option<Path> {
        let child = self.target.child_node(index)?.clone();
        let mut steps = self.steps.clone();
        steps.push(Step {
            node: self.target.clone(),
            index,
        });
        Some(Self {
            steps,
            target: child,
        })
    }

    /// Path to the parent; `None` at the root.
    pub fn up(mut self) -> Option<Path> {
        let step = self.steps.pop()?;
        Some(Self {
            steps: self.steps,
            target: step.node,
        })
    }

    /// New root with the target swapped for `node`.
    pub fn replace(&self, node: Node) -> Node {
        self.steps.iter().rev().fold(node, |child, step| {
            step.node.with_child(step.index, NodeOrToken::Node(child))
        })
    }

    /// Like [`Path::replace`], returning the path to `node` in the new tree.
    pub fn replace_path(&self, node: Node) -> Path {
        let mut steps = Vec::with_capacity(self.steps.len());
        let mut child = node.clone();
        for step in self.steps.iter().rev() {
            let parent = step.node.with_child(step.index, NodeOrToken::Node(child));
            steps.push(Step {
                node: parent.clone(),
                index: step.index,
            });
            child = parent;
        }
        steps.reverse();
        Self {
            steps,
            target: node,
        }
    }
}

fn find_in(node: &Node, pred: &impl Fn(&Node) -> bool, steps: &mut Vec<Step>) -> Option<Node> {
    if pred(node) {
        return Some(node.clone());
    }
    for (index, child) in node.children().iter().enumerate() {
        let NodeOrToken::Node(child) = child else {
            continue;
        };
        steps.push(Step {
            node: node.clone(),
            index,
        });
        if let Some(found) = find_in(child, pred, steps) {
            return Some(found);
        }
        steps.pop();
    }
    None
}
