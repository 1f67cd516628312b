//! Nodes, leaves and the operator metadata attached to expression nodes.

use std::fmt;
use std::rc::Rc;

use rowan::{NodeOrToken, TextRange, TextSize};
use serde::ser::SerializeStruct;

/// A child of a [`Node`]: either a nested node or a token leaf.
pub type Element = NodeOrToken<Node, Leaf>;

/// Position of a precedence layer. Higher binds tighter.
pub type Precedence = u32;

/// Per-parse identifier of a synthetic bracket leaf.
pub type RecoveryId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Assoc {
    Left,
    Right,
}

/// How a feature attaches to its operands.
///
/// `PrefixBase` is a prefix construct that makes its layer's prefix rule
/// exhaustive: no implicit fallthrough to tighter layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Fixity {
    Base,
    Prefix,
    PrefixBase,
    Infix,
    Suffix,
}

impl Fixity {
    pub fn is_prefix(self) -> bool {
        matches!(self, Self::Prefix | Self::PrefixBase)
    }

    /// Infix and suffix features fold a previously parsed operand.
    pub fn takes_lhs(self) -> bool {
        matches!(self, Self::Infix | Self::Suffix)
    }
}

impl fmt::Display for Fixity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Base => "base",
            Self::Prefix => "prefix",
            Self::PrefixBase => "prefixBase",
            Self::Infix => "infix",
            Self::Suffix => "suffix",
        };
        f.write_str(s)
    }
}

/// Precedence metadata stamped on every expression node.
///
/// Nodes without an operator (literals, groups) behave as if their
/// precedence were infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operator {
    pub precedence: Precedence,
    pub fixity: Fixity,
    pub assoc: Option<Assoc>,
}

impl Operator {
    pub fn new(precedence: Precedence, fixity: Fixity) -> Self {
        Self {
            precedence,
            fixity,
            assoc: None,
        }
    }

    pub fn with_assoc(mut self, assoc: Assoc) -> Self {
        self.assoc = Some(assoc);
        self
    }

    pub fn is_right_infix(&self) -> bool {
        self.fixity == Fixity::Infix && self.assoc == Some(Assoc::Right)
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Node(Rc<NodeData>);

#[derive(Debug, PartialEq, Eq, Hash)]
struct NodeData {
    kind: Rc<str>,
    children: Vec<Element>,
    range: TextRange,
    operator: Option<Operator>,
}

impl Node {
    pub fn new(kind: impl Into<Rc<str>>, children: Vec<Element>, operator: Option<Operator>) -> Self {
        let range = cover(&children);
        Self(Rc::new(NodeData {
            kind: kind.into(),
            children,
            range,
            operator,
        }))
    }

    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    pub fn children(&self) -> &[Element] {
        &self.0.children
    }

    pub fn range(&self) -> TextRange {
        self.0.range
    }

    pub fn operator(&self) -> Option<Operator> {
        self.0.operator
    }

    pub fn precedence(&self) -> Option<Precedence> {
        self.0.operator.map(|op| op.precedence)
    }

    pub fn assoc(&self) -> Option<Assoc> {
        self.0.operator.and_then(|op| op.assoc)
    }

    pub fn fixity(&self) -> Fixity {
        self.0.operator.map_or(Fixity::Base, |op| op.fixity)
    }

    /// Expression nodes carry precedence; base and group nodes do not.
    pub fn is_expression(&self) -> bool {
        self.0.operator.is_some()
    }

    pub fn child(&self, index: usize) -> Option<&Element> {
        self.0.children.get(index)
    }

    pub fn child_node(&self, index: usize) -> Option<&Node> {
        self.child(index).and_then(|e| e.as_node())
    }

    pub fn first_child(&self) -> Option<&Element> {
        self.0.children.first()
    }

    pub fn last_child(&self) -> Option<&Element> {
        self.0.children.last()
    }

    pub fn last_index(&self) -> usize {
        self.0.children.len().saturating_sub(1)
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Same kind and operator, with `children[index]` swapped for `child`.
    pub fn with_child(&self, index: usize, child: Element) -> Node {
        self.ensure_child_index(index);
        let mut children = self.0.children.clone();
        children[index] = child;
        self.with_children(children)
    }

    pub fn with_children(&self, children: Vec<Element>) -> Node {
        Node::new(self.0.kind.clone(), children, self.0.operator)
    }

    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    pub fn leaves(&self) -> Vec<Leaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<Leaf>) {
        for child in self.children() {
            match child {
                NodeOrToken::Node(n) => n.collect_leaves(out),
                NodeOrToken::Token(l) => out.push(l.clone()),
            }
        }
    }

    /// Concatenated text of the real leaves, in order.
    pub fn text(&self) -> String {
        self.leaves()
            .iter()
            .filter(|l| !l.is_synthetic())
            .map(Leaf::text)
            .collect()
    }

    /// Like [`Node::text`], but synthetic brackets are rendered too.
    pub fn display_text(&self) -> String {
        self.leaves().iter().map(Leaf::text).collect()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Depth-first, parent-before-children walk over nodes.
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().filter_map(|c| c.as_node()));
        Some(node)
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Leaf(Rc<LeafData>);

#[derive(Debug, PartialEq, Eq, Hash)]
struct LeafData {
    kind: Rc<str>,
    text: Rc<str>,
    range: TextRange,
    recovery: Option<RecoveryId>,
}

impl Leaf {
    pub fn new(kind: impl Into<Rc<str>>, text: impl Into<Rc<str>>, range: TextRange) -> Self {
        Self(Rc::new(LeafData {
            kind: kind.into(),
            text: text.into(),
            range,
            recovery: None,
        }))
    }

    /// Zero-width bracket leaf that was not present in the input.
    pub fn synthetic(
        kind: impl Into<Rc<str>>,
        text: impl Into<Rc<str>>,
        offset: TextSize,
        id: RecoveryId,
    ) -> Self {
        Self(Rc::new(LeafData {
            kind: kind.into(),
            text: text.into(),
            range: TextRange::empty(offset),
            recovery: Some(id),
        }))
    }

    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    pub fn text(&self) -> &str {
        &self.0.text
    }

    pub fn range(&self) -> TextRange {
        self.0.range
    }

    pub fn recovery_id(&self) -> Option<RecoveryId> {
        self.0.recovery
    }

    pub fn is_synthetic(&self) -> bool {
        self.0.recovery.is_some()
    }

    /// The same leaf pinned at another offset. Only synthetic leaves move.
    pub fn moved_to(&self, offset: TextSize) -> Leaf {
        self.ensure_synthetic();
        Self(Rc::new(LeafData {
            kind: self.0.kind.clone(),
            text: self.0.text.clone(),
            range: TextRange::empty(offset),
            recovery: self.0.recovery,
        }))
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

fn cover(children: &[Element]) -> TextRange {
    children
        .iter()
        .map(|c| match c {
            NodeOrToken::Node(n) => n.range(),
            NodeOrToken::Token(l) => l.range(),
        })
        .reduce(TextRange::cover)
        .unwrap_or_default()
}

fn range_pair(range: TextRange) -> [u32; 2] {
    [u32::from(range.start()), u32::from(range.end())]
}

#[derive(serde::Serialize)]
#[serde(untagged)]
enum ElementRef<'a> {
    Node(&'a Node),
    Leaf(&'a Leaf),
}

struct Children<'a>(&'a [Element]);

impl serde::Serialize for Children<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|c| match c {
            NodeOrToken::Node(n) => ElementRef::Node(n),
            NodeOrToken::Token(l) => ElementRef::Leaf(l),
        }))
    }
}

impl serde::Serialize for Node {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Node", 5)?;
        s.serialize_field("type", self.kind())?;
        s.serialize_field("range", &range_pair(self.range()))?;
        s.serialize_field("precedence", &self.precedence())?;
        s.serialize_field("associativity", &self.assoc())?;
        s.serialize_field("children", &Children(self.children()))?;
        s.end()
    }
}

impl serde::Serialize for Leaf {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Leaf", 4)?;
        s.serialize_field("type", self.kind())?;
        s.serialize_field("text", self.text())?;
        s.serialize_field("range", &range_pair(self.range()))?;
        s.serialize_field("synthetic", &self.is_synthetic())?;
        s.end()
    }
}
