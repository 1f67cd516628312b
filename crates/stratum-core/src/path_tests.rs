use rowan::{NodeOrToken, TextRange, TextSize};

use crate::cst::{Assoc, Element, Fixity, Leaf, Node, Operator};
use crate::path::Path;

fn leaf(kind: &str, text: &str, start: u32) -> Element {
    let range = TextRange::at(start.into(), TextSize::of(text));
    NodeOrToken::Token(Leaf::new(kind, text, range))
}

fn num(text: &str, start: u32) -> Node {
    Node::new("number", vec![leaf("Number", text, start)], None)
}

fn mul(lhs: Node, op_at: u32, rhs: Node) -> Node {
    Node::new(
        "multiply",
        vec![NodeOrToken::Node(lhs), leaf("Star", "*", op_at), NodeOrToken::Node(rhs)],
        Some(Operator::new(2, Fixity::Infix).with_assoc(Assoc::Left)),
    )
}

#[test]
fn find_records_ancestors() {
    let tree = mul(mul(num("1", 0), 1, num("2", 2)), 3, num("3", 4));
    let path = Path::find(&tree, |n| n.text() == "2").unwrap();

    assert_eq!(path.depth(), 2);
    assert_eq!(path.target().text(), "2");
    let (parent, slot) = path.parent().unwrap();
    assert_eq!(parent.text(), "1*2");
    assert_eq!(slot, 2);
    assert!(path.root_node().ptr_eq(&tree));
}

#[test]
fn find_misses() {
    let tree = num("1", 0);

    assert!(Path::find(&tree, |n| n.kind() == "add").is_none());
    assert_eq!(Path::find(&tree, |_| true).unwrap().depth(), 0);
}

#[test]
fn replace_is_copy_on_write() {
    let tree = mul(mul(num("1", 0), 1, num("2", 2)), 3, num("3", 4));
    let path = Path::find(&tree, |n| n.text() == "2").unwrap();

    let edited = path.replace(num("9", 2));

    assert_eq!(tree.text(), "1*2*3");
    assert_eq!(edited.text(), "1*9*3");
    assert!(
        edited
            .child_node(2)
            .unwrap()
            .ptr_eq(tree.child_node(2).unwrap())
    );
}

#[test]
fn replace_path_points_into_new_tree() {
    let tree = mul(num("1", 0), 1, num("2", 2));
    let path = Path::find(&tree, |n| n.text() == "1").unwrap();

    let moved = path.replace_path(num("5", 0));

    assert_eq!(moved.target().text(), "5");
    assert_eq!(moved.root_node().text(), "5*2");
    assert_eq!(moved.parent().unwrap().1, 0);
}

#[test]
fn child_and_up_are_inverse() {
    let tree = mul(num("1", 0), 1, num("2", 2));
    let root = Path::root(tree.clone());

    let child = root.child(2).unwrap();
    assert_eq!(child.target().text(), "2");
    assert!(root.child(1).is_none());

    let back = child.up().unwrap();
    assert!(back.target().ptr_eq(&tree));
    assert!(back.up().is_none());
}
