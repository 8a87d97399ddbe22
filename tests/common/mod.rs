//! Shared strategies for property tests over AssessML trees

use assessml::assessml::ast::{Node, NodeKind, Tree};
use assessml::assessml::lexing::is_plain_text;
use proptest::prelude::*;
use std::collections::HashMap;

const CONTAINER_KINDS: [NodeKind; 7] = [
    NodeKind::Check,
    NodeKind::Radio,
    NodeKind::Drag,
    NodeKind::Drop,
    NodeKind::Solution,
    NodeKind::Markdown,
    NodeKind::Shuffle,
];

/// Text that stays text on its own: letters, punctuation, stray brackets and near-miss tags.
pub fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z ,.?\n]{1,8}",
        2 => "[a-z \\[\\]]{1,8}",
        1 => prop::sample::select(vec!["[var x", "[", "]", "[input", "[checkbox x]", "[]"])
            .prop_map(String::from),
    ]
    .prop_filter("text that lexes as a construct", |text| is_plain_text(text))
}

/// Leaves with placeholder names; run the result through [renumber].
pub fn arb_leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        arb_text().prop_map(|text| Node::content(text)),
        (prop::sample::select(vec!["var1", "var2", "var3"]), 0i64..100)
            .prop_map(|(name, value)| Node::variable(name, value)),
        Just(Node::input("input")),
        Just(Node::essay("essay")),
        Just(Node::code("code")),
        "[a-z]{1,6}\\.png".prop_map(|src| Node::image("img", src)),
        prop::collection::vec("[a-z0-9^*+]{1,6}", 0..3).prop_map(|eqs| Node::graph("graph", eqs)),
    ]
}

/// Documents up to three containers deep.
pub fn arb_tree() -> impl Strategy<Value = Tree> {
    let node = arb_leaf().prop_recursive(3, 24, 4, |inner| {
        (
            prop::sample::select(CONTAINER_KINDS.to_vec()),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(kind, children)| {
                Node::container(kind, kind.keyword(), children).expect("container kind")
            })
    });
    prop::collection::vec(node, 0..6)
}

/// Give every non-variable node a unique `{keyword}{n}` name, numbered in pre-order per kind.
pub fn renumber(tree: &[Node]) -> Tree {
    let mut counts: HashMap<NodeKind, usize> = HashMap::new();
    renumber_level(tree, &mut counts)
}

fn renumber_level(tree: &[Node], counts: &mut HashMap<NodeKind, usize>) -> Tree {
    let mut renamed = Vec::with_capacity(tree.len());
    for node in tree {
        let kind = node.kind();
        if matches!(kind, NodeKind::Content | NodeKind::Variable) {
            renamed.push(node.clone());
            continue;
        }
        let count = counts.entry(kind).or_insert(0);
        *count += 1;
        let name = format!("{}{}", kind.keyword(), count);
        let node = match node {
            Node::Input(_) => Node::input(name),
            Node::Essay(_) => Node::essay(name),
            Node::Code(_) => Node::code(name),
            Node::Image(i) => Node::image(name, i.src.clone()),
            Node::Graph(g) => Node::graph(name, g.equations.clone()),
            other => {
                let children = renumber_level(other.children().unwrap_or_default(), counts);
                Node::container(kind, name, children).expect("container kind")
            }
        };
        renamed.push(node);
    }
    renamed
}
