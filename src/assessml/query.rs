//! Tree queries and normalization
//!
//! All functions here are pure: they read a tree and, where they transform it, return a new
//! one. Every traversal descends into container bodies regardless of the container's kind.

use crate::assessml::ast::{Content, Node, NodeKind, Tree, VarValue};
use crate::assessml::shuffle::{remap_order, slots_of};

/// The payload carried by a leaf (or shuffle) node.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Value(VarValue),
    Src(String),
    Equations(Vec<String>),
    Order(Vec<usize>),
}

impl Payload {
    pub fn of(node: &Node) -> Option<Payload> {
        match node {
            Node::Variable(v) => Some(Payload::Value(v.value.clone())),
            Node::Image(i) => Some(Payload::Src(i.src.clone())),
            Node::Graph(g) => Some(Payload::Equations(g.equations.clone())),
            Node::Shuffle(s) => Some(Payload::Order(s.shuffled_indices.clone())),
            _ => None,
        }
    }
}

/// Every node of `kind`, in pre-order.
///
/// A matching container is listed before its matching descendants.
pub fn find_nodes_of_kind(tree: &[Node], kind: NodeKind) -> Vec<&Node> {
    let mut found = Vec::new();
    collect_nodes(tree, kind, &mut found);
    found
}

fn collect_nodes<'a>(tree: &'a [Node], kind: NodeKind, found: &mut Vec<&'a Node>) {
    for node in tree {
        if node.kind() == kind {
            found.push(node);
        }
        if let Some(children) = node.children() {
            collect_nodes(children, kind, found);
        }
    }
}

/// The first node (pre-order) of `kind` named `var_name`.
pub fn find_node<'a>(tree: &'a [Node], kind: NodeKind, var_name: &str) -> Option<&'a Node> {
    for node in tree {
        if node.kind() == kind && node.var_name() == Some(var_name) {
            return Some(node);
        }
        if let Some(found) = node
            .children()
            .and_then(|children| find_node(children, kind, var_name))
        {
            return Some(found);
        }
    }
    None
}

/// The payload of the first node of `kind` named `var_name`.
pub fn get_payload(tree: &[Node], kind: NodeKind, var_name: &str) -> Option<Payload> {
    find_node(tree, kind, var_name).and_then(Payload::of)
}

/// Merge every run of adjacent content siblings into one content node, at every level.
pub fn flatten_adjacent_content(tree: &[Node]) -> Tree {
    let mut result: Tree = Vec::with_capacity(tree.len());
    for node in tree {
        if let Node::Content(current) = node {
            if let Some(Node::Content(previous)) = result.last_mut() {
                previous.content.push_str(&current.content);
                continue;
            }
            result.push(Node::Content(Content {
                content: current.content.clone(),
            }));
            continue;
        }

        match node {
            Node::Shuffle(shuffle) => {
                let children = flatten_adjacent_content(&shuffle.children);
                let order = remap_order(
                    &shuffle.shuffled_indices,
                    &shuffle.slots(),
                    &slots_of(&children),
                );
                result.push(Node::shuffle(shuffle.var_name.clone(), children, order));
            }
            other => match other.children() {
                Some(children) => {
                    result.push(other.with_children(flatten_adjacent_content(children)))
                }
                None => result.push(other.clone()),
            },
        }
    }
    result
}

/// Copy payloads from `reference` onto the matching (same kind, same name) nodes of `target`.
///
/// Nodes with no counterpart in `reference` keep their own payload. The result has
/// exactly the shape of `target`.
pub fn overlay_payloads(reference: &[Node], target: &[Node]) -> Tree {
    target
        .iter()
        .map(|node| overlay_node(reference, node))
        .collect()
}

fn overlay_node(reference: &[Node], node: &Node) -> Node {
    let lookup = |node: &Node| {
        node.var_name()
            .and_then(|name| get_payload(reference, node.kind(), name))
    };

    match (node, lookup(node)) {
        (Node::Variable(v), Some(Payload::Value(value))) => {
            Node::variable(v.var_name.clone(), value)
        }
        (Node::Image(i), Some(Payload::Src(src))) => Node::image(i.var_name.clone(), src),
        (Node::Graph(g), Some(Payload::Equations(equations))) => {
            Node::graph(g.var_name.clone(), equations)
        }
        (Node::Shuffle(s), order) => {
            let shuffled_indices = match order {
                Some(Payload::Order(order)) => order,
                _ => s.shuffled_indices.clone(),
            };
            Node::shuffle(
                s.var_name.clone(),
                overlay_payloads(reference, &s.children),
                shuffled_indices,
            )
        }
        (other, _) => match other.children() {
            Some(children) => other.with_children(overlay_payloads(reference, children)),
            None => other.clone(),
        },
    }
}

/// Give every variable the value of the first same-named variable in pre-order.
pub fn normalize_variables(tree: &[Node]) -> Tree {
    let variables = find_nodes_of_kind(tree, NodeKind::Variable);
    let first_values: Vec<(&str, &VarValue)> = variables
        .iter()
        .filter_map(|node| match node {
            Node::Variable(v) => Some((v.var_name.as_str(), &v.value)),
            _ => None,
        })
        .collect();
    normalize_with(tree, &first_values)
}

fn normalize_with(tree: &[Node], values: &[(&str, &VarValue)]) -> Tree {
    tree.iter()
        .map(|node| match node {
            Node::Variable(v) => {
                let value = values
                    .iter()
                    .find(|(name, _)| *name == v.var_name)
                    .map(|(_, value)| (*value).clone())
                    .unwrap_or_else(|| v.value.clone());
                Node::variable(v.var_name.clone(), value)
            }
            other => match other.children() {
                Some(children) => other.with_children(normalize_with(children, values)),
                None => other.clone(),
            },
        })
        .collect()
}
