//! AST for AssessML documents
//!
//!     A document is a [Tree]: an ordered sequence of [Node]s. Container nodes (check, radio,
//!     drag, drop, solution, markdown, shuffle) hold a nested Tree of the same node universe,
//!     so every traversal recurses the same way at every level.
//!
//!     Nodes are built once by the parser and never mutated afterwards. Query and
//!     normalization utilities in [query](crate::assessml::query) produce new trees.
//!
//! Serialized shape
//!
//!     The serde representation follows the shape used by the AssessML front end:
//!     `{"type": "VARIABLE", "varName": "var1", "value": 42}`. Containers keep their body
//!     under `content`, shuffles add `shuffledIndices`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A document or container body.
pub type Tree = Vec<Node>;

/// The closed set of construct kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Content,
    Variable,
    Input,
    Essay,
    Code,
    Check,
    Radio,
    Drag,
    Drop,
    Image,
    Graph,
    Solution,
    Shuffle,
    Markdown,
}

impl NodeKind {
    /// Kinds that can appear in a markup token, in matching priority order.
    pub const CONSTRUCTS: [NodeKind; 13] = [
        NodeKind::Variable,
        NodeKind::Input,
        NodeKind::Essay,
        NodeKind::Code,
        NodeKind::Check,
        NodeKind::Radio,
        NodeKind::Drag,
        NodeKind::Drop,
        NodeKind::Solution,
        NodeKind::Markdown,
        NodeKind::Shuffle,
        NodeKind::Image,
        NodeKind::Graph,
    ];

    /// The keyword that opens this construct's token, and prefixes its auto-generated names.
    ///
    /// Content has no token and returns an empty keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            NodeKind::Content => "",
            NodeKind::Variable => "var",
            NodeKind::Input => "input",
            NodeKind::Essay => "essay",
            NodeKind::Code => "code",
            NodeKind::Check => "check",
            NodeKind::Radio => "radio",
            NodeKind::Drag => "drag",
            NodeKind::Drop => "drop",
            NodeKind::Image => "img",
            NodeKind::Graph => "graph",
            NodeKind::Solution => "solution",
            NodeKind::Shuffle => "shuffle",
            NodeKind::Markdown => "markdown",
        }
    }

    /// Look up the construct whose keyword starts `inner` (the token text between brackets).
    ///
    /// Returns the kind and the remaining suffix.
    pub fn split_keyword(inner: &str) -> Option<(NodeKind, &str)> {
        NodeKind::CONSTRUCTS.iter().find_map(|kind| {
            inner
                .strip_prefix(kind.keyword())
                .map(|suffix| (*kind, suffix))
        })
    }

    /// Containers are delimited by a paired open/close token and carry a nested tree.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Check
                | NodeKind::Radio
                | NodeKind::Drag
                | NodeKind::Drop
                | NodeKind::Solution
                | NodeKind::Shuffle
                | NodeKind::Markdown
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Content => "content",
            other => other.keyword(),
        };
        write!(f, "{}", name)
    }
}

/// A variable's value: either numeric or textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Number(n) => write_number(*n, f),
            VarValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Numbers print the way the front end prints them: plain decimals, except for magnitudes
/// of at least 1e21 or below 1e-6, which use an exponent with an explicit sign.
fn write_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n == 0.0 {
        return write!(f, "0");
    }
    if n.is_infinite() {
        let sign = if n < 0.0 { "-" } else { "" };
        return write!(f, "{}Infinity", sign);
    }
    let magnitude = n.abs();
    if n.is_nan() || (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{}", n);
    }
    let scientific = format!("{:e}", n);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{}e+{}", mantissa, exponent)
        }
        _ => write!(f, "{}", scientific),
    }
}

impl From<i64> for VarValue {
    fn from(value: i64) -> Self {
        VarValue::Number(value as f64)
    }
}

impl From<i32> for VarValue {
    fn from(value: i32) -> Self {
        VarValue::Number(f64::from(value))
    }
}

impl From<f64> for VarValue {
    fn from(value: f64) -> Self {
        VarValue::Number(value)
    }
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        VarValue::Text(value.to_string())
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        VarValue::Text(value)
    }
}

/// Literal text between constructs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub content: String,
}

/// A named value substituted into the rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub var_name: String,
    pub value: VarValue,
}

/// A response field with no payload: input, essay and code nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub var_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub var_name: String,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub var_name: String,
    pub equations: Vec<String>,
}

/// A named container with a nested body: check, radio, drag, drop, solution and markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub var_name: String,
    #[serde(rename = "content")]
    pub children: Tree,
}

/// A container whose non-content children are rendered in a permuted order.
///
/// `shuffled_indices[k]` is the position (in `children`) of the child rendered in the
/// k-th non-content slot. It is always a permutation of the non-content positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shuffle {
    pub var_name: String,
    #[serde(rename = "content")]
    pub children: Tree,
    pub shuffled_indices: Vec<usize>,
}

impl Shuffle {
    /// Positions of the non-content children, in source order.
    pub fn slots(&self) -> Vec<usize> {
        crate::assessml::shuffle::slots_of(&self.children)
    }
}

/// Any node that can appear in a [Tree].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Node {
    Content(Content),
    Variable(Variable),
    Input(Field),
    Essay(Field),
    Code(Field),
    Check(Container),
    Radio(Container),
    Drag(Container),
    Drop(Container),
    Image(Image),
    Graph(Graph),
    Solution(Container),
    Shuffle(Shuffle),
    Markdown(Container),
}

impl Node {
    pub fn content(text: impl Into<String>) -> Self {
        Node::Content(Content {
            content: text.into(),
        })
    }

    pub fn variable(var_name: impl Into<String>, value: impl Into<VarValue>) -> Self {
        Node::Variable(Variable {
            var_name: var_name.into(),
            value: value.into(),
        })
    }

    pub fn input(var_name: impl Into<String>) -> Self {
        Node::Input(Field {
            var_name: var_name.into(),
        })
    }

    pub fn essay(var_name: impl Into<String>) -> Self {
        Node::Essay(Field {
            var_name: var_name.into(),
        })
    }

    pub fn code(var_name: impl Into<String>) -> Self {
        Node::Code(Field {
            var_name: var_name.into(),
        })
    }

    pub fn image(var_name: impl Into<String>, src: impl Into<String>) -> Self {
        Node::Image(Image {
            var_name: var_name.into(),
            src: src.into(),
        })
    }

    pub fn graph(var_name: impl Into<String>, equations: Vec<String>) -> Self {
        Node::Graph(Graph {
            var_name: var_name.into(),
            equations,
        })
    }

    pub fn shuffle(
        var_name: impl Into<String>,
        children: Tree,
        shuffled_indices: Vec<usize>,
    ) -> Self {
        Node::Shuffle(Shuffle {
            var_name: var_name.into(),
            children,
            shuffled_indices,
        })
    }

    /// Build a container node of the given kind.
    ///
    /// Shuffle containers get the identity order; non-container kinds return `None`.
    pub fn container(kind: NodeKind, var_name: impl Into<String>, children: Tree) -> Option<Self> {
        let var_name = var_name.into();
        if kind == NodeKind::Shuffle {
            let mut shuffle = Shuffle {
                var_name,
                children,
                shuffled_indices: Vec::new(),
            };
            shuffle.shuffled_indices = shuffle.slots();
            return Some(Node::Shuffle(shuffle));
        }

        let container = Container { var_name, children };
        match kind {
            NodeKind::Check => Some(Node::Check(container)),
            NodeKind::Radio => Some(Node::Radio(container)),
            NodeKind::Drag => Some(Node::Drag(container)),
            NodeKind::Drop => Some(Node::Drop(container)),
            NodeKind::Solution => Some(Node::Solution(container)),
            NodeKind::Markdown => Some(Node::Markdown(container)),
            _ => None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Content(_) => NodeKind::Content,
            Node::Variable(_) => NodeKind::Variable,
            Node::Input(_) => NodeKind::Input,
            Node::Essay(_) => NodeKind::Essay,
            Node::Code(_) => NodeKind::Code,
            Node::Check(_) => NodeKind::Check,
            Node::Radio(_) => NodeKind::Radio,
            Node::Drag(_) => NodeKind::Drag,
            Node::Drop(_) => NodeKind::Drop,
            Node::Image(_) => NodeKind::Image,
            Node::Graph(_) => NodeKind::Graph,
            Node::Solution(_) => NodeKind::Solution,
            Node::Shuffle(_) => NodeKind::Shuffle,
            Node::Markdown(_) => NodeKind::Markdown,
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Node::Content(_))
    }

    /// The node's name; every kind except content has one.
    pub fn var_name(&self) -> Option<&str> {
        match self {
            Node::Content(_) => None,
            Node::Variable(v) => Some(&v.var_name),
            Node::Input(f) | Node::Essay(f) | Node::Code(f) => Some(&f.var_name),
            Node::Image(i) => Some(&i.var_name),
            Node::Graph(g) => Some(&g.var_name),
            Node::Check(c)
            | Node::Radio(c)
            | Node::Drag(c)
            | Node::Drop(c)
            | Node::Solution(c)
            | Node::Markdown(c) => Some(&c.var_name),
            Node::Shuffle(s) => Some(&s.var_name),
        }
    }

    /// Nested body of container nodes.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Check(c)
            | Node::Radio(c)
            | Node::Drag(c)
            | Node::Drop(c)
            | Node::Solution(c)
            | Node::Markdown(c) => Some(&c.children),
            Node::Shuffle(s) => Some(&s.children),
            _ => None,
        }
    }

    /// Rebuild this node with a new body. Leaves are returned unchanged.
    ///
    /// Shuffle indices are kept as they are; callers that change the number of
    /// non-content children are responsible for reassigning them.
    pub fn with_children(&self, children: Tree) -> Node {
        match self {
            Node::Shuffle(s) => Node::Shuffle(Shuffle {
                var_name: s.var_name.clone(),
                children,
                shuffled_indices: s.shuffled_indices.clone(),
            }),
            Node::Check(c)
            | Node::Radio(c)
            | Node::Drag(c)
            | Node::Drop(c)
            | Node::Solution(c)
            | Node::Markdown(c) => Node::container(self.kind(), c.var_name.clone(), children)
                .unwrap_or_else(|| self.clone()),
            leaf => leaf.clone(),
        }
    }
}
