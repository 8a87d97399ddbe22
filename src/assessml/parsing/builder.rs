//! Tree builder
//!
//!     Recursive descent over the token stream. Each call to [TreeBuilder::build_scope] owns
//!     one scope: its own auto-numbering counters and the nodes built so far at that level.
//!     A container tag opens a nested scope that runs until the identical tag closes it, so a
//!     container of the same kind with a different suffix nests correctly, and a crossing or
//!     missing close is reported instead of silently mispaired.
//!
//!     The payload provider is shared by every scope of one parse.

use crate::assessml::ast::{Node, NodeKind, Tree, VarValue};
use crate::assessml::error::ParseError;
use crate::assessml::lexing::{Tag, Token};
use crate::assessml::providers::PayloadProvider;
use crate::assessml::shuffle::{is_valid_order, slots_of};
use std::collections::HashMap;

/// State of one nesting level.
#[derive(Default)]
struct Scope {
    counts: HashMap<NodeKind, usize>,
    nodes: Tree,
}

impl Scope {
    /// Count the tag and return its name: the explicit suffix if present, else `{kind}{n}`.
    fn name_for(&mut self, tag: &Tag) -> String {
        let count = self.counts.entry(tag.kind).or_insert(0);
        *count += 1;
        let number = *count;
        tag.explicit_name()
            .unwrap_or_else(|| format!("{}{}", tag.kind.keyword(), number))
    }

    /// Value of an earlier same-named variable at this level.
    fn prior_value(&self, var_name: &str) -> Option<VarValue> {
        self.nodes.iter().find_map(|node| match node {
            Node::Variable(v) if v.var_name == var_name => Some(v.value.clone()),
            _ => None,
        })
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Content(previous)) = self.nodes.last_mut() {
            previous.content.push_str(text);
            return;
        }
        self.nodes.push(Node::content(text));
    }

    fn push(&mut self, node: Node) {
        tracing::trace!(kind = %node.kind(), var_name = ?node.var_name(), "built node");
        self.nodes.push(node);
    }
}

/// An open container waiting for its close tag.
struct Open<'t> {
    tag: &'t Tag,
    offset: usize,
}

pub(crate) struct TreeBuilder<'s, 'p> {
    source: &'s str,
    tokens: Vec<(Token, logos::Span)>,
    pos: usize,
    provider: &'p mut dyn PayloadProvider,
    max_depth: usize,
}

impl<'s, 'p> TreeBuilder<'s, 'p> {
    pub(crate) fn new(
        source: &'s str,
        tokens: Vec<(Token, logos::Span)>,
        provider: &'p mut dyn PayloadProvider,
        max_depth: usize,
    ) -> Self {
        TreeBuilder {
            source,
            tokens,
            pos: 0,
            provider,
            max_depth,
        }
    }

    pub(crate) fn build(mut self) -> Result<Tree, ParseError> {
        self.build_scope(None, 0)
    }

    /// Build nodes until the end of input, or until the tag that closes `open`.
    fn build_scope(&mut self, open: Option<Open<'_>>, depth: usize) -> Result<Tree, ParseError> {
        let mut scope = Scope::default();

        loop {
            let Some((token, span)) = self.tokens.get(self.pos).cloned() else {
                return match open {
                    Some(open) => Err(ParseError::Unbalanced {
                        token: open.tag.to_string(),
                        offset: open.offset,
                    }),
                    None => Ok(scope.nodes),
                };
            };
            self.pos += 1;

            let tag = match token {
                Token::Text | Token::Bracket => {
                    scope.push_text(&self.source[span]);
                    continue;
                }
                Token::Tag(tag) => tag,
            };

            if !tag.kind.is_container() {
                let node = self.leaf(&mut scope, &tag);
                scope.push(node);
                continue;
            }

            if open.as_ref().is_some_and(|open| *open.tag == tag) {
                return Ok(scope.nodes);
            }

            if depth >= self.max_depth {
                return Err(ParseError::NestingTooDeep {
                    token: tag.to_string(),
                    offset: span.start,
                    limit: self.max_depth,
                });
            }

            let var_name = scope.name_for(&tag);
            let children = {
                let _span = tracing::debug_span!("scope", container = %var_name, depth = depth + 1)
                    .entered();
                self.build_scope(
                    Some(Open {
                        tag: &tag,
                        offset: span.start,
                    }),
                    depth + 1,
                )?
            };
            let node = self.container(tag.kind, var_name, children);
            scope.push(node);
        }
    }

    fn leaf(&mut self, scope: &mut Scope, tag: &Tag) -> Node {
        let var_name = scope.name_for(tag);
        match tag.kind {
            NodeKind::Variable => {
                let value = match scope.prior_value(&var_name) {
                    Some(value) => value,
                    None => self.provider.variable_value(&var_name),
                };
                Node::variable(var_name, value)
            }
            NodeKind::Image => {
                let src = self.provider.image_src(&var_name);
                Node::image(var_name, src)
            }
            NodeKind::Graph => {
                let equations = self.provider.graph_equations(&var_name);
                Node::graph(var_name, equations)
            }
            NodeKind::Essay => Node::essay(var_name),
            NodeKind::Code => Node::code(var_name),
            // input; container tags never reach here
            _ => Node::input(var_name),
        }
    }

    fn container(&mut self, kind: NodeKind, var_name: String, children: Tree) -> Node {
        if kind != NodeKind::Shuffle {
            return Node::container(kind, var_name.clone(), children)
                .unwrap_or_else(|| Node::input(var_name));
        }

        let slots = slots_of(&children);
        let order = match self.provider.shuffle_order(&var_name) {
            Some(order) if is_valid_order(&order, &slots) => order,
            Some(order) => {
                tracing::warn!(
                    var_name = %var_name,
                    ?order,
                    ?slots,
                    "resolved shuffle order does not fit the children, regenerating"
                );
                self.fresh_order(slots)
            }
            None => {
                tracing::debug!(
                    var_name = %var_name,
                    "no shuffle order resolved, generating a fresh one"
                );
                self.fresh_order(slots)
            }
        };
        Node::shuffle(var_name, children, order)
    }

    fn fresh_order(&mut self, slots: Vec<usize>) -> Vec<usize> {
        let order = self.provider.fresh_shuffle(slots.clone());
        if is_valid_order(&order, &slots) {
            order
        } else {
            slots
        }
    }
}
