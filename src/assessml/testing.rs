//! Testing utilities
//!
//! [verify_html] checks that a piece of HTML is what [serialize_html](crate::assessml::formats::serialize_html)
//! renders for a tree, for whatever radio group names were drawn. Group names are random, so
//! instead of comparing strings the verifier consumes the HTML node by node and only checks that
//! the names are consistent: every radio in one run shares a name, and consecutive runs use
//! different names.
//!
//! [prepare_round_trip_tree] turns an arbitrary tree into one that survives
//! markup -> parse unchanged, which is what round-trip tests compare against.

use crate::assessml::ast::{Node, Tree};
use crate::assessml::formats::html::{
    checkbox_html, code_html, essay_html, graph_html, image_html, input_html, is_blank,
    solution_open, DRAG_STUB, DROP_STUB, MARKDOWN_CLOSE, MARKDOWN_OPEN, SOLUTION_CLOSE,
};
use crate::assessml::query::{flatten_adjacent_content, normalize_variables};
use crate::assessml::shuffle::{assign_shuffle_orders, render_order};
use once_cell::sync::Lazy;
use regex::Regex;

static RADIO_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<input id="([^"]*)" type="radio" name="([^"]*)" style="[^"]*">"#)
        .expect("radio pattern is valid")
});

/// True when `html` is a rendering of `tree`.
pub fn verify_html(tree: &[Node], html: &str) -> bool {
    let mut rest = html;
    verify_level(tree.iter(), &mut rest) && rest.is_empty()
}

fn verify_level<'a>(nodes: impl IntoIterator<Item = &'a Node>, rest: &mut &str) -> bool {
    let mut group: Option<String> = None;
    let mut previous: Option<String> = None;

    for node in nodes {
        let Node::Radio(radio) = node else {
            if !is_blank(node) {
                if let Some(ended) = group.take() {
                    previous = Some(ended);
                }
            }
            if !verify_node(node, rest) {
                return false;
            }
            continue;
        };

        let Some(name) = consume_radio(rest, &radio.var_name) else {
            return false;
        };
        match group.as_ref().map(|current| *current == name) {
            Some(false) => return false,
            Some(true) => {}
            None if previous.as_ref() == Some(&name) => return false,
            None => group = Some(name),
        }
        if !verify_level(&radio.children, rest) {
            return false;
        }
    }
    true
}

fn verify_node(node: &Node, rest: &mut &str) -> bool {
    match node {
        Node::Content(c) => consume(rest, &c.content),
        Node::Variable(v) => consume(rest, &v.value.to_string()),
        Node::Input(f) => consume(rest, &input_html(&f.var_name)),
        Node::Essay(f) => consume(rest, &essay_html(&f.var_name)),
        Node::Code(f) => consume(rest, &code_html(&f.var_name)),
        Node::Image(i) => consume(rest, &image_html(&i.src)),
        Node::Graph(g) => consume(rest, &graph_html(&g.equations)),
        Node::Check(c) => {
            consume(rest, &checkbox_html(&c.var_name)) && verify_level(&c.children, rest)
        }
        Node::Radio(_) => verify_level(std::iter::once(node), rest),
        Node::Solution(s) => {
            consume(rest, &solution_open(&s.var_name))
                && verify_level(&s.children, rest)
                && consume(rest, SOLUTION_CLOSE)
        }
        Node::Markdown(m) => {
            consume(rest, MARKDOWN_OPEN)
                && verify_level(&m.children, rest)
                && consume(rest, MARKDOWN_CLOSE)
        }
        Node::Shuffle(s) => verify_level(render_order(s), rest),
        Node::Drag(_) => consume(rest, DRAG_STUB),
        Node::Drop(_) => consume(rest, DROP_STUB),
    }
}

fn consume<'h>(rest: &mut &'h str, expected: &str) -> bool {
    match rest.strip_prefix(expected) {
        Some(remaining) => {
            *rest = remaining;
            true
        }
        None => false,
    }
}

/// Consume one radio input for `var_name`, returning its group name.
fn consume_radio<'h>(rest: &mut &'h str, var_name: &str) -> Option<String> {
    let current: &'h str = *rest;
    let captures = RADIO_INPUT.captures(current)?;
    if &captures[1] != var_name {
        return None;
    }
    let name = captures[2].to_string();
    *rest = &current[captures[0].len()..];
    Some(name)
}

/// Normalize `tree` so that printing it as markup and parsing it back (with the tree
/// itself as the payload reference) yields exactly the result.
///
/// Adjacent content is merged, same-named variables take their first value, and every
/// shuffle gets a deterministic order (reversed slots).
pub fn prepare_round_trip_tree(tree: &[Node]) -> Tree {
    let flattened = flatten_adjacent_content(tree);
    let normalized = normalize_variables(&flattened);
    assign_shuffle_orders(&normalized, &mut |_, mut slots| {
        slots.reverse();
        slots
    })
}
