//! HTML serialization
//!
//!     Every node kind renders through a fixed literal template, and container bodies render
//!     recursively right after (or inside) their control. The tree is expected to carry
//!     resolved payloads already: variables render their value, images their src, graphs their
//!     equations.
//!
//! Radio groups
//!
//!     Radios that follow each other, separated by nothing but blank content, form one
//!     mutually exclusive group and share a name. Any other node ends the run; the next radio
//!     starts a new group. Group names come from an injected generator.
//!
//! Shuffles
//!
//!     Shuffles render their children in the permuted order (see
//!     [render_order](crate::assessml::shuffle::render_order)) without a wrapper element.
//!
//! Drag and drop are not implemented and render a fixed stub.

use crate::assessml::ast::Node;
use crate::assessml::config::{AssessmlConfig, RandomConfig};
use crate::assessml::error::FormatError;
use crate::assessml::formats::registry::Formatter;
use crate::assessml::providers::{random_hex_id, RandomPayloads};
use crate::assessml::shuffle::render_order;

const CONTROL_STYLE: &str = "width: calc(40px - 1vw); height: calc(40px - 1vw);";

pub const SOLUTION_CLOSE: &str = "</template>";
pub const MARKDOWN_OPEN: &str =
    r#"<marked-element><div slot="markdown-html"></div><script type="text/markdown">"#;
pub const MARKDOWN_CLOSE: &str = "</script></marked-element>";
pub const DRAG_STUB: &str = "DRAG NOT IMPLEMENTED";
pub const DROP_STUB: &str = "DROP NOT IMPLEMENTED";

pub fn input_html(var_name: &str) -> String {
    format!(
        r#"<span id="{}" contenteditable="true" style="display: inline-block; min-width: 25px; min-height: 25px; padding: 5px; box-shadow: 0px 0px 1px black;"></span>"#,
        var_name
    )
}

pub fn essay_html(var_name: &str) -> String {
    format!(
        r#"<textarea id="{}" style="width: 100%; height: 50vh;"></textarea>"#,
        var_name
    )
}

pub fn code_html(var_name: &str) -> String {
    format!(
        r#"<juicy-ace-editor id="{}" theme="ace/theme/chrome" mode="ace/mode/javascript" style="height: 50vh" fontsize="25px"></juicy-ace-editor>"#,
        var_name
    )
}

pub fn image_html(src: &str) -> String {
    format!(r#"<img src="{}">"#, src)
}

/// A function plot with the equations as a literal JSON array attribute.
pub fn graph_html(equations: &[String]) -> String {
    let data = equations
        .iter()
        .map(|equation| format!(r#"{{ "fn": "{}" }}"#, equation))
        .collect::<Vec<_>>()
        .join(",");
    format!("<function-plot data='[{}]'></function-plot>", data)
}

pub fn checkbox_html(var_name: &str) -> String {
    format!(
        r#"<input id="{}" type="checkbox" style="{}">"#,
        var_name, CONTROL_STYLE
    )
}

pub fn radio_html(var_name: &str, group: &str) -> String {
    format!(
        r#"<input id="{}" type="radio" name="{}" style="{}">"#,
        var_name, group, CONTROL_STYLE
    )
}

pub fn solution_open(var_name: &str) -> String {
    format!(r#"<template id="{}">"#, var_name)
}

/// Content made only of whitespace does not break a run of radios.
pub fn is_blank(node: &Node) -> bool {
    matches!(node, Node::Content(c) if c.content.trim().is_empty())
}

/// Render `tree`, drawing radio group names from `group_names`.
pub fn serialize_html(tree: &[Node], group_names: &mut dyn FnMut() -> String) -> String {
    let mut out = String::new();
    render_level(tree.iter(), &mut out, group_names);
    out
}

/// Render `tree` with random radio group names.
pub fn to_html(tree: &[Node]) -> String {
    let mut rng = rand::rng();
    serialize_html(tree, &mut || random_hex_id(&mut rng))
}

fn render_level<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    out: &mut String,
    group_names: &mut dyn FnMut() -> String,
) {
    let mut group: Option<String> = None;
    for node in nodes {
        match node {
            Node::Radio(radio) => {
                let name = group.get_or_insert_with(|| group_names());
                out.push_str(&radio_html(&radio.var_name, name));
                render_level(&radio.children, out, group_names);
            }
            other => {
                if !is_blank(other) {
                    group = None;
                }
                render_node(other, out, group_names);
            }
        }
    }
}

fn render_node(node: &Node, out: &mut String, group_names: &mut dyn FnMut() -> String) {
    match node {
        Node::Content(c) => out.push_str(&c.content),
        Node::Variable(v) => out.push_str(&v.value.to_string()),
        Node::Input(f) => out.push_str(&input_html(&f.var_name)),
        Node::Essay(f) => out.push_str(&essay_html(&f.var_name)),
        Node::Code(f) => out.push_str(&code_html(&f.var_name)),
        Node::Image(i) => out.push_str(&image_html(&i.src)),
        Node::Graph(g) => out.push_str(&graph_html(&g.equations)),
        Node::Check(c) => {
            out.push_str(&checkbox_html(&c.var_name));
            render_level(&c.children, out, group_names);
        }
        Node::Radio(_) => render_level(std::iter::once(node), out, group_names),
        Node::Solution(s) => {
            out.push_str(&solution_open(&s.var_name));
            render_level(&s.children, out, group_names);
            out.push_str(SOLUTION_CLOSE);
        }
        Node::Markdown(m) => {
            out.push_str(MARKDOWN_OPEN);
            render_level(&m.children, out, group_names);
            out.push_str(MARKDOWN_CLOSE);
        }
        Node::Shuffle(s) => render_level(render_order(s), out, group_names),
        Node::Drag(_) => out.push_str(DRAG_STUB),
        Node::Drop(_) => out.push_str(DROP_STUB),
    }
}

/// The `html` format: radio group names are random, optionally prefixed and seeded.
#[derive(Debug, Clone, Default)]
pub struct HtmlFormatter {
    pub radio_group_prefix: String,
    pub seed: Option<u64>,
}

impl HtmlFormatter {
    pub fn from_config(config: &AssessmlConfig) -> Self {
        HtmlFormatter {
            radio_group_prefix: config.html.radio_group_prefix.clone(),
            seed: config.random.seed,
        }
    }
}

impl Formatter for HtmlFormatter {
    fn name(&self) -> &str {
        "html"
    }

    fn serialize(&self, tree: &[Node]) -> Result<String, FormatError> {
        let mut names = RandomPayloads::from_config(&RandomConfig {
            seed: self.seed,
            ..RandomConfig::default()
        });
        let prefix = &self.radio_group_prefix;
        Ok(serialize_html(tree, &mut || {
            format!("{}{}", prefix, names.unique_name())
        }))
    }

    fn description(&self) -> &str {
        "HTML for interactive display"
    }
}
