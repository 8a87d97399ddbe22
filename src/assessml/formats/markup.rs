//! Canonical markup serialization
//!
//!     The round-trip form. Content is written literally, every other node as `[{varName}]`,
//!     and containers wrap their body in that same token on both sides. Because every token
//!     carries the node's own name, re-parsing recovers exactly the same pairing and names.
//!
//!     Payloads are not written; re-parsing resolves them through a provider.
//!     Shuffles are written in source order, their permutation is a payload.
//!
//! Trees that cannot survive the trip are rejected instead of written:
//!
//!     - a run of adjacent content that would lex as a construct,
//!     - a name that is not the node's keyword followed by a non-empty suffix without
//!       brackets or whitespace,
//!     - a container nested inside an identically named container of the same kind.

use crate::assessml::ast::{Node, NodeKind};
use crate::assessml::error::FormatError;
use crate::assessml::formats::registry::Formatter;
use crate::assessml::lexing::is_plain_text;

/// Serialize `tree` to canonical markup.
pub fn serialize_markup(tree: &[Node]) -> Result<String, FormatError> {
    let mut out = String::new();
    let mut open: Vec<(NodeKind, &str)> = Vec::new();
    write_level(tree, &mut out, &mut open)?;
    Ok(out)
}

fn write_level<'a>(
    tree: &'a [Node],
    out: &mut String,
    open: &mut Vec<(NodeKind, &'a str)>,
) -> Result<(), FormatError> {
    let mut text = String::new();
    for node in tree {
        let var_name = match node {
            Node::Content(c) => {
                text.push_str(&c.content);
                continue;
            }
            other => other.var_name().unwrap_or_default(),
        };
        write_text(&mut text, out)?;

        let kind = node.kind();
        check_name(kind, var_name)?;
        let token = format!("[{}]", var_name);
        out.push_str(&token);

        if let Some(children) = node.children() {
            if open.contains(&(kind, var_name)) {
                return Err(FormatError::SerializationError(format!(
                    "{} is nested inside a container with the same name",
                    token
                )));
            }
            open.push((kind, var_name));
            write_level(children, out, open)?;
            open.pop();
            out.push_str(&token);
        }
    }
    write_text(&mut text, out)
}

/// Write a run of adjacent content, which re-parses as a single text run.
fn write_text(text: &mut String, out: &mut String) -> Result<(), FormatError> {
    if !is_plain_text(text) {
        return Err(FormatError::SerializationError(format!(
            "content {:?} would be read back as a construct",
            text
        )));
    }
    out.push_str(text);
    text.clear();
    Ok(())
}

fn check_name(kind: NodeKind, var_name: &str) -> Result<(), FormatError> {
    let suffix = var_name.strip_prefix(kind.keyword()).unwrap_or_default();
    let valid = var_name.starts_with(kind.keyword())
        && !suffix.is_empty()
        && !suffix
            .chars()
            .any(|c| c == '[' || c == ']' || c.is_whitespace());
    if valid {
        Ok(())
    } else {
        Err(FormatError::SerializationError(format!(
            "{:?} is not a valid name for a {} node",
            var_name, kind
        )))
    }
}

/// The `markup` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupFormatter;

impl Formatter for MarkupFormatter {
    fn name(&self) -> &str {
        "markup"
    }

    fn serialize(&self, tree: &[Node]) -> Result<String, FormatError> {
        serialize_markup(tree)
    }

    fn description(&self) -> &str {
        "Canonical AssessML markup"
    }
}
