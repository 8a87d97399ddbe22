//! Main module for AssessML library functionality
//!
//! Pipeline: [lexing] turns markup into tokens, [parsing] builds a [Tree](ast::Tree) with
//! payloads resolved through a [PayloadProvider](providers::PayloadProvider), and [formats]
//! serializes the tree to HTML, canonical markup or JSON.

pub mod ast;
pub mod config;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod providers;
pub mod query;
pub mod shuffle;
pub mod testing;

pub use ast::{Node, NodeKind, Tree, VarValue};
pub use error::{Error, FormatError, ParseError, Result};
pub use parsing::{parse, parse_with, ParseOptions};
pub use providers::{PayloadProvider, RandomPayloads, ReferencePayloads};

/// Parse `source` and render it as HTML with random radio group names.
pub fn compile_to_html(source: &str, provider: &mut dyn PayloadProvider) -> Result<String> {
    let tree = parse(source, provider)?;
    Ok(formats::to_html(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessml::testing::verify_html;

    #[test]
    fn test_compile_to_html() {
        let mut provider = RandomPayloads::seeded(1);
        let html = compile_to_html("Type [input] here", &mut provider).unwrap();
        let tree = vec![
            Node::content("Type "),
            Node::input("input1"),
            Node::content(" here"),
        ];
        assert!(verify_html(&tree, &html));
    }

    #[test]
    fn test_compile_to_html_reports_parse_errors() {
        let mut provider = RandomPayloads::seeded(1);
        let err = compile_to_html("[check] never closed", &mut provider).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::Unbalanced { offset: 0, .. })
        ));
    }
}
