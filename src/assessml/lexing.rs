//! Lexing for AssessML markup
//!
//!     The lexer is the set of construct matchers: it turns the source into a flat stream of
//!     construct tags and text runs, each paired with its byte span. Construct priority is
//!     resolved here once, so the parser only deals with tags, never with raw patterns.
//!
//!     Spans are kept so the parser can report the offset of a broken container and can copy
//!     content text verbatim from the source.

pub mod tokens;

pub use tokens::{Tag, Token};

use logos::Logos;

/// Tokenize source with location information
///
/// Spans the logos lexer cannot classify are kept as text: whatever is not a construct
/// is content, so tokenization never fails.
pub fn tokenize(source: &str) -> Vec<(Token, logos::Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => tokens.push((Token::Text, lexer.span())),
        }
    }

    tokens
}

/// True when `text` contains nothing that would lex as a construct.
pub fn is_plain_text(text: &str) -> bool {
    tokenize(text).iter().all(|(token, _)| token.is_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessml::ast::NodeKind;

    #[test]
    fn test_tokenizes() {
        let tokens = tokenize("Is [var1] the same as [var2]?[input]");
        let kinds: Vec<_> = tokens.iter().map(|(t, _)| t.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Text,
                Token::Tag(Tag::new(NodeKind::Variable, "1")),
                Token::Text,
                Token::Tag(Tag::new(NodeKind::Variable, "2")),
                Token::Text,
                Token::Tag(Tag::new(NodeKind::Input, "")),
            ]
        );
        assert_eq!(tokens[0].1, 0..3);
        assert_eq!(tokens[1].1, 3..9);
        assert_eq!(tokens[5].1, 29..36);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn test_spans_cover_source() {
        let source = "x[[var1]]y[ [check]\n[check]";
        let tokens = tokenize(source);
        let rebuilt: String = tokens.iter().map(|(_, span)| &source[span.clone()]).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_is_plain_text() {
        assert!(is_plain_text("no constructs [here] at all"));
        assert!(is_plain_text("[variable"));
        assert!(!is_plain_text("has a [var1] in it"));
    }
}
