//! Token definitions for AssessML markup
//!
//! Every construct is a single bracketed token: a keyword followed by an optional suffix,
//! e.g. `[var1]`, `[input]`, `[check-a]`. Containers use the same token to open and close.
//! Anything else is text. A lone `[` that does not start a construct is its own token so
//! that text runs stop right before any possible construct.
use crate::assessml::ast::NodeKind;
use logos::Logos;
use std::fmt;

/// A recognized construct token: its kind and the literal suffix after the keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub kind: NodeKind,
    pub suffix: String,
}

impl Tag {
    pub fn new(kind: NodeKind, suffix: impl Into<String>) -> Self {
        Tag {
            kind,
            suffix: suffix.into(),
        }
    }

    /// The name given explicitly by the suffix, if there is one.
    pub fn explicit_name(&self) -> Option<String> {
        if self.suffix.is_empty() {
            None
        } else {
            Some(format!("{}{}", self.kind.keyword(), self.suffix))
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}{}]", self.kind.keyword(), self.suffix)
    }
}

fn tag(lex: &mut logos::Lexer<Token>) -> Option<Tag> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    NodeKind::split_keyword(inner).map(|(kind, suffix)| Tag::new(kind, suffix))
}

/// All possible tokens in AssessML markup
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
pub enum Token {
    #[regex(
        r"\[(var|input|essay|code|check|radio|drag|drop|solution|markdown|shuffle|img|graph)[^\[\]\s]*\]",
        tag
    )]
    Tag(Tag),

    // Text content (everything up to the next bracket)
    #[regex(r"[^\[]+")]
    Text,

    // A bracket that does not open a construct
    #[token("[")]
    Bracket,
}

impl Token {
    /// Text and stray brackets both end up in content nodes.
    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text | Token::Bracket)
    }
}
