//! Parsing AssessML markup into a tree
//!
//!     The parser consumes the token stream produced by [lexing](crate::assessml::lexing) and
//!     builds a [Tree]. Payloads (variable values, image sources, graph equations, shuffle
//!     orders) are resolved through an injected [PayloadProvider].
//!
//! Naming
//!
//!     A construct with an explicit suffix is named `{keyword}{suffix}` (`[var3]` is `var3`,
//!     `[check-a]` is `check-a`). A bare construct is named `{keyword}{n}`, where n counts the
//!     constructs of that kind seen so far in the enclosing scope. Every container body is a
//!     new scope whose counters start at zero.
//!
//! Variables
//!
//!     A variable whose name already appeared earlier in the same scope reuses that value;
//!     otherwise the provider is asked. Parsing a document twice yields the same tree only if
//!     the provider is consistent, e.g. [ReferencePayloads](crate::assessml::providers::ReferencePayloads).
//!
//! Failure
//!
//!     A container that is never closed by its identical tag is an error
//!     ([ParseError::Unbalanced]), as is nesting deeper than [ParseOptions::max_depth].

pub mod builder;

use crate::assessml::ast::Tree;
use crate::assessml::error::ParseError;
use crate::assessml::lexing::tokenize;
use crate::assessml::providers::PayloadProvider;
use builder::TreeBuilder;

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested container levels.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { max_depth: 64 }
    }
}

/// Parse `source` with default options.
pub fn parse(source: &str, provider: &mut dyn PayloadProvider) -> Result<Tree, ParseError> {
    parse_with(source, provider, &ParseOptions::default())
}

/// Parse `source` with explicit options.
pub fn parse_with(
    source: &str,
    provider: &mut dyn PayloadProvider,
    options: &ParseOptions,
) -> Result<Tree, ParseError> {
    let _span = tracing::debug_span!("parse", len = source.len()).entered();
    let tokens = tokenize(source);
    tracing::debug!(tokens = tokens.len(), "tokenized");
    TreeBuilder::new(source, tokens, provider, options.max_depth).build()
}
