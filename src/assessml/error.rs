//! Error types
//!
//! Parsing fails fast on structurally broken markup instead of guessing a pairing:
//! an open container token without its matching close is reported with its byte offset.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors raised while building a tree from markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unbalanced container: {token} at byte {offset} has no matching close token")]
    Unbalanced { token: String, offset: usize },

    #[error("nesting too deep: {token} at byte {offset} exceeds the limit of {limit} levels")]
    NestingTooDeep {
        token: String,
        offset: usize,
        limit: usize,
    },
}

/// Errors raised while serializing a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Top-level error for callers that drive the whole pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::Unbalanced {
            token: "[check1]".to_string(),
            offset: 4,
        };
        assert_eq!(
            err.to_string(),
            "unbalanced container: [check1] at byte 4 has no matching close token"
        );
    }

    #[test]
    fn test_format_error_display() {
        let err1 = FormatError::FormatNotFound("test".to_string());
        assert_eq!(format!("{err1}"), "Format 'test' not found");

        let err2 = FormatError::SerializationError("error".to_string());
        assert_eq!(format!("{err2}"), "Serialization error: error");
    }

    #[test]
    fn test_error_wraps_parse_error() {
        let err: Error = ParseError::NestingTooDeep {
            token: "[check]".to_string(),
            offset: 0,
            limit: 2,
        }
        .into();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("limit of 2 levels"));
    }
}
