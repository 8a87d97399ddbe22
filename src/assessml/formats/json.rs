//! JSON serialization of the tree itself

use crate::assessml::ast::Node;
use crate::assessml::error::FormatError;
use crate::assessml::formats::registry::Formatter;

/// The `json` format: the tree in the front end's JSON shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, tree: &[Node]) -> Result<String, FormatError> {
        serde_json::to_string_pretty(tree)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "The parsed tree as JSON"
    }
}
