//! Format registry for tree serialization
//!
//! This module provides a pluggable registry system for tree serialization formats.
//! Each format implements the `Formatter` trait and can be registered with `FormatRegistry`.

use crate::assessml::ast::Node;
use crate::assessml::config::AssessmlConfig;
use crate::assessml::error::FormatError;
use std::collections::HashMap;

/// Trait for tree formatters
///
/// Implementors provide a way to serialize a tree to a string representation.
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "html", "markup")
    fn name(&self) -> &str;

    /// Serialize a tree to this format
    fn serialize(&self, tree: &[Node]) -> Result<String, FormatError>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of tree formatters
///
/// Provides a centralized registry for all available serialization formats.
/// Formats can be registered and retrieved by name.
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter
    ///
    /// If a formatter with the same name already exists, it will be replaced.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    /// Get a formatter by name
    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Serialize a tree using the specified format
    pub fn serialize(&self, tree: &[Node], format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        let output = formatter.serialize(tree)?;
        tracing::debug!(format, bytes = output.len(), "serialized tree");
        Ok(output)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with default formatters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Register built-in formatters
        registry.register(super::HtmlFormatter::default());
        registry.register(super::MarkupFormatter);
        registry.register(super::JsonFormatter);

        registry
    }

    /// Default formatters, with the HTML formatter configured from `config`
    pub fn from_config(config: &AssessmlConfig) -> Self {
        let mut registry = Self::with_defaults();
        registry.register(super::HtmlFormatter::from_config(config));
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
