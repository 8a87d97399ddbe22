//! Output formats for AssessML trees
//!
//! - html: interactive display form
//! - markup: canonical AssessML, the round-trip form
//! - json: the tree itself, in the front end's JSON shape

pub mod html;
pub mod json;
pub mod markup;
pub mod registry;

pub use html::{serialize_html, to_html, HtmlFormatter};
pub use json::JsonFormatter;
pub use markup::{serialize_markup, MarkupFormatter};
pub use registry::{FormatRegistry, Formatter};
