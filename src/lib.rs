//! # assessml
//!
//! A compiler for AssessML, a small bracket markup for interactive assessment documents:
//! variables, response fields (input, essay, code), choices (check, radio), solutions,
//! markdown blocks, images, graphs and shuffled groups.
//!
//! ## Testing
//!
//! Round-trip and HTML verification helpers live in the [testing module](assessml::testing).

pub mod assessml;
