//! # xmlpretty
//! Reformat an XML document: normalize indentation, and optionally sort
//! and/or filter element attributes.
//!
//! The crate parses a document into a fully owned tree, rewrites attribute
//! lists according to a set of [`AttributeRules`], and serializes the result
//! with a configurable number of spaces per nesting level:
//! - Sorting uses ordinal (byte-wise) comparison of the qualified name
//! - Filtering removes attributes by qualified name
//! - Child order is never altered
//!
//! ## Example
//! ```rust
//! use xmlpretty::{AttributeRules, Document};
//!
//! let src = r#"<catalog z="1" a="2"><book secret="x" /></catalog>"#;
//! let mut doc = Document::parse(src).unwrap();
//!
//! let rules = AttributeRules::new(true, ["secret".to_string()]);
//! rules.apply(&mut doc.root);
//!
//! let formatted = doc.to_xml(3).unwrap();
//! assert_eq!(
//!     formatted,
//!     "<catalog a=\"2\" z=\"1\">\n   <book />\n</catalog>\n"
//! );
//! ```
//!
//! The [`pipeline`] module ties the stages together for the `xmlpretty`
//! binary: load a file, apply the rules, write the formatted output.
#![warn(missing_docs)]

mod document;
pub use document::{Declaration, Document};

mod node;
pub use node::{Attribute, Element, Node, Pi, QName};

pub mod dtd;
pub use dtd::Doctype;

mod process;
pub use process::AttributeRules;

pub mod error;
pub use error::{Error, ErrorKind, Result};

pub mod to_xml;
pub use to_xml::DEFAULT_INDENT;

pub mod pipeline;
pub use pipeline::FormatOptions;

mod cli;
pub use cli::Cli;
