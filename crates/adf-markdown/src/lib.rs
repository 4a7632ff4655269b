//! # adf-markdown
//!
//! Convert Atlassian Document Format (ADF) trees to Markdown.
//!
//! ## Design
//!
//! Conversion runs in two passes over an in-memory tree:
//!
//! - **Decode**: the raw JSON is turned into the typed [`Node`] model from
//!   `adf-core`, enforcing each node's field contract.
//! - **Render**: the typed tree is walked depth-first and every node applies
//!   its own Markdown rule (list indentation, quote prefixing, table escaping).
//!
//! Both passes stop on the first error unless [`Options::permissive`] is set,
//! in which case defective subtrees are dropped and logged.
//!
//! ## Example
//!
//! ```rust
//! use adf_markdown::AdfConverter;
//! use serde_json::json;
//!
//! let converter = AdfConverter::new();
//! let doc = json!({
//!     "type": "doc",
//!     "version": 1,
//!     "content": [
//!         {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Hello World"}]}
//!     ]
//! });
//!
//! let markdown = converter.convert(&doc).unwrap();
//! assert_eq!(markdown, "# Hello World");
//! ```

mod options;
mod render;
mod service;
mod utilities;

pub use adf_core::{decode, AdfError, Decoder, Field, Mark, MarkKind, Node, NodeKind};
pub use options::{Options, QuoteStyle};
pub use render::{wrap_mark, ToMarkdown};
pub use service::AdfConverter;
pub use utilities::{escape_table_cell, indent, iso_date, quote};

pub type Result<T> = std::result::Result<T, AdfError>;
