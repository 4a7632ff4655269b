//! adf-core - Typed model and JSON codec for Atlassian Document Format
//!
//! This crate turns an ADF JSON tree into a closed, strongly typed node/mark
//! model and back. It is used by `adf-markdown` to render documents, but has
//! no knowledge of Markdown itself.
//!
//! # Architecture
//!
//! ```text
//!                 decode            ┌─────────────────┐
//! JSON Value ─────────────────────▶ │ Node / Mark     │
//!            ◀───────────────────── │ + attrs records │
//!                 to_map            └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use adf_core::{decode, Node};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "type": "paragraph",
//!     "content": [{"type": "text", "text": "Hello", "marks": [{"type": "strong"}]}]
//! });
//!
//! let node = decode(&raw).unwrap();
//! assert_eq!(node.content().len(), 1);
//! assert_eq!(node.to_value(), raw);
//! ```

mod decode;
mod encode;
mod error;
mod field;
pub mod model;

pub use decode::{decode, Decodable, DecodeOptions, Decoder};
pub use error::{AdfError, Discriminator, Result};
pub use field::{
    field_table, Field, FieldAt, FieldKind, FieldSpec, FieldTable, FieldValue, Record,
    RecordReader, RecordWriter,
};
pub use model::{Mark, MarkKind, Node, NodeKind};
