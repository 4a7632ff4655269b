//! Conversion entry point
//!
//! [`AdfConverter`] ties decoding and rendering together under one set of
//! [`Options`].

use adf_core::{DecodeOptions, Decoder, Node};
use serde_json::Value;

use crate::options::Options;
use crate::render::ToMarkdown;
use crate::Result;

/// ADF to Markdown converter
#[derive(Debug, Clone, Default)]
pub struct AdfConverter {
    options: Options,
}

impl AdfConverter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with custom options
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    /// Decode a raw JSON tree, honoring the permissive flag.
    pub fn decode(&self, raw: &Value) -> Result<Node> {
        Decoder::with_options(DecodeOptions {
            permissive: self.options.permissive,
        })
        .decode_node(raw)
    }

    /// Render an already decoded tree.
    pub fn render(&self, node: &Node) -> Result<String> {
        let markdown = node.to_markdown_with(&self.options)?;
        Ok(post_process(&markdown))
    }

    /// Convert a raw JSON tree to Markdown.
    ///
    /// In permissive mode a root that cannot be decoded yields an empty
    /// string instead of an error.
    pub fn convert(&self, raw: &Value) -> Result<String> {
        let node = match self.decode(raw) {
            Ok(node) => node,
            Err(e) if self.options.permissive && e.is_recoverable() => {
                tracing::warn!(error = %e, "Root node could not be decoded, producing empty output");
                return Ok(String::new());
            }
            Err(e) => return Err(e),
        };

        let markdown = self.render(&node)?;
        tracing::debug!(
            root = %node.kind(),
            nodes = node.node_count(),
            bytes = markdown.len(),
            "Converted document"
        );
        Ok(markdown)
    }

    /// Convert JSON text to Markdown.
    pub fn convert_str(&self, json: &str) -> Result<String> {
        let raw: Value = serde_json::from_str(json)?;
        self.convert(&raw)
    }

    /// Get a reference to the options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Get a mutable reference to the options
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }
}

/// Trim leading and trailing newlines; indentation is significant and kept.
fn post_process(output: &str) -> String {
    output.trim_matches('\n').to_string()
}
