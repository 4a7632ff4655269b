//! Configuration options for Markdown rendering

use indexmap::IndexMap;
use serde::Deserialize;

use crate::Result;

/// Blockquote style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    /// Indent quoted blocks by 4 spaces
    #[default]
    Indented,
    /// Prefix quoted lines with `> `
    Prefixed,
}

/// Options for Markdown rendering
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Skip nodes that fail to decode or render instead of aborting
    pub permissive: bool,

    /// Blockquote style
    pub quote_style: QuoteStyle,

    /// Horizontal rule string
    pub hr: String,

    /// Bullet list marker
    pub bullet_marker: char,

    /// Replacement for line breaks inside table cells
    pub table_line_break: String,

    /// Code block language names to rewrite, e.g. `"c#" -> "csharp"`
    pub code_languages: IndexMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            permissive: false,
            quote_style: QuoteStyle::Indented,
            hr: "---".to_string(),
            bullet_marker: '-',
            table_line_break: "<br>".to_string(),
            code_languages: IndexMap::new(),
        }
    }
}

impl Options {
    /// Parse options from JSON; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_language(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.code_languages.insert(from.into(), to.into());
        self
    }

    /// Fence language for a code block's `language` attribute.
    pub fn code_language<'a>(&'a self, language: &'a str) -> &'a str {
        if let Some(mapped) = self.code_languages.get(language) {
            return mapped;
        }
        self.code_languages
            .get(language.to_lowercase().as_str())
            .map(String::as_str)
            .unwrap_or(language)
    }
}
