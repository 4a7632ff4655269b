//! Error types for decoding and rendering ADF trees.

use std::fmt;

/// Which discriminator table rejected a `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminator {
    Node,
    Mark,
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discriminator::Node => f.write_str("node"),
            Discriminator::Mark => f.write_str("mark"),
        }
    }
}

/// Error type for ADF operations
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AdfError {
    /// A required field was absent (or explicitly `null`).
    #[error("field {field:?} is required for {type_name} (at {})", display_path(.path))]
    MissingRequiredField {
        type_name: &'static str,
        field: &'static str,
        path: String,
    },

    /// A `type` tag outside the closed node or mark set.
    #[error("unknown {kind} type {tag:?} (at {})", display_path(.path))]
    UnknownDiscriminator {
        kind: Discriminator,
        tag: String,
        path: String,
    },

    /// A field was present but carried the wrong JSON type.
    #[error(
        "field {field:?} of {type_name} must be {expected}, found {found} (at {})",
        display_path(.path)
    )]
    InvalidFieldType {
        type_name: &'static str,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
        path: String,
    },

    /// A node or mark position held something other than a JSON object.
    #[error("expected an object, found {found} (at {})", display_path(.path))]
    ExpectedObject { path: String, found: &'static str },

    /// A field was present but semantically unusable; detected at render time.
    #[error("malformed {field} {value:?} in {type_name}: {reason}")]
    MalformedValue {
        type_name: &'static str,
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The node decoded fine but has no Markdown rendering.
    #[error("rendering is not implemented for {type_name}: {reason}")]
    UnimplementedRendering {
        type_name: &'static str,
        reason: String,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdfError {
    /// Structural decode errors that permissive mode may skip over.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AdfError::MissingRequiredField { .. }
                | AdfError::UnknownDiscriminator { .. }
                | AdfError::InvalidFieldType { .. }
                | AdfError::ExpectedObject { .. }
        )
    }

    /// JSON pointer of the offending value, for decode errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            AdfError::MissingRequiredField { path, .. }
            | AdfError::UnknownDiscriminator { path, .. }
            | AdfError::InvalidFieldType { path, .. }
            | AdfError::ExpectedObject { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdfError>;

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

/// Short JSON type name used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
