//! Decode raw JSON trees into typed [`Node`]s.
//!
//! Dispatch happens on the `type` tag of every object, recursing depth-first
//! through `content` and `marks`. The caller's value is never modified.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{json_kind, AdfError, Discriminator, Result};
use crate::field::{Field, RecordReader};
use crate::model::{Mark, MarkKind, Node, NodeKind};

/// Options for decoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Drop child nodes and marks that fail to decode instead of aborting.
    ///
    /// Only structural errors (see [`AdfError::is_recoverable`]) are skipped.
    /// The root itself must still decode.
    pub permissive: bool,
}

/// Recursive decoder from `serde_json::Value` to the typed tree
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    /// Create a strict decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder that skips undecodable subtrees
    pub fn permissive() -> Self {
        Self::with_options(DecodeOptions { permissive: true })
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode a node object.
    pub fn decode_node(&self, raw: &Value) -> Result<Node> {
        self.node_at(raw, "")
    }

    /// Decode a mark object.
    pub fn decode_mark(&self, raw: &Value) -> Result<Mark> {
        self.mark_at(raw, "")
    }

    /// Decode from a raw map, an already typed value, or nothing.
    ///
    /// Typed input is returned unchanged and JSON `null` yields `None`, so
    /// callers can funnel mixed input through one entry point.
    pub fn decode_any<T, S: Decodable<T>>(&self, source: S) -> Result<Option<T>> {
        source.decode_with(self)
    }

    pub(crate) fn node_at(&self, raw: &Value, path: &str) -> Result<Node> {
        let map = object_at(raw, path)?;
        let tag = tag_at(map, "node", path)?;
        let kind = NodeKind::from_tag(tag).ok_or_else(|| AdfError::UnknownDiscriminator {
            kind: Discriminator::Node,
            tag: tag.to_string(),
            path: path.to_string(),
        })?;
        let r = RecordReader::new(kind.tag(), kind.fields(), map, path);

        let node = match kind {
            NodeKind::Doc => Node::Doc {
                content: self.required_nodes(&r)?,
                version: r.defaulted("version", || 1)?,
            },
            NodeKind::Paragraph => Node::Paragraph {
                content: self.optional_nodes(&r)?,
                attrs: r.optional("attrs")?,
            },
            NodeKind::Text => Node::Text {
                marks: self.optional_marks(&r)?,
                text: r.required("text")?,
            },
            NodeKind::Heading => Node::Heading {
                content: self.required_nodes(&r)?,
                attrs: r.required("attrs")?,
            },
            NodeKind::Blockquote => Node::Blockquote {
                content: self.optional_nodes(&r)?,
            },
            NodeKind::BulletList => Node::BulletList {
                content: self.required_nodes(&r)?,
            },
            NodeKind::OrderedList => Node::OrderedList {
                content: self.required_nodes(&r)?,
                attrs: r.optional("attrs")?,
            },
            NodeKind::ListItem => Node::ListItem {
                content: self.required_nodes(&r)?,
            },
            NodeKind::CodeBlock => Node::CodeBlock {
                content: self.optional_nodes(&r)?,
                attrs: r.optional("attrs")?,
            },
            NodeKind::Panel => Node::Panel {
                content: self.required_nodes(&r)?,
                attrs: r.required("attrs")?,
            },
            NodeKind::Table => Node::Table {
                content: self.required_nodes(&r)?,
                attrs: r.optional("attrs")?,
            },
            NodeKind::TableRow => Node::TableRow {
                content: self.required_nodes(&r)?,
            },
            NodeKind::TableCell => Node::TableCell {
                content: self.required_nodes(&r)?,
                attrs: r.optional("attrs")?,
            },
            NodeKind::TableHeader => Node::TableHeader {
                content: self.required_nodes(&r)?,
                attrs: r.optional("attrs")?,
            },
            NodeKind::TaskList => Node::TaskList {
                content: self.required_nodes(&r)?,
                attrs: r.required("attrs")?,
            },
            NodeKind::TaskItem => Node::TaskItem {
                content: self.optional_nodes(&r)?,
                attrs: r.required("attrs")?,
            },
            NodeKind::Media => Node::Media {
                marks: self.optional_marks(&r)?,
                attrs: r.required("attrs")?,
            },
            NodeKind::MediaGroup => Node::MediaGroup {
                content: self.required_nodes(&r)?,
            },
            NodeKind::MediaSingle => Node::MediaSingle {
                content: self.required_nodes(&r)?,
                attrs: r.required("attrs")?,
            },
            NodeKind::Mention => Node::Mention {
                attrs: r.required("attrs")?,
            },
            NodeKind::Emoji => Node::Emoji {
                attrs: r.required("attrs")?,
            },
            NodeKind::Date => Node::Date {
                attrs: r.required("attrs")?,
            },
            NodeKind::Rule => Node::Rule,
            NodeKind::HardBreak => Node::HardBreak,
            NodeKind::Expand => Node::Expand {
                content: self.required_nodes(&r)?,
                marks: self.optional_marks(&r)?,
                attrs: r.required("attrs")?,
            },
            NodeKind::NestedExpand => Node::NestedExpand {
                content: self.required_nodes(&r)?,
                attrs: r.optional("attrs")?,
            },
            NodeKind::InlineCard => Node::InlineCard {
                attrs: r.required("attrs")?,
            },
            NodeKind::BlockCard => Node::BlockCard {
                attrs: r.required("attrs")?,
            },
            NodeKind::Status => Node::Status {
                attrs: r.required("attrs")?,
            },
        };

        Ok(node)
    }

    pub(crate) fn mark_at(&self, raw: &Value, path: &str) -> Result<Mark> {
        let map = object_at(raw, path)?;
        let tag = tag_at(map, "mark", path)?;
        let kind = MarkKind::from_tag(tag).ok_or_else(|| AdfError::UnknownDiscriminator {
            kind: Discriminator::Mark,
            tag: tag.to_string(),
            path: path.to_string(),
        })?;
        let r = RecordReader::new(kind.tag(), kind.fields(), map, path);

        let mark = match kind {
            MarkKind::Strong => Mark::Strong,
            MarkKind::Em => Mark::Em,
            MarkKind::Strike => Mark::Strike,
            MarkKind::Code => Mark::Code,
            MarkKind::Underline => Mark::Underline,
            MarkKind::Link => Mark::Link {
                attrs: r.required("attrs")?,
            },
            MarkKind::TextColor => Mark::TextColor {
                attrs: r.optional("attrs")?,
            },
            MarkKind::BackgroundColor => Mark::BackgroundColor {
                attrs: r.optional("attrs")?,
            },
            MarkKind::SubSup => Mark::SubSup {
                attrs: r.optional("attrs")?,
            },
        };

        Ok(mark)
    }

    fn required_nodes(&self, r: &RecordReader<'_>) -> Result<Vec<Node>> {
        match self.optional_nodes(r)? {
            Field::Present(nodes) => Ok(nodes),
            Field::Absent | Field::Null => Err(r.missing("content")),
        }
    }

    fn optional_nodes(&self, r: &RecordReader<'_>) -> Result<Field<Vec<Node>>> {
        self.list(r, "content", |raw, path| self.node_at(raw, path))
    }

    fn optional_marks(&self, r: &RecordReader<'_>) -> Result<Field<Vec<Mark>>> {
        self.list(r, "marks", |raw, path| self.mark_at(raw, path))
    }

    fn list<T>(
        &self,
        r: &RecordReader<'_>,
        name: &'static str,
        decode_item: impl Fn(&Value, &str) -> Result<T>,
    ) -> Result<Field<Vec<T>>> {
        let items = match r.raw(name) {
            None => return Ok(Field::Absent),
            Some(Value::Null) => return Ok(Field::Null),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(AdfError::InvalidFieldType {
                    type_name: r.type_name(),
                    field: name,
                    expected: "an array",
                    found: json_kind(other),
                    path: r.child_path(name),
                })
            }
        };

        let base = r.child_path(name);
        let mut decoded = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("{base}/{i}");
            match decode_item(item, &path) {
                Ok(value) => decoded.push(value),
                Err(e) if self.options.permissive && e.is_recoverable() => {
                    tracing::warn!(path = %path, error = %e, "Skipping undecodable subtree");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Field::Present(decoded))
    }
}

fn object_at<'a>(raw: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    raw.as_object().ok_or_else(|| AdfError::ExpectedObject {
        path: path.to_string(),
        found: json_kind(raw),
    })
}

fn tag_at<'a>(map: &'a Map<String, Value>, type_name: &'static str, path: &str) -> Result<&'a str> {
    match map.get("type") {
        Some(Value::String(tag)) => Ok(tag.as_str()),
        None | Some(Value::Null) => Err(AdfError::MissingRequiredField {
            type_name,
            field: "type",
            path: path.to_string(),
        }),
        Some(other) => Err(AdfError::InvalidFieldType {
            type_name,
            field: "type",
            expected: "a string",
            found: json_kind(other),
            path: format!("{path}/type"),
        }),
    }
}

/// Decode a node strictly.
pub fn decode(raw: &Value) -> Result<Node> {
    Decoder::new().decode_node(raw)
}

/// Input accepted by [`Decoder::decode_any`].
pub trait Decodable<T> {
    fn decode_with(self, decoder: &Decoder) -> Result<Option<T>>;
}

impl Decodable<Node> for &Value {
    fn decode_with(self, decoder: &Decoder) -> Result<Option<Node>> {
        match self {
            Value::Null => Ok(None),
            raw => decoder.decode_node(raw).map(Some),
        }
    }
}

impl Decodable<Mark> for &Value {
    fn decode_with(self, decoder: &Decoder) -> Result<Option<Mark>> {
        match self {
            Value::Null => Ok(None),
            raw => decoder.decode_mark(raw).map(Some),
        }
    }
}

impl Decodable<Node> for Node {
    fn decode_with(self, _decoder: &Decoder) -> Result<Option<Node>> {
        Ok(Some(self))
    }
}

impl Decodable<Mark> for Mark {
    fn decode_with(self, _decoder: &Decoder) -> Result<Option<Mark>> {
        Ok(Some(self))
    }
}

impl<T, S: Decodable<T>> Decodable<T> for Option<S> {
    fn decode_with(self, decoder: &Decoder) -> Result<Option<T>> {
        match self {
            Some(source) => source.decode_with(decoder),
            None => Ok(None),
        }
    }
}

impl TryFrom<&Value> for Node {
    type Error = AdfError;

    fn try_from(raw: &Value) -> Result<Self> {
        decode(raw)
    }
}

impl TryFrom<&Value> for Mark {
    type Error = AdfError;

    fn try_from(raw: &Value) -> Result<Self> {
        Decoder::new().decode_mark(raw)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        decode(&raw).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Mark {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Mark::try_from(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinkAttrs, SubSupAttrs};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_plain_text() {
        let node = decode(&json!({"type": "text", "text": "Hello world"})).unwrap();
        assert_eq!(node, Node::text("Hello world"));
    }

    #[test]
    fn test_text_requires_text() {
        let err = decode(&json!({"type": "text"})).unwrap_err();
        assert!(matches!(
            err,
            AdfError::MissingRequiredField {
                type_name: "text",
                field: "text",
                ..
            }
        ));

        let err = Decoder::permissive()
            .decode_node(&json!({"type": "text"}))
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_marks_keep_order() {
        let node = decode(&json!({
            "type": "text",
            "text": "x",
            "marks": [
                {"type": "code"},
                {"type": "link", "attrs": {"href": "http://example.com"}},
                {"type": "subsup"}
            ]
        }))
        .unwrap();

        assert_eq!(
            node.marks(),
            &[
                Mark::Code,
                Mark::Link {
                    attrs: LinkAttrs::new("http://example.com")
                },
                Mark::SubSup {
                    attrs: Field::Absent
                },
            ]
        );
    }

    #[test]
    fn test_subsup_attrs_default() {
        let mark = Decoder::new()
            .decode_mark(&json!({"type": "subsup", "attrs": {}}))
            .unwrap();
        assert_eq!(
            mark,
            Mark::SubSup {
                attrs: Field::Present(SubSupAttrs::default())
            }
        );
    }

    #[test]
    fn test_unknown_node_reports_path() {
        let raw = json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "ok"}]},
                {"type": "paragraph", "content": [{"type": "bogusNode"}]}
            ]
        });
        let err = decode(&raw).unwrap_err();
        match err {
            AdfError::UnknownDiscriminator { kind, tag, path } => {
                assert_eq!(kind, Discriminator::Node);
                assert_eq!(tag, "bogusNode");
                assert_eq!(path, "/content/1/content/0");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_mark_is_rejected() {
        let err = decode(&json!({"type": "text", "text": "x", "marks": [{"type": "blink"}]})).unwrap_err();
        assert!(matches!(
            err,
            AdfError::UnknownDiscriminator {
                kind: Discriminator::Mark,
                ..
            }
        ));
    }

    #[test]
    fn test_permissive_skips_bad_siblings() {
        let raw = json!({
            "type": "doc",
            "content": [
                {"type": "bogusNode"},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "kept", "marks": [{"type": "blink"}, {"type": "em"}]},
                    {"type": "mention", "attrs": {}}
                ]},
                "not a node"
            ]
        });
        let node = Decoder::permissive().decode_node(&raw).unwrap();
        assert_eq!(
            node,
            Node::doc(vec![Node::paragraph(vec![Node::text_with_marks(
                "kept",
                vec![Mark::Em]
            )])])
        );
    }

    #[test]
    fn test_root_unknown_tag_fails_even_when_permissive() {
        let err = Decoder::permissive()
            .decode_node(&json!({"type": "bogusNode"}))
            .unwrap_err();
        assert!(matches!(err, AdfError::UnknownDiscriminator { .. }));
    }

    #[test]
    fn test_doc_defaults_version() {
        let node = decode(&json!({"type": "doc", "content": []})).unwrap();
        assert_eq!(node, Node::doc(vec![]));

        let err = decode(&json!({"type": "doc", "version": 1})).unwrap_err();
        assert!(matches!(
            err,
            AdfError::MissingRequiredField {
                type_name: "doc",
                field: "content",
                ..
            }
        ));
    }

    #[test]
    fn test_content_must_be_array() {
        let err = decode(&json!({"type": "bulletList", "content": {"type": "listItem"}})).unwrap_err();
        assert!(matches!(
            err,
            AdfError::InvalidFieldType {
                field: "content",
                expected: "an array",
                found: "object",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_type_tag() {
        let err = decode(&json!({"text": "x"})).unwrap_err();
        assert!(matches!(
            err,
            AdfError::MissingRequiredField {
                type_name: "node",
                field: "type",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_any_accepts_typed_and_null() {
        let decoder = Decoder::new();
        let node = Node::text("typed");

        let same: Option<Node> = decoder.decode_any(node.clone()).unwrap();
        assert_eq!(same, Some(node));

        let none: Option<Node> = decoder.decode_any(&Value::Null).unwrap();
        assert_eq!(none, None);

        let nothing: Option<Mark> = decoder.decode_any(None::<Mark>).unwrap();
        assert_eq!(nothing, None);

        let raw = json!({"type": "strong"});
        let mark: Option<Mark> = decoder.decode_any(&raw).unwrap();
        assert_eq!(mark, Some(Mark::Strong));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = json!({
            "type": "paragraph",
            "content": [{"type": "text", "text": "a", "marks": [{"type": "em"}]}]
        });
        let before = raw.clone();
        decode(&raw).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn test_serde_deserialize() {
        let node: Node = serde_json::from_str(r#"{"type":"rule"}"#).unwrap();
        assert_eq!(node, Node::Rule);

        let err = serde_json::from_str::<Node>(r#"{"type":"bogusNode"}"#).unwrap_err();
        assert!(err.to_string().contains("bogusNode"));
    }
}
