//! Serialize typed nodes and marks back to wire maps.
//!
//! `type` is always written first, followed by the declared fields in
//! declaration order. Absent optional fields are omitted; explicit nulls are
//! kept.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::decode::Decoder;
use crate::error::Result;
use crate::field::{FieldAt, FieldValue, RecordWriter};
use crate::model::{Mark, Node};

impl Node {
    /// Wire map for this subtree.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut w = RecordWriter::new();
        w.put_raw("type", Value::from(self.kind().tag()));

        match self {
            Node::Doc { version, content } => {
                w.put("version", version);
                w.put("content", content);
            }
            Node::Paragraph { attrs, content } => {
                w.put_field("attrs", attrs);
                w.put_field("content", content);
            }
            Node::Text { text, marks } => {
                w.put("text", text);
                w.put_field("marks", marks);
            }
            Node::Heading { attrs, content } => {
                w.put("attrs", attrs);
                w.put("content", content);
            }
            Node::Blockquote { content } => w.put_field("content", content),
            Node::BulletList { content }
            | Node::ListItem { content }
            | Node::TableRow { content }
            | Node::MediaGroup { content } => w.put("content", content),
            Node::OrderedList { attrs, content } => {
                w.put_field("attrs", attrs);
                w.put("content", content);
            }
            Node::CodeBlock { attrs, content } => {
                w.put_field("attrs", attrs);
                w.put_field("content", content);
            }
            Node::Panel { attrs, content } => {
                w.put("attrs", attrs);
                w.put("content", content);
            }
            Node::Table { attrs, content } => {
                w.put_field("attrs", attrs);
                w.put("content", content);
            }
            Node::TableCell { attrs, content } | Node::TableHeader { attrs, content } => {
                w.put_field("attrs", attrs);
                w.put("content", content);
            }
            Node::TaskList { attrs, content } => {
                w.put("attrs", attrs);
                w.put("content", content);
            }
            Node::TaskItem { attrs, content } => {
                w.put("attrs", attrs);
                w.put_field("content", content);
            }
            Node::Media { attrs, marks } => {
                w.put("attrs", attrs);
                w.put_field("marks", marks);
            }
            Node::MediaSingle { attrs, content } => {
                w.put("attrs", attrs);
                w.put("content", content);
            }
            Node::Mention { attrs } => w.put("attrs", attrs),
            Node::Emoji { attrs } => w.put("attrs", attrs),
            Node::Date { attrs } => w.put("attrs", attrs),
            Node::Rule | Node::HardBreak => {}
            Node::Expand {
                attrs,
                content,
                marks,
            } => {
                w.put("attrs", attrs);
                w.put("content", content);
                w.put_field("marks", marks);
            }
            Node::NestedExpand { attrs, content } => {
                w.put_field("attrs", attrs);
                w.put("content", content);
            }
            Node::InlineCard { attrs } | Node::BlockCard { attrs } => w.put("attrs", attrs),
            Node::Status { attrs } => w.put("attrs", attrs),
        }

        w.finish()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

impl Mark {
    /// Wire map for this mark.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut w = RecordWriter::new();
        w.put_raw("type", Value::from(self.kind().tag()));

        match self {
            Mark::Strong | Mark::Em | Mark::Strike | Mark::Code | Mark::Underline => {}
            Mark::Link { attrs } => w.put("attrs", attrs),
            Mark::TextColor { attrs } | Mark::BackgroundColor { attrs } => {
                w.put_field("attrs", attrs)
            }
            Mark::SubSup { attrs } => w.put_field("attrs", attrs),
        }

        w.finish()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

/// Nodes nested in record fields always decode strictly; use
/// [`Decoder::permissive`] on the enclosing tree to skip bad children.
impl FieldValue for Node {
    fn decode_value(value: &Value, at: &FieldAt<'_>) -> Result<Self> {
        Decoder::new().node_at(value, at.path)
    }

    fn encode_value(&self) -> Value {
        self.to_value()
    }
}

/// Strict, like the [`Node`] impl.
impl FieldValue for Mark {
    fn decode_value(value: &Value, at: &FieldAt<'_>) -> Result<Self> {
        Decoder::new().mark_at(value, at.path)
    }

    fn encode_value(&self) -> Value {
        self.to_value()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl Serialize for Mark {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::error::AdfError;
    use crate::field::Field;
    use crate::model::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn check_round_trip(raw: Value) -> Node {
        let node = decode(&raw).unwrap();
        assert_eq!(node.to_value(), raw);
        assert_eq!(decode(&node.to_value()).unwrap(), node);
        node
    }

    fn collect_kinds(node: &Node, nodes: &mut Vec<NodeKind>, marks: &mut Vec<MarkKind>) {
        nodes.push(node.kind());
        marks.extend(node.marks().iter().map(Mark::kind));
        for child in node.content() {
            collect_kinds(child, nodes, marks);
        }
    }

    #[test]
    fn test_type_is_written_first() {
        let map = Node::text_with_marks("x", vec![Mark::Strong]).to_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["type", "text", "marks"]);
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let map = Node::text("plain").to_map();
        assert!(!map.contains_key("marks"));

        let null_marks = Node::Text {
            text: "x".to_string(),
            marks: Field::Null,
        };
        assert_eq!(null_marks.to_value(), json!({"type": "text", "text": "x", "marks": null}));
    }

    #[test]
    fn test_defaults_are_materialized() {
        let node = decode(&json!({"type": "status", "attrs": {"text": "DONE"}})).unwrap();
        assert_eq!(
            node.to_value(),
            json!({"type": "status", "attrs": {"text": "DONE", "color": "neutral"}})
        );

        let doc = decode(&json!({"type": "doc", "content": []})).unwrap();
        assert_eq!(doc.to_value(), json!({"type": "doc", "version": 1, "content": []}));
    }

    #[test]
    fn test_document_round_trip() {
        let doc = check_round_trip(json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Title"}]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "see ", "marks": [{"type": "em"}]},
                    {"type": "text", "text": "here", "marks": [{"type": "link", "attrs": {"href": "http://example.com", "title": null}}]},
                    {"type": "hardBreak"},
                    {"type": "mention", "attrs": {"id": "abc", "text": "@Alice"}},
                    {"type": "emoji", "attrs": {"shortName": ":smile:"}},
                    {"type": "date", "attrs": {"timestamp": "1704067200000"}},
                    {"type": "inlineCard", "attrs": {"url": "http://example.com"}}
                ]},
                {"type": "orderedList", "attrs": {"order": 3}, "content": [
                    {"type": "listItem", "content": [{"type": "paragraph", "content": []}]}
                ]},
                {"type": "codeBlock", "attrs": {"language": "rust"}, "content": [{"type": "text", "text": "fn main() {}"}]},
                {"type": "panel", "attrs": {"panelType": "info"}, "content": [{"type": "paragraph"}]},
                {"type": "table", "attrs": {"layout": "default", "width": 760.5}, "content": [
                    {"type": "tableRow", "content": [
                        {"type": "tableHeader", "attrs": {"colspan": 2, "colwidth": [100, 120.5]}, "content": []}
                    ]},
                    {"type": "tableRow", "content": [
                        {"type": "tableCell", "attrs": {"rowspan": 1, "background": "#ffffff"}, "content": [{"type": "paragraph"}]},
                        {"type": "tableCell", "content": []}
                    ]}
                ]},
                {"type": "taskList", "attrs": {"localId": "l1"}, "content": [
                    {"type": "taskItem", "attrs": {"localId": "t1", "state": "DONE"}}
                ]},
                {"type": "mediaSingle", "attrs": {"layout": "center"}, "content": [
                    {"type": "media", "attrs": {"type": "external", "url": "http://img"}, "marks": [{"type": "link", "attrs": {"href": "http://x"}}]}
                ]},
                {"type": "mediaGroup", "content": [
                    {"type": "media", "attrs": {"type": "file", "id": "f1", "collection": "c", "width": 10, "height": 20.5}}
                ]},
                {"type": "expand", "attrs": {"title": "More"}, "content": [
                    {"type": "rule"},
                    {"type": "nestedExpand", "attrs": {"title": "Inner"}, "content": [{"type": "paragraph", "content": []}]}
                ]},
                {"type": "blockquote", "content": [
                    {"type": "bulletList", "content": [
                        {"type": "listItem", "content": [
                            {"type": "paragraph", "content": [
                                {"type": "text", "text": "decorated", "marks": [
                                    {"type": "strong"},
                                    {"type": "strike"},
                                    {"type": "code"},
                                    {"type": "underline"},
                                    {"type": "textColor", "attrs": {"color": "#97a0af"}},
                                    {"type": "backgroundColor", "attrs": {"color": null}},
                                    {"type": "subsup", "attrs": {"type": "sup"}}
                                ]},
                                {"type": "status", "attrs": {"text": "DONE", "color": "green", "localId": "s1"}},
                                {"type": "emoji", "attrs": {"shortName": ":wave:", "id": "1f44b", "text": "👋"}}
                            ]}
                        ]}
                    ]}
                ]},
                {"type": "blockCard", "attrs": {"url": "http://card"}}
            ]
        }));

        let mut nodes = Vec::new();
        let mut marks = Vec::new();
        collect_kinds(&doc, &mut nodes, &mut marks);
        for kind in NodeKind::ALL {
            assert!(nodes.contains(&kind), "fixture is missing node {kind}");
        }
        for kind in MarkKind::ALL {
            assert!(marks.contains(&kind), "fixture is missing mark {kind}");
        }
    }

    #[test]
    fn test_node_field_value_is_strict() {
        let raw = json!([{"type": "rule"}, {"type": "bogusNode"}]);
        let at = FieldAt {
            type_name: "test.holder",
            field: "children",
            path: "/children",
        };
        let err = Vec::<Node>::decode_value(&raw, &at).unwrap_err();
        assert!(matches!(err, AdfError::UnknownDiscriminator { .. }));
        assert_eq!(err.path(), Some("/children/1"));

        let ok = Vec::<Node>::decode_value(&json!([{"type": "rule"}]), &at).unwrap();
        assert_eq!(ok, vec![Node::Rule]);
    }

    #[test]
    fn test_mark_to_map() {
        assert_eq!(Mark::Code.to_value(), json!({"type": "code"}));
        assert_eq!(
            Mark::SubSup {
                attrs: Field::Present(SubSupAttrs::default())
            }
            .to_value(),
            json!({"type": "subsup", "attrs": {"type": "sub"}})
        );
        assert_eq!(
            Mark::TextColor {
                attrs: Field::Null
            }
            .to_value(),
            json!({"type": "textColor", "attrs": null})
        );
    }

    #[test]
    fn test_serde_serialize() {
        let text = serde_json::to_string(&Node::text_with_marks("x", vec![Mark::Strong])).unwrap();
        assert_eq!(text, r#"{"type":"text","text":"x","marks":[{"type":"strong"}]}"#);
    }
}
