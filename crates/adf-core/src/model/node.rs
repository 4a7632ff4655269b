//! ADF node tree
//!
//! [`Node`] is a closed sum type over every node tag the converter
//! understands. Each variant owns its attribute record, its marks and its
//! children outright; the tree has no sharing and no back references.

use std::fmt;
use std::str::FromStr;

use super::attrs::*;
use super::mark::Mark;
use crate::field::{Field, FieldSpec};

/// The closed set of node tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Doc,
    Paragraph,
    Text,
    Heading,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    Panel,
    Table,
    TableRow,
    TableCell,
    TableHeader,
    TaskList,
    TaskItem,
    Media,
    MediaGroup,
    MediaSingle,
    Mention,
    Emoji,
    Date,
    Rule,
    HardBreak,
    Expand,
    NestedExpand,
    InlineCard,
    BlockCard,
    Status,
}

impl NodeKind {
    pub const ALL: [NodeKind; 29] = [
        NodeKind::Doc,
        NodeKind::Paragraph,
        NodeKind::Text,
        NodeKind::Heading,
        NodeKind::Blockquote,
        NodeKind::BulletList,
        NodeKind::OrderedList,
        NodeKind::ListItem,
        NodeKind::CodeBlock,
        NodeKind::Panel,
        NodeKind::Table,
        NodeKind::TableRow,
        NodeKind::TableCell,
        NodeKind::TableHeader,
        NodeKind::TaskList,
        NodeKind::TaskItem,
        NodeKind::Media,
        NodeKind::MediaGroup,
        NodeKind::MediaSingle,
        NodeKind::Mention,
        NodeKind::Emoji,
        NodeKind::Date,
        NodeKind::Rule,
        NodeKind::HardBreak,
        NodeKind::Expand,
        NodeKind::NestedExpand,
        NodeKind::InlineCard,
        NodeKind::BlockCard,
        NodeKind::Status,
    ];

    /// Wire value of the `type` field.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Text => "text",
            NodeKind::Heading => "heading",
            NodeKind::Blockquote => "blockquote",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::Panel => "panel",
            NodeKind::Table => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableCell => "tableCell",
            NodeKind::TableHeader => "tableHeader",
            NodeKind::TaskList => "taskList",
            NodeKind::TaskItem => "taskItem",
            NodeKind::Media => "media",
            NodeKind::MediaGroup => "mediaGroup",
            NodeKind::MediaSingle => "mediaSingle",
            NodeKind::Mention => "mention",
            NodeKind::Emoji => "emoji",
            NodeKind::Date => "date",
            NodeKind::Rule => "rule",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::Expand => "expand",
            NodeKind::NestedExpand => "nestedExpand",
            NodeKind::InlineCard => "inlineCard",
            NodeKind::BlockCard => "blockCard",
            NodeKind::Status => "status",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Declared top-level fields besides `type`.
    pub fn fields(self) -> &'static [FieldSpec] {
        use FieldSpec as F;
        const LEAF: &[FieldSpec] = &[];
        const DOC: &[FieldSpec] = &[F::defaulted("version"), F::required("content")];
        const TEXT: &[FieldSpec] = &[F::required("text"), F::optional("marks")];
        const CONTENT: &[FieldSpec] = &[F::required("content")];
        const OPTIONAL_CONTENT: &[FieldSpec] = &[F::optional("content")];
        const ATTRS: &[FieldSpec] = &[F::required("attrs")];
        const ATTRS_CONTENT: &[FieldSpec] = &[F::required("attrs"), F::required("content")];
        const ATTRS_OPTIONAL_CONTENT: &[FieldSpec] =
            &[F::required("attrs"), F::optional("content")];
        const OPTIONAL_ATTRS_CONTENT: &[FieldSpec] =
            &[F::optional("attrs"), F::required("content")];
        const OPTIONAL_ATTRS_OPTIONAL_CONTENT: &[FieldSpec] =
            &[F::optional("attrs"), F::optional("content")];
        const MEDIA: &[FieldSpec] = &[F::required("attrs"), F::optional("marks")];
        const EXPAND: &[FieldSpec] = &[
            F::required("attrs"),
            F::required("content"),
            F::optional("marks"),
        ];

        match self {
            NodeKind::Doc => DOC,
            NodeKind::Paragraph | NodeKind::CodeBlock => OPTIONAL_ATTRS_OPTIONAL_CONTENT,
            NodeKind::Text => TEXT,
            NodeKind::Heading
            | NodeKind::Panel
            | NodeKind::TaskList
            | NodeKind::MediaSingle => ATTRS_CONTENT,
            NodeKind::Blockquote => OPTIONAL_CONTENT,
            NodeKind::BulletList
            | NodeKind::ListItem
            | NodeKind::TableRow
            | NodeKind::MediaGroup => CONTENT,
            NodeKind::OrderedList
            | NodeKind::Table
            | NodeKind::TableCell
            | NodeKind::TableHeader
            | NodeKind::NestedExpand => OPTIONAL_ATTRS_CONTENT,
            NodeKind::TaskItem => ATTRS_OPTIONAL_CONTENT,
            NodeKind::Media => MEDIA,
            NodeKind::Mention
            | NodeKind::Emoji
            | NodeKind::Date
            | NodeKind::InlineCard
            | NodeKind::BlockCard
            | NodeKind::Status => ATTRS,
            NodeKind::Rule | NodeKind::HardBreak => LEAF,
            NodeKind::Expand => EXPAND,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown node type {s:?}"))
    }
}

/// An ADF node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Document root
    Doc { version: i64, content: Vec<Node> },

    Paragraph {
        attrs: Field<ParagraphAttrs>,
        content: Field<Vec<Node>>,
    },

    /// Inline text run; marks apply left to right
    Text { text: String, marks: Field<Vec<Mark>> },

    Heading {
        attrs: HeadingAttrs,
        content: Vec<Node>,
    },

    Blockquote { content: Field<Vec<Node>> },

    BulletList { content: Vec<Node> },

    OrderedList {
        attrs: Field<OrderedListAttrs>,
        content: Vec<Node>,
    },

    ListItem { content: Vec<Node> },

    CodeBlock {
        attrs: Field<CodeBlockAttrs>,
        content: Field<Vec<Node>>,
    },

    Panel {
        attrs: PanelAttrs,
        content: Vec<Node>,
    },

    Table {
        attrs: Field<TableAttrs>,
        content: Vec<Node>,
    },

    TableRow { content: Vec<Node> },

    TableCell {
        attrs: Field<TableCellAttrs>,
        content: Vec<Node>,
    },

    TableHeader {
        attrs: Field<TableCellAttrs>,
        content: Vec<Node>,
    },

    TaskList {
        attrs: TaskListAttrs,
        content: Vec<Node>,
    },

    TaskItem {
        attrs: TaskItemAttrs,
        content: Field<Vec<Node>>,
    },

    Media {
        attrs: MediaAttrs,
        marks: Field<Vec<Mark>>,
    },

    MediaGroup { content: Vec<Node> },

    MediaSingle {
        attrs: MediaSingleAttrs,
        content: Vec<Node>,
    },

    Mention { attrs: MentionAttrs },

    Emoji { attrs: EmojiAttrs },

    Date { attrs: DateAttrs },

    /// Horizontal rule
    Rule,

    HardBreak,

    Expand {
        attrs: ExpandAttrs,
        content: Vec<Node>,
        marks: Field<Vec<Mark>>,
    },

    NestedExpand {
        attrs: Field<ExpandAttrs>,
        content: Vec<Node>,
    },

    InlineCard { attrs: CardAttrs },

    BlockCard { attrs: CardAttrs },

    Status { attrs: StatusAttrs },
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Doc { .. } => NodeKind::Doc,
            Node::Paragraph { .. } => NodeKind::Paragraph,
            Node::Text { .. } => NodeKind::Text,
            Node::Heading { .. } => NodeKind::Heading,
            Node::Blockquote { .. } => NodeKind::Blockquote,
            Node::BulletList { .. } => NodeKind::BulletList,
            Node::OrderedList { .. } => NodeKind::OrderedList,
            Node::ListItem { .. } => NodeKind::ListItem,
            Node::CodeBlock { .. } => NodeKind::CodeBlock,
            Node::Panel { .. } => NodeKind::Panel,
            Node::Table { .. } => NodeKind::Table,
            Node::TableRow { .. } => NodeKind::TableRow,
            Node::TableCell { .. } => NodeKind::TableCell,
            Node::TableHeader { .. } => NodeKind::TableHeader,
            Node::TaskList { .. } => NodeKind::TaskList,
            Node::TaskItem { .. } => NodeKind::TaskItem,
            Node::Media { .. } => NodeKind::Media,
            Node::MediaGroup { .. } => NodeKind::MediaGroup,
            Node::MediaSingle { .. } => NodeKind::MediaSingle,
            Node::Mention { .. } => NodeKind::Mention,
            Node::Emoji { .. } => NodeKind::Emoji,
            Node::Date { .. } => NodeKind::Date,
            Node::Rule => NodeKind::Rule,
            Node::HardBreak => NodeKind::HardBreak,
            Node::Expand { .. } => NodeKind::Expand,
            Node::NestedExpand { .. } => NodeKind::NestedExpand,
            Node::InlineCard { .. } => NodeKind::InlineCard,
            Node::BlockCard { .. } => NodeKind::BlockCard,
            Node::Status { .. } => NodeKind::Status,
        }
    }

    /// Child nodes; empty for leaves and for absent optional content.
    pub fn content(&self) -> &[Node] {
        match self {
            Node::Doc { content, .. }
            | Node::Heading { content, .. }
            | Node::BulletList { content }
            | Node::OrderedList { content, .. }
            | Node::ListItem { content }
            | Node::Panel { content, .. }
            | Node::Table { content, .. }
            | Node::TableRow { content }
            | Node::TableCell { content, .. }
            | Node::TableHeader { content, .. }
            | Node::TaskList { content, .. }
            | Node::MediaGroup { content }
            | Node::MediaSingle { content, .. }
            | Node::Expand { content, .. }
            | Node::NestedExpand { content, .. } => content,
            Node::Paragraph { content, .. }
            | Node::Blockquote { content }
            | Node::CodeBlock { content, .. }
            | Node::TaskItem { content, .. } => content.get().map(Vec::as_slice).unwrap_or(&[]),
            Node::Text { .. }
            | Node::Media { .. }
            | Node::Mention { .. }
            | Node::Emoji { .. }
            | Node::Date { .. }
            | Node::Rule
            | Node::HardBreak
            | Node::InlineCard { .. }
            | Node::BlockCard { .. }
            | Node::Status { .. } => &[],
        }
    }

    /// Marks in application order; empty when the node carries none.
    pub fn marks(&self) -> &[Mark] {
        match self {
            Node::Text { marks, .. } | Node::Media { marks, .. } | Node::Expand { marks, .. } => {
                marks.get().map(Vec::as_slice).unwrap_or(&[])
            }
            _ => &[],
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.content().iter().map(Node::node_count).sum::<usize>()
    }

    /// Document root with the current format version.
    pub fn doc(content: Vec<Node>) -> Self {
        Node::Doc {
            version: 1,
            content,
        }
    }

    pub fn paragraph(content: Vec<Node>) -> Self {
        Node::Paragraph {
            attrs: Field::Absent,
            content: Field::Present(content),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            marks: Field::Absent,
        }
    }

    pub fn text_with_marks(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Node::Text {
            text: text.into(),
            marks: Field::Present(marks),
        }
    }

    pub fn heading(level: i64, content: Vec<Node>) -> Self {
        Node::Heading {
            attrs: HeadingAttrs::new(level),
            content,
        }
    }

    pub fn bullet_list(content: Vec<Node>) -> Self {
        Node::BulletList { content }
    }

    pub fn ordered_list(order: Option<i64>, content: Vec<Node>) -> Self {
        Node::OrderedList {
            attrs: match order {
                Some(order) => Field::Present(OrderedListAttrs {
                    order: Field::Present(order),
                }),
                None => Field::Absent,
            },
            content,
        }
    }

    pub fn list_item(content: Vec<Node>) -> Self {
        Node::ListItem { content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.tag().parse::<NodeKind>(), Ok(kind));
        }
        assert_eq!(NodeKind::from_tag("bogusNode"), None);
    }

    #[test]
    fn test_content_and_marks_accessors() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("Hello "),
            Node::text_with_marks("world", vec![Mark::Strong]),
        ])]);

        assert_eq!(doc.kind(), NodeKind::Doc);
        assert_eq!(doc.content().len(), 1);
        assert_eq!(doc.content()[0].content()[1].marks(), &[Mark::Strong]);
        assert_eq!(doc.node_count(), 4);
        assert!(Node::Rule.content().is_empty());
    }
}
