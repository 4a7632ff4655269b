//! Attribute records carried by nodes and marks.
//!
//! Field names follow the wire format (`camelCase`); the Rust side uses
//! `snake_case`. Dimensions are kept as [`Number`] so integer and float
//! widths survive a round trip unchanged.

use serde_json::Number;

use crate::error::Result;
use crate::field::{record_field_value, Field, FieldSpec, Record, RecordReader, RecordWriter};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParagraphAttrs {
    pub local_id: Field<String>,
}

impl Record for ParagraphAttrs {
    const TYPE_NAME: &'static str = "paragraph.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::optional("localId")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            local_id: r.optional("localId")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_field("localId", &self.local_id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadingAttrs {
    pub level: i64,
    pub local_id: Field<String>,
}

impl HeadingAttrs {
    pub fn new(level: i64) -> Self {
        Self {
            level,
            local_id: Field::Absent,
        }
    }
}

impl Record for HeadingAttrs {
    const TYPE_NAME: &'static str = "heading.attrs";
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("level"), FieldSpec::optional("localId")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            level: r.required("level")?,
            local_id: r.optional("localId")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("level", &self.level);
        w.put_field("localId", &self.local_id);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedListAttrs {
    /// First item number.
    pub order: Field<i64>,
}

impl Record for OrderedListAttrs {
    const TYPE_NAME: &'static str = "orderedList.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::optional("order")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            order: r.optional("order")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_field("order", &self.order);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeBlockAttrs {
    pub language: Field<String>,
}

impl Record for CodeBlockAttrs {
    const TYPE_NAME: &'static str = "codeBlock.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::optional("language")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            language: r.optional("language")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_field("language", &self.language);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelAttrs {
    /// `info`, `note`, `warning`, `success`, `error`, `tip`, `custom`...
    pub panel_type: String,
}

impl Record for PanelAttrs {
    const TYPE_NAME: &'static str = "panel.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("panelType")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            panel_type: r.required("panelType")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("panelType", &self.panel_type);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableAttrs {
    pub is_number_column_enabled: Field<bool>,
    pub layout: Field<String>,
    pub width: Field<Number>,
    pub display_mode: Field<String>,
    pub local_id: Field<String>,
}

impl Record for TableAttrs {
    const TYPE_NAME: &'static str = "table.attrs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("isNumberColumnEnabled"),
        FieldSpec::optional("layout"),
        FieldSpec::optional("width"),
        FieldSpec::optional("displayMode"),
        FieldSpec::optional("localId"),
    ];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            is_number_column_enabled: r.optional("isNumberColumnEnabled")?,
            layout: r.optional("layout")?,
            width: r.optional("width")?,
            display_mode: r.optional("displayMode")?,
            local_id: r.optional("localId")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_field("isNumberColumnEnabled", &self.is_number_column_enabled);
        w.put_field("layout", &self.layout);
        w.put_field("width", &self.width);
        w.put_field("displayMode", &self.display_mode);
        w.put_field("localId", &self.local_id);
    }
}

/// Shared by `tableCell` and `tableHeader`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCellAttrs {
    pub colspan: Field<i64>,
    pub rowspan: Field<i64>,
    pub colwidth: Field<Vec<Number>>,
    pub background: Field<String>,
}

impl Record for TableCellAttrs {
    const TYPE_NAME: &'static str = "tableCell.attrs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("colspan"),
        FieldSpec::optional("rowspan"),
        FieldSpec::optional("colwidth"),
        FieldSpec::optional("background"),
    ];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            colspan: r.optional("colspan")?,
            rowspan: r.optional("rowspan")?,
            colwidth: r.optional("colwidth")?,
            background: r.optional("background")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_field("colspan", &self.colspan);
        w.put_field("rowspan", &self.rowspan);
        w.put_field("colwidth", &self.colwidth);
        w.put_field("background", &self.background);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskListAttrs {
    pub local_id: String,
}

impl Record for TaskListAttrs {
    const TYPE_NAME: &'static str = "taskList.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("localId")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            local_id: r.required("localId")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("localId", &self.local_id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskItemAttrs {
    pub local_id: String,
    /// `TODO` or `DONE`.
    pub state: String,
}

impl TaskItemAttrs {
    pub fn is_done(&self) -> bool {
        self.state == "DONE"
    }
}

impl Record for TaskItemAttrs {
    const TYPE_NAME: &'static str = "taskItem.attrs";
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("localId"), FieldSpec::required("state")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            local_id: r.required("localId")?,
            state: r.required("state")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("localId", &self.local_id);
        w.put("state", &self.state);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaAttrs {
    pub id: Field<String>,
    /// `file`, `link` or `external`.
    pub media_type: String,
    pub collection: Field<String>,
    pub url: Field<String>,
    pub alt: Field<String>,
    pub width: Field<Number>,
    pub height: Field<Number>,
    pub occurrence_key: Field<String>,
}

impl MediaAttrs {
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            id: Field::Absent,
            media_type: "external".to_string(),
            collection: Field::Absent,
            url: Field::Present(url.into()),
            alt: Field::Absent,
            width: Field::Absent,
            height: Field::Absent,
            occurrence_key: Field::Absent,
        }
    }
}

impl Record for MediaAttrs {
    const TYPE_NAME: &'static str = "media.attrs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("id"),
        FieldSpec::required("type"),
        FieldSpec::optional("collection"),
        FieldSpec::optional("url"),
        FieldSpec::optional("alt"),
        FieldSpec::optional("width"),
        FieldSpec::optional("height"),
        FieldSpec::optional("occurrenceKey"),
    ];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            id: r.optional("id")?,
            media_type: r.required("type")?,
            collection: r.optional("collection")?,
            url: r.optional("url")?,
            alt: r.optional("alt")?,
            width: r.optional("width")?,
            height: r.optional("height")?,
            occurrence_key: r.optional("occurrenceKey")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_field("id", &self.id);
        w.put("type", &self.media_type);
        w.put_field("collection", &self.collection);
        w.put_field("url", &self.url);
        w.put_field("alt", &self.alt);
        w.put_field("width", &self.width);
        w.put_field("height", &self.height);
        w.put_field("occurrenceKey", &self.occurrence_key);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaSingleAttrs {
    pub layout: String,
    pub width: Field<Number>,
    pub width_type: Field<String>,
}

impl Record for MediaSingleAttrs {
    const TYPE_NAME: &'static str = "mediaSingle.attrs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("layout"),
        FieldSpec::optional("width"),
        FieldSpec::optional("widthType"),
    ];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            layout: r.required("layout")?,
            width: r.optional("width")?,
            width_type: r.optional("widthType")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("layout", &self.layout);
        w.put_field("width", &self.width);
        w.put_field("widthType", &self.width_type);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MentionAttrs {
    pub id: String,
    pub text: Field<String>,
    pub user_type: Field<String>,
    pub access_level: Field<String>,
}

impl Record for MentionAttrs {
    const TYPE_NAME: &'static str = "mention.attrs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("id"),
        FieldSpec::optional("text"),
        FieldSpec::optional("userType"),
        FieldSpec::optional("accessLevel"),
    ];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            id: r.required("id")?,
            text: r.optional("text")?,
            user_type: r.optional("userType")?,
            access_level: r.optional("accessLevel")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("id", &self.id);
        w.put_field("text", &self.text);
        w.put_field("userType", &self.user_type);
        w.put_field("accessLevel", &self.access_level);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmojiAttrs {
    pub short_name: String,
    pub id: Field<String>,
    pub text: Field<String>,
}

impl Record for EmojiAttrs {
    const TYPE_NAME: &'static str = "emoji.attrs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("shortName"),
        FieldSpec::optional("id"),
        FieldSpec::optional("text"),
    ];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            short_name: r.required("shortName")?,
            id: r.optional("id")?,
            text: r.optional("text")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("shortName", &self.short_name);
        w.put_field("id", &self.id);
        w.put_field("text", &self.text);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateAttrs {
    /// Milliseconds since the Unix epoch, as a decimal string.
    ///
    /// Only presence is checked on decode; the value is parsed when rendered.
    pub timestamp: String,
}

impl Record for DateAttrs {
    const TYPE_NAME: &'static str = "date.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("timestamp")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            timestamp: r.required("timestamp")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("timestamp", &self.timestamp);
    }
}

/// Shared by `expand` and `nestedExpand`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpandAttrs {
    pub title: Field<String>,
}

impl Record for ExpandAttrs {
    const TYPE_NAME: &'static str = "expand.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::optional("title")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            title: r.optional("title")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_field("title", &self.title);
    }
}

/// Shared by `inlineCard` and `blockCard`.
#[derive(Debug, Clone, PartialEq)]
pub struct CardAttrs {
    pub url: String,
}

impl Record for CardAttrs {
    const TYPE_NAME: &'static str = "card.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("url")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            url: r.required("url")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("url", &self.url);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusAttrs {
    pub text: String,
    pub color: String,
    pub local_id: Field<String>,
    pub style: Field<String>,
}

impl StatusAttrs {
    pub const DEFAULT_COLOR: &'static str = "neutral";
}

impl Record for StatusAttrs {
    const TYPE_NAME: &'static str = "status.attrs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("text"),
        FieldSpec::defaulted("color"),
        FieldSpec::optional("localId"),
        FieldSpec::optional("style"),
    ];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            text: r.required("text")?,
            color: r.defaulted("color", || Self::DEFAULT_COLOR.to_string())?,
            local_id: r.optional("localId")?,
            style: r.optional("style")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("text", &self.text);
        w.put("color", &self.color);
        w.put_field("localId", &self.local_id);
        w.put_field("style", &self.style);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkAttrs {
    pub href: String,
    pub title: Field<String>,
    pub id: Field<String>,
    pub collection: Field<String>,
    pub occurrence_key: Field<String>,
}

impl LinkAttrs {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: Field::Absent,
            id: Field::Absent,
            collection: Field::Absent,
            occurrence_key: Field::Absent,
        }
    }
}

impl Record for LinkAttrs {
    const TYPE_NAME: &'static str = "link.attrs";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("href"),
        FieldSpec::optional("title"),
        FieldSpec::optional("id"),
        FieldSpec::optional("collection"),
        FieldSpec::optional("occurrenceKey"),
    ];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            href: r.required("href")?,
            title: r.optional("title")?,
            id: r.optional("id")?,
            collection: r.optional("collection")?,
            occurrence_key: r.optional("occurrenceKey")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("href", &self.href);
        w.put_field("title", &self.title);
        w.put_field("id", &self.id);
        w.put_field("collection", &self.collection);
        w.put_field("occurrenceKey", &self.occurrence_key);
    }
}

/// Shared by `textColor` and `backgroundColor`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorAttrs {
    /// Hex color such as `#97a0af`.
    pub color: Field<String>,
}

impl Record for ColorAttrs {
    const TYPE_NAME: &'static str = "color.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::optional("color")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            color: r.optional("color")?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put_field("color", &self.color);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubSupAttrs {
    /// `sub` or `sup`.
    pub kind: String,
}

impl Default for SubSupAttrs {
    fn default() -> Self {
        Self {
            kind: "sub".to_string(),
        }
    }
}

impl Record for SubSupAttrs {
    const TYPE_NAME: &'static str = "subsup.attrs";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::defaulted("type")];

    fn read(r: &RecordReader<'_>) -> Result<Self> {
        Ok(Self {
            kind: r.defaulted("type", || "sub".to_string())?,
        })
    }

    fn write(&self, w: &mut RecordWriter) {
        w.put("type", &self.kind);
    }
}

record_field_value!(
    ParagraphAttrs,
    HeadingAttrs,
    OrderedListAttrs,
    CodeBlockAttrs,
    PanelAttrs,
    TableAttrs,
    TableCellAttrs,
    TaskListAttrs,
    TaskItemAttrs,
    MediaAttrs,
    MediaSingleAttrs,
    MentionAttrs,
    EmojiAttrs,
    DateAttrs,
    ExpandAttrs,
    CardAttrs,
    StatusAttrs,
    LinkAttrs,
    ColorAttrs,
    SubSupAttrs,
);
