//! Marks: formatting decorations applied to text and media.

use std::fmt;
use std::str::FromStr;

use super::attrs::{ColorAttrs, LinkAttrs, SubSupAttrs};
use crate::field::{Field, FieldSpec};

/// The closed set of mark tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Strong,
    Em,
    Strike,
    Code,
    Underline,
    Link,
    TextColor,
    BackgroundColor,
    SubSup,
}

impl MarkKind {
    pub const ALL: [MarkKind; 9] = [
        MarkKind::Strong,
        MarkKind::Em,
        MarkKind::Strike,
        MarkKind::Code,
        MarkKind::Underline,
        MarkKind::Link,
        MarkKind::TextColor,
        MarkKind::BackgroundColor,
        MarkKind::SubSup,
    ];

    /// Wire value of the `type` field.
    pub fn tag(self) -> &'static str {
        match self {
            MarkKind::Strong => "strong",
            MarkKind::Em => "em",
            MarkKind::Strike => "strike",
            MarkKind::Code => "code",
            MarkKind::Underline => "underline",
            MarkKind::Link => "link",
            MarkKind::TextColor => "textColor",
            MarkKind::BackgroundColor => "backgroundColor",
            MarkKind::SubSup => "subsup",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Declared top-level fields besides `type`.
    pub fn fields(self) -> &'static [FieldSpec] {
        const NONE: &[FieldSpec] = &[];
        const REQUIRED_ATTRS: &[FieldSpec] = &[FieldSpec::required("attrs")];
        const OPTIONAL_ATTRS: &[FieldSpec] = &[FieldSpec::optional("attrs")];
        match self {
            MarkKind::Strong
            | MarkKind::Em
            | MarkKind::Strike
            | MarkKind::Code
            | MarkKind::Underline => NONE,
            MarkKind::Link => REQUIRED_ATTRS,
            MarkKind::TextColor | MarkKind::BackgroundColor | MarkKind::SubSup => OPTIONAL_ATTRS,
        }
    }
}

impl fmt::Display for MarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for MarkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown mark type {s:?}"))
    }
}

/// A mark attached to a `text` (or `media`) node.
///
/// Marks never own child nodes. Their order on a node is significant.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Strong,
    Em,
    Strike,
    Code,
    Underline,
    Link { attrs: LinkAttrs },
    TextColor { attrs: Field<ColorAttrs> },
    BackgroundColor { attrs: Field<ColorAttrs> },
    SubSup { attrs: Field<SubSupAttrs> },
}

impl Mark {
    pub fn kind(&self) -> MarkKind {
        match self {
            Mark::Strong => MarkKind::Strong,
            Mark::Em => MarkKind::Em,
            Mark::Strike => MarkKind::Strike,
            Mark::Code => MarkKind::Code,
            Mark::Underline => MarkKind::Underline,
            Mark::Link { .. } => MarkKind::Link,
            Mark::TextColor { .. } => MarkKind::TextColor,
            Mark::BackgroundColor { .. } => MarkKind::BackgroundColor,
            Mark::SubSup { .. } => MarkKind::SubSup,
        }
    }

    /// Shorthand for a link mark without a title.
    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link {
            attrs: LinkAttrs::new(href),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for kind in MarkKind::ALL {
            assert_eq!(MarkKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!("textColor".parse::<MarkKind>(), Ok(MarkKind::TextColor));
        assert!("bold".parse::<MarkKind>().is_err());
    }

    #[test]
    fn test_link_shorthand() {
        let mark = Mark::link("http://example.com");
        assert_eq!(mark.kind(), MarkKind::Link);
    }
}
