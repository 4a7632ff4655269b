//! Typed ADF tree: nodes, marks and their attribute records.

pub mod attrs;
pub mod mark;
pub mod node;

pub use attrs::{
    CardAttrs, CodeBlockAttrs, ColorAttrs, DateAttrs, EmojiAttrs, ExpandAttrs, HeadingAttrs,
    LinkAttrs, MediaAttrs, MediaSingleAttrs, MentionAttrs, OrderedListAttrs, PanelAttrs,
    ParagraphAttrs, StatusAttrs, SubSupAttrs, TableAttrs, TableCellAttrs, TaskItemAttrs,
    TaskListAttrs,
};
pub use mark::{Mark, MarkKind};
pub use node::{Node, NodeKind};
