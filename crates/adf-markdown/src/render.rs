//! Markdown rendering for typed ADF trees
//!
//! Rendering is a depth-first walk; every node renders its children first and
//! then applies its own rule. Nothing is carried between calls except the
//! [`Options`].

use adf_core::{AdfError, Mark, Node};

use crate::options::{Options, QuoteStyle};
use crate::utilities::{escape_table_cell, indent, indent_continuation, iso_date, quote, INDENT_WIDTH};
use crate::Result;

/// Render a value to Markdown
pub trait ToMarkdown {
    fn to_markdown_with(&self, options: &Options) -> Result<String>;

    fn to_markdown(&self) -> Result<String> {
        self.to_markdown_with(&Options::default())
    }
}

impl ToMarkdown for Node {
    fn to_markdown_with(&self, options: &Options) -> Result<String> {
        Renderer { options }.node(self)
    }
}

/// Apply a single mark to already rendered text.
pub fn wrap_mark(mark: &Mark, inner: &str) -> String {
    match mark {
        Mark::Strong => format!("**{inner}**"),
        Mark::Em => format!("*{inner}*"),
        Mark::Strike => format!("~~{inner}~~"),
        Mark::Code => format!("`{inner}`"),
        Mark::Link { attrs } => {
            let label = attrs.title.as_deref().unwrap_or(inner);
            format!("[{label}]({})", attrs.href)
        }
        // No Markdown equivalent
        Mark::Underline | Mark::TextColor { .. } | Mark::BackgroundColor { .. } | Mark::SubSup { .. } => {
            inner.to_string()
        }
    }
}

/// Largest `colspan` a table cell may declare.
pub const MAX_COLSPAN: i64 = 1000;

struct Renderer<'a> {
    options: &'a Options,
}

impl Renderer<'_> {
    fn node(&self, node: &Node) -> Result<String> {
        match self.render(node) {
            Err(e) if self.options.permissive => {
                tracing::warn!(node = %node.kind(), error = %e, "Rendering failed, substituting empty output");
                Ok(String::new())
            }
            result => result,
        }
    }

    fn render(&self, node: &Node) -> Result<String> {
        match node {
            Node::Doc { content, .. } => self.blocks(content, "\n\n"),

            Node::Paragraph { .. } | Node::MediaSingle { .. } => self.inline(node.content()),

            Node::Text { text, .. } => Ok(node
                .marks()
                .iter()
                .fold(text.clone(), |acc, mark| wrap_mark(mark, &acc))),

            Node::Heading { attrs, content } => {
                if !(1..=6).contains(&attrs.level) {
                    return Err(AdfError::MalformedValue {
                        type_name: "heading",
                        field: "level",
                        value: attrs.level.to_string(),
                        reason: "heading level must be between 1 and 6".to_string(),
                    });
                }
                let level = attrs.level as usize;
                Ok(format!("{} {}", "#".repeat(level), self.inline(content)?))
            }

            Node::Blockquote { .. } => {
                let inner = self.blocks(node.content(), "\n\n")?;
                Ok(match self.options.quote_style {
                    QuoteStyle::Indented => indent(&inner, INDENT_WIDTH),
                    QuoteStyle::Prefixed => quote(&inner),
                })
            }

            Node::BulletList { content } => {
                let marker = format!("{} ", self.options.bullet_marker);
                self.list(content, |_| Ok(marker.clone()))
            }

            Node::OrderedList { attrs, content } => {
                let start = attrs.get().and_then(|a| a.order.get().copied()).unwrap_or(1);
                self.list(content, |i| {
                    let number = i64::try_from(i)
                        .ok()
                        .and_then(|i| start.checked_add(i))
                        .ok_or_else(|| AdfError::MalformedValue {
                            type_name: "orderedList",
                            field: "order",
                            value: start.to_string(),
                            reason: "item number overflows a 64-bit integer".to_string(),
                        })?;
                    Ok(format!("{number}. "))
                })
            }

            Node::ListItem { content } => self.blocks(content, "\n"),

            Node::CodeBlock { attrs, .. } => {
                let code = self.inline(node.content())?;
                let language = attrs
                    .get()
                    .and_then(|a| a.language.as_deref())
                    .map(|lang| self.options.code_language(lang))
                    .unwrap_or("");
                Ok(format!("```{language}\n{code}\n```"))
            }

            Node::Panel { attrs, content } => {
                let label = format!("**{}**", attrs.panel_type.to_uppercase());
                let inner = self.blocks(content, "\n\n")?;
                if inner.is_empty() {
                    Ok(label)
                } else {
                    Ok(format!("{label}\n\n{}", indent(&inner, INDENT_WIDTH)))
                }
            }

            Node::Table { content, .. } => self.table(content),
            Node::TableRow { content } => Ok(table_line(&self.row_cells(content)?)),
            Node::TableCell { content, .. } | Node::TableHeader { content, .. } => {
                let inner = self.blocks(content, &self.options.table_line_break)?;
                Ok(escape_table_cell(&inner, &self.options.table_line_break))
            }

            Node::TaskList { content, .. } => self.task_list(content),
            Node::TaskItem { attrs, .. } => {
                let body = self.inline(node.content())?;
                if body.is_empty() && !node.content().is_empty() {
                    // every child was dropped
                    return Ok(String::new());
                }
                Ok(format!("{}{}", self.checkbox(attrs.is_done()), body))
            }

            Node::Media { attrs, marks } => {
                let Some(url) = attrs.url.as_deref() else {
                    return Err(AdfError::UnimplementedRendering {
                        type_name: "media",
                        reason: format!("{} media has no url", attrs.media_type),
                    });
                };
                let image = format!("![{}]({url})", attrs.alt.as_deref().unwrap_or(""));
                let marks = marks.get().map(Vec::as_slice).unwrap_or(&[]);
                Ok(marks.iter().fold(image, |acc, mark| match mark {
                    Mark::Link { attrs } => format!("[{acc}]({})", attrs.href),
                    other => wrap_mark(other, &acc),
                }))
            }

            Node::MediaGroup { content } => self.blocks(content, "\n"),

            Node::Mention { attrs } => Ok(match attrs.text.as_deref() {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => format!("@{}", attrs.id),
            }),

            Node::Emoji { attrs } => Ok(match attrs.text.as_deref() {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => attrs.short_name.clone(),
            }),

            Node::Date { attrs } => iso_date(&attrs.timestamp).ok_or_else(|| AdfError::MalformedValue {
                type_name: "date",
                field: "timestamp",
                value: attrs.timestamp.clone(),
                reason: "expected milliseconds since the Unix epoch".to_string(),
            }),

            Node::Rule => Ok(self.options.hr.clone()),
            Node::HardBreak => Ok("\n".to_string()),

            Node::Expand { attrs, content, .. } => self.titled_blocks(attrs.title.as_deref(), content),
            Node::NestedExpand { attrs, content } => {
                self.titled_blocks(attrs.get().and_then(|a| a.title.as_deref()), content)
            }

            Node::InlineCard { attrs } | Node::BlockCard { attrs } => Ok(format!("[{0}]({0})", attrs.url)),

            Node::Status { attrs } => Ok(format!("`{}`", attrs.text)),
        }
    }

    fn inline(&self, nodes: &[Node]) -> Result<String> {
        nodes.iter().map(|node| self.node(node)).collect()
    }

    fn blocks(&self, nodes: &[Node], separator: &str) -> Result<String> {
        let mut parts = Vec::with_capacity(nodes.len());
        for node in nodes {
            let rendered = self.node(node)?;
            if !rendered.is_empty() {
                parts.push(rendered);
            }
        }
        Ok(parts.join(separator))
    }

    /// Items that render empty are dropped and do not consume a number.
    fn list(&self, items: &[Node], marker: impl Fn(usize) -> Result<String>) -> Result<String> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let body = self.node(item)?;
            if body.is_empty() {
                continue;
            }
            let marker = marker(lines.len())?;
            lines.push(format!("{marker}{}", indent_continuation(&body, INDENT_WIDTH)));
        }
        Ok(lines.join("\n"))
    }

    fn task_list(&self, items: &[Node]) -> Result<String> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let rendered = self.node(item)?;
            match item {
                _ if rendered.is_empty() => {}
                Node::TaskItem { .. } => lines.push(indent_continuation(&rendered, INDENT_WIDTH)),
                _ => lines.push(indent(&rendered, INDENT_WIDTH)),
            }
        }
        Ok(lines.join("\n"))
    }

    fn checkbox(&self, done: bool) -> String {
        let mark = if done { 'x' } else { ' ' };
        format!("{} [{mark}] ", self.options.bullet_marker)
    }

    fn titled_blocks(&self, title: Option<&str>, content: &[Node]) -> Result<String> {
        let body = self.blocks(content, "\n\n")?;
        Ok(match title.filter(|t| !t.is_empty()) {
            Some(title) if body.is_empty() => format!("**{title}**"),
            Some(title) => format!("**{title}**\n\n{body}"),
            None => body,
        })
    }

    fn table(&self, rows: &[Node]) -> Result<String> {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        for (i, row) in rows.iter().enumerate() {
            let Node::TableRow { content } = row else {
                return Err(AdfError::MalformedValue {
                    type_name: "table",
                    field: "content",
                    value: row.kind().tag().to_string(),
                    reason: "table children must be tableRow nodes".to_string(),
                });
            };
            let cells = self.row_cells(content)?;
            lines.push(table_line(&cells));
            if i == 0 {
                lines.push(table_line(&vec!["---".to_string(); cells.len()]));
            }
        }
        Ok(lines.join("\n"))
    }

    fn row_cells(&self, cells: &[Node]) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(cells.len());
        for cell in cells {
            out.push(self.node(cell)?);
            let colspan = match cell {
                Node::TableCell { attrs, .. } | Node::TableHeader { attrs, .. } => {
                    attrs.get().and_then(|a| a.colspan.get().copied()).unwrap_or(1)
                }
                _ => 1,
            };
            if colspan > MAX_COLSPAN {
                return Err(AdfError::MalformedValue {
                    type_name: cell.kind().tag(),
                    field: "colspan",
                    value: colspan.to_string(),
                    reason: format!("colspan may not exceed {MAX_COLSPAN}"),
                });
            }
            for _ in 1..colspan.max(1) {
                out.push(String::new());
            }
        }
        Ok(out)
    }
}

fn table_line(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}
