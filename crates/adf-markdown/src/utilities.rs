//! Text helpers shared by the render rules.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Width of one nesting level for lists, quotes and panels.
pub const INDENT_WIDTH: usize = 4;

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").expect("valid line break regex"));

/// Indent every non-empty line by `width` spaces.
pub fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indent every non-empty line except the first.
///
/// Used for list items, whose first line carries the marker.
pub fn indent_continuation(text: &str, width: usize) -> String {
    match text.split_once('\n') {
        Some((first, rest)) => format!("{first}\n{}", indent(rest, width)),
        None => text.to_string(),
    }
}

/// Prefix lines with `> `; empty lines get a bare `>`.
pub fn quote(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Make text safe for a single pipe-table cell.
pub fn escape_table_cell(text: &str, line_break: &str) -> String {
    LINE_BREAK_RE
        .replace_all(text, regex::NoExpand(line_break))
        .replace('|', "\\|")
}

/// Format a millisecond Unix timestamp as a UTC `YYYY-MM-DD` date.
///
/// Returns `None` when the string is not an integer or the instant is out of range.
pub fn iso_date(timestamp_ms: &str) -> Option<String> {
    let millis: i64 = timestamp_ms.trim().parse().ok()?;
    let date: DateTime<Utc> = DateTime::from_timestamp(millis.div_euclid(1000), 0)?;
    Some(date.format("%Y-%m-%d").to_string())
}
