//! Rendering of diff trees for human inspection.
//!
//! The text layout nests object diffs in `{ ... }` blocks and array diffs in
//! `[ ... ]` blocks, two spaces deeper per level, with a three-column marker
//! in front of every line:
//!
//! ```text
//!
//!    [config] Deleted / Added
//!
//!    {
//!      a: 1,
//!  -   b: 2,
//!  +   b: 3,
//!  +   c: 4,
//!    },
//!
//! Summary: 1 added, 1 updated, 1 unchanged
//! ```
//!
//! An update is always shown as a removal of the old value immediately
//! followed by an addition of the new one.
//!
//! # Examples
//!
//! ```
//! use treesync::{compare, format_diff, Node, OutputFormat, OutputOptions};
//!
//! let diff = compare(&Node::Number(43.0), &Node::Number(42.0));
//! let output = format_diff("answer", &diff, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
//! assert!(output.contains(" - 42,"));
//! assert!(output.contains(" + 43,"));
//! ```

use std::io::Write;
use std::str::FromStr;

use crate::diff::{DiffNode, DiffStats, DiffTree};
use crate::error::OutputError;
use crate::tree::Node;
use colored::*;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the diff tree
    Json,
    /// Plain text, no colors (suitable for piping)
    Plain,
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            _ => Err(OutputError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Options for controlling output formatting.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Hide unchanged leaves and unmodified sub-trees
    pub compact: bool,
    /// Append a summary line with change counts
    pub summary: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            compact: false,
            summary: true,
        }
    }
}

/// Writes the rendering of `diff` to `out`.
///
/// The sink is injected so callers can render to stdout, a file or a buffer.
pub fn print<W: Write>(
    title: &str,
    diff: &DiffTree,
    out: &mut W,
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<(), OutputError> {
    let rendered = format_diff(title, diff, format, options)?;
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Formats a diff according to the specified format and options.
///
/// # Arguments
///
/// * `title` - Label shown in the header (e.g. the file being synced)
/// * `diff` - The diff to format
/// * `format` - The output format (Terminal, JSON, or Plain)
/// * `options` - Formatting options
///
/// # Returns
///
/// Returns the formatted string on success, or an OutputError on failure.
pub fn format_diff(
    title: &str,
    diff: &DiffTree,
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Renderer::new(true, options).render(title, diff),
        OutputFormat::Plain => Renderer::new(false, options).render(title, diff),
        OutputFormat::Json => format_json(title, diff),
    }
}

#[derive(Clone, Copy)]
enum Marker {
    Plain,
    Added,
    Removed,
}

struct Renderer<'a> {
    color: bool,
    options: &'a OutputOptions,
    output: String,
}

impl<'a> Renderer<'a> {
    fn new(color: bool, options: &'a OutputOptions) -> Self {
        Self {
            color,
            options,
            output: String::new(),
        }
    }

    fn render(mut self, title: &str, diff: &DiffTree) -> Result<String, OutputError> {
        self.output.push('\n');
        let header = if self.color {
            format!(
                "   {} {} / {}",
                format!("[{}]", title).bright_black().bold(),
                "Deleted".red().bold(),
                "Added".green().bold()
            )
        } else {
            format!("   [{}] Deleted / Added", title)
        };
        self.output.push_str(&header);
        self.output.push_str("\n\n");

        self.tree(diff, "", None, true)?;
        self.output.push('\n');

        if self.options.summary {
            self.output.push_str(&format_summary(&diff.stats()));
            self.output.push('\n');
        }
        Ok(self.output)
    }

    fn tree(&mut self, diff: &DiffTree, indent: &str, key: Option<&str>, root: bool) -> Result<(), OutputError> {
        if self.options.compact && !root && !diff.is_modified() {
            return Ok(());
        }

        let label = key.map(|k| format!("{}: ", k)).unwrap_or_default();
        let inner = format!("{}  ", indent);
        match diff {
            DiffTree::Object(entries) => {
                self.line(Marker::Plain, &format!("{}{}{{", indent, label));
                for (child_key, sub) in entries {
                    self.tree(sub, &inner, Some(child_key.as_str()), false)?;
                }
                self.line(Marker::Plain, &format!("{}}},", indent));
            }
            DiffTree::Array(items) => {
                self.line(Marker::Plain, &format!("{}{}[", indent, label));
                for sub in items {
                    self.tree(sub, &inner, None, false)?;
                }
                self.line(Marker::Plain, &format!("{}],", indent));
            }
            DiffTree::Node(DiffNode::Common(value)) => self.value(Marker::Plain, indent, &label, value)?,
            DiffTree::Node(DiffNode::Added(value)) => self.value(Marker::Added, indent, &label, value)?,
            DiffTree::Node(DiffNode::Removed(value)) => self.value(Marker::Removed, indent, &label, value)?,
            DiffTree::Node(DiffNode::Updated { value, old_value }) => {
                self.value(Marker::Removed, indent, &label, old_value)?;
                self.value(Marker::Added, indent, &label, value)?;
            }
        }
        Ok(())
    }

    /// Emits a leaf value; continuation lines of a multi-line value repeat
    /// the marker and the indent.
    fn value(&mut self, marker: Marker, indent: &str, label: &str, value: &Node) -> Result<(), OutputError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| OutputError::JsonSerializationError { source: e })?;
        let body = format!("{}{},", label, text);
        for line in body.lines() {
            self.line(marker, &format!("{}{}", indent, line));
        }
        Ok(())
    }

    fn line(&mut self, marker: Marker, content: &str) {
        let line = match marker {
            Marker::Plain => format!("   {}", content),
            Marker::Added => format!(" + {}", content),
            Marker::Removed => format!(" - {}", content),
        };
        let line = match (self.color, marker) {
            (true, Marker::Added) => line.green().bold().to_string(),
            (true, Marker::Removed) => line.red().bold().to_string(),
            _ => line,
        };
        self.output.push_str(&line);
        self.output.push('\n');
    }
}

/// Formats a diff as JSON.
///
/// Leaves become `{"type": ..., "value": ...}` objects (updates also carry
/// `old_value`); array and object diffs keep their shape.
fn format_json(title: &str, diff: &DiffTree) -> Result<String, OutputError> {
    use serde_json::json;

    let stats = serde_json::to_value(diff.stats())
        .map_err(|e| OutputError::JsonSerializationError { source: e })?;
    let output = json!({
        "title": title,
        "modified": diff.is_modified(),
        "diff": diff_to_json_value(diff),
        "stats": stats,
    });

    serde_json::to_string_pretty(&output)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

/// Converts a diff tree to a serde_json::Value.
fn diff_to_json_value(diff: &DiffTree) -> serde_json::Value {
    use serde_json::json;

    match diff {
        DiffTree::Node(DiffNode::Common(value)) => json!({"type": "common", "value": value.to_json()}),
        DiffTree::Node(DiffNode::Added(value)) => json!({"type": "added", "value": value.to_json()}),
        DiffTree::Node(DiffNode::Removed(value)) => json!({"type": "removed", "value": value.to_json()}),
        DiffTree::Node(DiffNode::Updated { value, old_value }) => json!({
            "type": "updated",
            "value": value.to_json(),
            "old_value": old_value.to_json(),
        }),
        DiffTree::Array(items) => serde_json::Value::Array(items.iter().map(diff_to_json_value).collect()),
        DiffTree::Object(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, sub)| (k.clone(), diff_to_json_value(sub)))
                .collect(),
        ),
    }
}

/// Formats summary statistics.
fn format_summary(stats: &DiffStats) -> String {
    if stats.is_empty() {
        return "Summary: No changes".to_string();
    }

    let mut parts = Vec::new();
    if stats.added > 0 {
        parts.push(format!("{} added", stats.added));
    }
    if stats.removed > 0 {
        parts.push(format!("{} removed", stats.removed));
    }
    if stats.updated > 0 {
        parts.push(format!("{} updated", stats.updated));
    }
    if stats.common > 0 {
        parts.push(format!("{} unchanged", stats.common));
    }

    format!("Summary: {}", parts.join(", "))
}
