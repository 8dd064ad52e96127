//! Serializing trees back to text.
//!
//! Used to persist a merged value. JSON output is pretty-printed with a
//! trailing newline; integral numbers are written without a fractional part.

use crate::error::WriteError;
use crate::parser::FormatHint;
use crate::tree::{Map, Node};
use std::fs;
use std::path::Path;

/// Serializes a node as pretty JSON.
pub fn to_json_string(node: &Node) -> Result<String, WriteError> {
    let mut out = serde_json::to_string_pretty(node).map_err(|e| WriteError::Json { source: e })?;
    out.push('\n');
    Ok(out)
}

/// Serializes a node as YAML.
pub fn to_yaml_string(node: &Node) -> Result<String, WriteError> {
    serde_yaml::to_string(node).map_err(|e| WriteError::Yaml { source: e })
}

/// Serializes a node as a TOML document.
///
/// TOML has no null: null object members are left out, and a null inside an
/// array is an error. The root must be an object.
pub fn to_toml_string(node: &Node) -> Result<String, WriteError> {
    let Node::Object(map) = node else {
        return Err(WriteError::unrepresentable(format!("a {} root", node.type_name())));
    };
    let table = strip_nulls(map)?;
    toml::to_string(&Node::Object(table)).map_err(|e| WriteError::Toml { source: e })
}

fn strip_nulls(map: &Map) -> Result<Map, WriteError> {
    let mut out = Map::new();
    for (key, value) in map.iter() {
        match value {
            Node::Null => continue,
            other => {
                out.insert(key, strip_nulls_in(other)?);
            }
        }
    }
    Ok(out)
}

fn strip_nulls_in(node: &Node) -> Result<Node, WriteError> {
    match node {
        Node::Object(map) => Ok(Node::Object(strip_nulls(map)?)),
        Node::Array(items) => items
            .iter()
            .map(|item| match item {
                Node::Null => Err(WriteError::unrepresentable("null inside an array")),
                other => strip_nulls_in(other),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Array),
        scalar => Ok(scalar.clone()),
    }
}

/// Serializes a node in the given format.
pub fn write_content(node: &Node, format: FormatHint) -> Result<String, WriteError> {
    match format {
        FormatHint::Json => to_json_string(node),
        FormatHint::Yaml => to_yaml_string(node),
        FormatHint::Toml => to_toml_string(node),
    }
}

/// Writes a node to `path`, choosing the format from the extension (JSON by default).
pub fn write_file(path: &Path, node: &Node) -> Result<(), WriteError> {
    let format = FormatHint::from_path(path).unwrap_or(FormatHint::Json);
    let content = write_content(node, format)?;
    fs::write(path, content).map_err(|e| WriteError::io(path.to_string_lossy(), e))?;
    tracing::debug!(path = %path.display(), ?format, "wrote merged value");
    Ok(())
}
