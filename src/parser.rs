//! File parsing for JSON, YAML and TOML formats.
//!
//! This module turns configuration and state files into [`Node`] trees. The
//! format is detected from the file extension, falling back to trying JSON,
//! then YAML, then TOML when the extension is unknown. Key order of the
//! source document is preserved.
//!
//! # Examples
//!
//! ```no_run
//! use treesync::parser::parse_file;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cached = parse_file(Path::new("egg.json"))?;
//! let fetched = parse_file(Path::new("egg.yml"))?;
//! # Ok(())
//! # }
//! ```

use crate::error::ParseError;
use crate::tree::{Map, Node};
use std::fs;
use std::path::Path;

/// The serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    Json,
    Yaml,
    Toml,
}

impl FormatHint {
    /// Detects the format from a file extension (`.json`, `.yaml`, `.yml`, `.toml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("json") => Some(FormatHint::Json),
            Some("yaml") | Some("yml") => Some(FormatHint::Yaml),
            Some("toml") => Some(FormatHint::Toml),
            _ => None,
        }
    }
}

/// Parses a file into a Node tree.
///
/// # Errors
///
/// This function will return an error if:
/// - The file does not exist (`ParseError::FileNotFound`)
/// - The file cannot be read (`ParseError::ReadError`)
/// - The file content is invalid for its format (`JsonError`, `YamlError`, `TomlError`)
/// - The extension is unknown and no format parses (`ParseError::UnknownFormat`)
pub fn parse_file(path: &Path) -> Result<Node, ParseError> {
    let origin = path.to_string_lossy().to_string();
    if !path.exists() {
        return Err(ParseError::file_not_found(origin));
    }

    let content = fs::read_to_string(path).map_err(|e| ParseError::read_error(origin.clone(), e))?;
    tracing::debug!(path = %origin, bytes = content.len(), "read file");

    match FormatHint::from_path(path) {
        Some(hint) => parse_content(&content, hint, &origin),
        None => parse_json(&content)
            .map_err(|_| ())
            .or_else(|_| parse_yaml(&content).map_err(|_| ()))
            .or_else(|_| parse_toml(&content).map_err(|_| ()))
            .map_err(|_| ParseError::unknown_format(origin)),
    }
}

/// Parses a string in the given format. `origin` names the source in errors.
pub fn parse_content(content: &str, hint: FormatHint, origin: &str) -> Result<Node, ParseError> {
    match hint {
        FormatHint::Json => parse_json(content).map_err(|e| ParseError::json_error(origin, e)),
        FormatHint::Yaml => parse_yaml(content).map_err(|e| ParseError::yaml_error(origin, e)),
        FormatHint::Toml => parse_toml(content).map_err(|e| ParseError::toml_error(origin, e)),
    }
}

/// Parses a JSON string into a Node.
///
/// # Examples
///
/// ```
/// use treesync::parser::parse_json;
///
/// let json = r#"{"name": "egg", "version": "0.1.0"}"#;
/// let node = parse_json(json).unwrap();
/// assert_eq!(node.as_object().unwrap().len(), 2);
/// ```
pub fn parse_json(content: &str) -> Result<Node, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(Node::from(value))
}

/// Parses a YAML string into a Node.
pub fn parse_yaml(content: &str) -> Result<Node, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    Ok(yaml_to_node(value))
}

/// Parses a TOML document into a Node. The root is always an object.
pub fn parse_toml(content: &str) -> Result<Node, toml::de::Error> {
    let table: toml::Table = toml::from_str(content)?;
    Ok(toml_to_node(toml::Value::Table(table)))
}

/// Converts a serde_yaml::Value to our Node representation.
///
/// Tags are dropped and non-string mapping keys are converted to strings.
fn yaml_to_node(value: serde_yaml::Value) -> Node {
    match value {
        serde_yaml::Value::Null => Node::Null,
        serde_yaml::Value::Bool(b) => Node::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                Node::Number(f)
            } else if let Some(i) = n.as_i64() {
                Node::Number(i as f64)
            } else if let Some(u) = n.as_u64() {
                Node::Number(u as f64)
            } else {
                Node::Number(0.0)
            }
        }
        serde_yaml::Value::String(s) => Node::String(s),
        serde_yaml::Value::Sequence(seq) => Node::Array(seq.into_iter().map(yaml_to_node).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let map: Map = mapping
                .into_iter()
                .map(|(k, v)| {
                    let key = match k {
                        serde_yaml::Value::String(s) => s,
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        serde_yaml::Value::Null => "null".to_string(),
                        other => format!("{:?}", other),
                    };
                    (key, yaml_to_node(v))
                })
                .collect();
            Node::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_node(tagged.value),
    }
}

/// Converts a toml::Value to our Node representation. Datetimes become strings.
fn toml_to_node(value: toml::Value) -> Node {
    match value {
        toml::Value::String(s) => Node::String(s),
        toml::Value::Integer(i) => Node::Number(i as f64),
        toml::Value::Float(f) => Node::Number(f),
        toml::Value::Boolean(b) => Node::Bool(b),
        toml::Value::Datetime(dt) => Node::String(dt.to_string()),
        toml::Value::Array(arr) => Node::Array(arr.into_iter().map(toml_to_node).collect()),
        toml::Value::Table(table) => {
            Node::Object(table.into_iter().map(|(k, v)| (k, toml_to_node(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_json_primitives() {
        assert_eq!(parse_json("null").unwrap(), Node::Null);
        assert_eq!(parse_json("true").unwrap(), Node::Bool(true));
        assert_eq!(parse_json("42").unwrap(), Node::Number(42.0));
        assert_eq!(parse_json(r#""hello""#).unwrap(), Node::String("hello".to_string()));
    }

    #[test]
    fn test_parse_json_invalid() {
        assert!(parse_json("{invalid json}").is_err());
        assert!(parse_json("[1, 2,]").is_err());
    }

    #[test]
    fn test_parse_yaml_preserves_key_order() {
        let node = parse_yaml("zeta: 1\nalpha: 2\nmid: 3").unwrap();
        let keys: Vec<&str> = node.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_toml_nested() {
        let node = parse_toml("name = \"egg\"\n[deps]\nfoo = 1\n").unwrap();
        let map = node.as_object().unwrap();
        assert_eq!(map.get("name"), Some(&Node::String("egg".to_string())));
        let deps = map.get("deps").unwrap().as_object().unwrap();
        assert_eq!(deps.get("foo"), Some(&Node::Number(1.0)));
    }

    #[test]
    fn test_parse_toml_nan_compares_unchanged() {
        let node = parse_toml("limit = nan\n").unwrap();
        let again = parse_toml("limit = nan\n").unwrap();
        assert!(!crate::diff::compare(&again, &node).is_modified());
    }

    #[test]
    fn test_format_hint_from_path() {
        assert_eq!(FormatHint::from_path(Path::new("a.JSON")), Some(FormatHint::Json));
        assert_eq!(FormatHint::from_path(Path::new("a.yml")), Some(FormatHint::Yaml));
        assert_eq!(FormatHint::from_path(Path::new("a.toml")), Some(FormatHint::Toml));
        assert_eq!(FormatHint::from_path(Path::new("a.txt")), None);
    }

    #[test]
    fn test_parse_file_unknown_extension_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "key: value").unwrap();
        let path = file.path().with_extension("conf");
        fs::copy(file.path(), &path).unwrap();

        let node = parse_file(&path).unwrap();
        assert_eq!(
            node.as_object().unwrap().get("key"),
            Some(&Node::String("value".to_string()))
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_parse_file_logs_and_parses_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name": "egg"}}"#).unwrap();
        let node = parse_file(file.path()).unwrap();
        assert_eq!(node, parse_json(r#"{"name": "egg"}"#).unwrap());
    }

    #[test]
    fn test_parse_file_not_found() {
        match parse_file(Path::new("/nonexistent/file.json")) {
            Err(ParseError::FileNotFound { .. }) => {}
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }
}
