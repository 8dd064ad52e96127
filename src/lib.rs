//! treesync - structural diff and merge for JSON-like configuration trees.
//!
//! This library reconciles a locally cached configuration snapshot with a
//! freshly fetched one. It computes an order-preserving diff between two
//! trees, applies that diff onto a third tree that may have been edited
//! locally (flagging conflicts instead of failing), and renders diffs for
//! review.
//!
//! # Example
//!
//! ```
//! use treesync::{apply, compare, is_modified, parse_json};
//!
//! let synced = parse_json(r#"{"name": "egg", "files": ["a.ts", "b.ts"]}"#).unwrap();
//! let fetched = parse_json(r#"{"name": "egg", "files": ["a.ts", "c.ts"]}"#).unwrap();
//! let local = parse_json(r#"{"name": "egg", "files": ["a.ts", "b.ts"], "entry": "mod.ts"}"#).unwrap();
//!
//! let diff = compare(&fetched, &synced);
//! assert!(is_modified(&diff));
//!
//! let (merged, conflict) = apply(&diff, &local);
//! assert!(!conflict);
//! assert_eq!(
//!     merged,
//!     parse_json(r#"{"name": "egg", "files": ["a.ts", "c.ts"], "entry": "mod.ts"}"#).unwrap()
//! );
//! ```

pub mod diff;
pub mod error;
pub mod lcs;
pub mod output;
pub mod parser;
pub mod patch;
pub mod tree;
pub mod writer;

// Re-export commonly used types for convenience
pub use diff::{compare, is_modified, DiffNode, DiffStats, DiffTree};
pub use error::{OutputError, ParseError, TreesyncError, WriteError};
pub use lcs::{lcs, lcs_by};
pub use output::{format_diff, print, OutputFormat, OutputOptions};
pub use parser::{parse_content, parse_file, parse_json, parse_toml, parse_yaml, FormatHint};
pub use patch::{apply, apply_with_report, format_path, Conflict, MergeReport};
pub use tree::{Map, Node};
pub use writer::{to_json_string, to_toml_string, to_yaml_string, write_content, write_file};
