//! Applying a diff onto a value that may have drifted from the diff's baseline.
//!
//! The merge never mutates its inputs: the result is rebuilt from the target
//! and the diff. Positions where the target disagrees with what the diff
//! expected are recorded as [`Conflict`]s; the diff's new value wins and the
//! merge carries on.
//!
//! # Examples
//!
//! ```
//! use treesync::{apply, compare, parse_json};
//!
//! let base = parse_json(r#"{"a": 1, "b": 2}"#).unwrap();
//! let actual = parse_json(r#"{"a": 1, "b": 3, "c": 4}"#).unwrap();
//! let diff = compare(&actual, &base);
//!
//! let (merged, conflict) = apply(&diff, &parse_json(r#"{"a": 1, "b": 99}"#).unwrap());
//! assert!(conflict);
//! assert_eq!(merged, actual);
//! ```

use crate::diff::{DiffNode, DiffTree};
use crate::tree::{Map, Node};

/// A position where the target did not match the diff's baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    /// Path to the position in the merged value (object keys and "\[i\]" indices)
    pub path: Vec<String>,
    /// The value the diff expected to find (None when only the kind was expected)
    pub expected: Option<Node>,
    /// The value found in the target (None when the slot was absent)
    pub found: Option<Node>,
    /// The value adopted in the merged result
    pub resolved: Node,
}

/// The outcome of applying a diff.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    /// The merged value
    pub value: Node,
    /// Every conflict met during the merge, in walk order
    pub conflicts: Vec<Conflict>,
}

impl MergeReport {
    pub fn has_conflict(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Applies `diff` onto `target`, returning the merged value and whether any
/// conflict occurred.
pub fn apply(diff: &DiffTree, target: &Node) -> (Node, bool) {
    let report = apply_with_report(diff, target);
    let conflict = report.has_conflict();
    (report.value, conflict)
}

/// Applies `diff` onto `target` and reports every conflict.
///
/// A diff whose root is a removal (never produced by [`crate::compare`])
/// merges to `Node::Null`.
pub fn apply_with_report(diff: &DiffTree, target: &Node) -> MergeReport {
    let mut merger = Merger::default();
    let value = merger.resolve(diff, Some(target)).unwrap_or(Node::Null);
    tracing::debug!(conflicts = merger.conflicts.len(), "applied diff");
    MergeReport {
        value,
        conflicts: merger.conflicts,
    }
}

#[derive(Default)]
struct Merger {
    path: Vec<String>,
    conflicts: Vec<Conflict>,
}

impl Merger {
    /// Resolves one diff position against the target's slot.
    /// `None` means the position is deleted from the merged value.
    fn resolve(&mut self, diff: &DiffTree, slot: Option<&Node>) -> Option<Node> {
        match diff {
            DiffTree::Node(node) => self.resolve_node(node, slot),
            DiffTree::Array(entries) => {
                let items: &[Node] = match slot {
                    Some(Node::Array(items)) => items.as_slice(),
                    None => &[],
                    Some(other) => {
                        let merged = Node::Array(self.merge_array(entries, &[]));
                        self.conflict(None, Some(other), &merged);
                        return Some(merged);
                    }
                };
                Some(Node::Array(self.merge_array(entries, items)))
            }
            DiffTree::Object(entries) => {
                let empty = Map::new();
                let map: &Map = match slot {
                    Some(Node::Object(map)) => map,
                    None => &empty,
                    Some(other) => {
                        let merged = Node::Object(self.merge_object(entries, &empty));
                        self.conflict(None, Some(other), &merged);
                        return Some(merged);
                    }
                };
                Some(Node::Object(self.merge_object(entries, map)))
            }
        }
    }

    fn resolve_node(&mut self, node: &DiffNode, slot: Option<&Node>) -> Option<Node> {
        match node {
            DiffNode::Common(value) => Some(slot.unwrap_or(value).clone()),
            DiffNode::Added(value) => Some(value.clone()),
            DiffNode::Removed(_) => None,
            DiffNode::Updated { value, old_value } => {
                let clean = slot.is_some_and(|current| current.equals(old_value) || current.equals(value));
                if !clean {
                    self.conflict(Some(old_value), slot, value);
                }
                Some(value.clone())
            }
        }
    }

    /// Walks the array diff with a cursor into the target.
    ///
    /// Additions do not consume a target element; every other entry does.
    /// Target elements past the diff's covered range are kept as they are.
    fn merge_array(&mut self, entries: &[DiffTree], target: &[Node]) -> Vec<Node> {
        let mut merged = Vec::with_capacity(target.len().max(entries.len()));
        let mut j = 0;

        for entry in entries {
            let consumes = !matches!(entry, DiffTree::Node(DiffNode::Added(_)));
            self.path.push(format!("[{}]", merged.len()));
            let resolved = self.resolve(entry, target.get(j));
            self.path.pop();
            if let Some(value) = resolved {
                merged.push(value);
            }
            if consumes {
                j += 1;
            }
        }

        if j < target.len() {
            merged.extend_from_slice(&target[j..]);
        }
        merged
    }

    /// Starts from the target's entries and resolves each key of the diff.
    fn merge_object(&mut self, entries: &[(String, DiffTree)], target: &Map) -> Map {
        let mut merged = target.clone();
        for (key, sub) in entries {
            self.path.push(key.clone());
            let resolved = self.resolve(sub, target.get(key));
            self.path.pop();
            match resolved {
                Some(value) => {
                    merged.insert(key.clone(), value);
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        merged
    }

    /// Records a conflict at the current path. `expected` is None when the
    /// target only had the wrong kind of container.
    fn conflict(&mut self, expected: Option<&Node>, found: Option<&Node>, resolved: &Node) {
        let path = self.path.clone();
        tracing::warn!(
            path = %format_path(&path),
            found = found.map(Node::type_name).unwrap_or("absent"),
            kind_mismatch = expected.is_none(),
            "merge conflict: target diverged from baseline"
        );
        self.conflicts.push(Conflict {
            path,
            expected: expected.cloned(),
            found: found.cloned(),
            resolved: resolved.clone(),
        });
    }
}

/// Joins path components with dots for object keys, keeping array index notation.
///
/// - `["user", "name"]` → `"user.name"`
/// - `["items", "[0]", "id"]` → `"items[0].id"`
/// - `[]` → `"(root)"`
pub fn format_path(path: &[String]) -> String {
    if path.is_empty() {
        return "(root)".to_string();
    }

    let mut result = String::new();
    for (i, component) in path.iter().enumerate() {
        if component.starts_with('[') {
            result.push_str(component);
        } else {
            if i > 0 {
                result.push('.');
            }
            result.push_str(component);
        }
    }
    result
}
