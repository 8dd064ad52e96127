//! Core structural diff algorithm.
//!
//! This module compares a new value (`actual`) against a baseline (`base`)
//! and produces a [`DiffTree`] mirroring the shape of the inputs. Objects are
//! compared key by key, arrays are aligned on their longest common
//! subsequence, and everything else is compared by value.
//!
//! # Examples
//!
//! ```
//! use treesync::{compare, is_modified, parse_json};
//!
//! let base = parse_json(r#"{"a": 1, "b": 2}"#).unwrap();
//! let actual = parse_json(r#"{"a": 1, "b": 3, "c": 4}"#).unwrap();
//!
//! let diff = compare(&actual, &base);
//! assert!(is_modified(&diff));
//! assert_eq!(diff.stats().updated, 1);
//! assert_eq!(diff.stats().added, 1);
//! ```

use crate::lcs::lcs;
use crate::tree::{Map, Node};

/// The change recorded at a single position of the diff.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffNode {
    /// Present and equal in both trees
    Common(Node),
    /// Present in the new tree only
    Added(Node),
    /// Present in the baseline only
    Removed(Node),
    /// Present in both, but different scalars or different kinds
    Updated { value: Node, old_value: Node },
}

/// A diff between two tree values.
///
/// Containers of the same kind recurse into `Array` and `Object`; every other
/// position is a leaf [`DiffNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiffTree {
    Node(DiffNode),
    /// Array-level diff, in alignment order
    Array(Vec<DiffTree>),
    /// Object-level diff: baseline keys first, then keys only in the new tree
    Object(Vec<(String, DiffTree)>),
}

impl DiffTree {
    /// Returns true if any position in the tree is not `Common`.
    pub fn is_modified(&self) -> bool {
        match self {
            DiffTree::Node(node) => !matches!(node, DiffNode::Common(_)),
            DiffTree::Array(items) => items.iter().any(DiffTree::is_modified),
            DiffTree::Object(entries) => entries.iter().any(|(_, sub)| sub.is_modified()),
        }
    }

    /// Counts the leaf nodes of each kind.
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::new();
        self.collect_stats(&mut stats);
        stats
    }

    fn collect_stats(&self, stats: &mut DiffStats) {
        match self {
            DiffTree::Node(DiffNode::Common(_)) => stats.common += 1,
            DiffTree::Node(DiffNode::Added(_)) => stats.added += 1,
            DiffTree::Node(DiffNode::Removed(_)) => stats.removed += 1,
            DiffTree::Node(DiffNode::Updated { .. }) => stats.updated += 1,
            DiffTree::Array(items) => items.iter().for_each(|sub| sub.collect_stats(stats)),
            DiffTree::Object(entries) => entries.iter().for_each(|(_, sub)| sub.collect_stats(stats)),
        }
    }
}

impl From<DiffNode> for DiffTree {
    fn from(node: DiffNode) -> Self {
        DiffTree::Node(node)
    }
}

/// Statistics about the diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DiffStats {
    /// Number of unchanged positions
    pub common: usize,
    /// Number of added positions
    pub added: usize,
    /// Number of removed positions
    pub removed: usize,
    /// Number of updated positions
    pub updated: usize,
}

impl DiffStats {
    /// Creates a new DiffStats with all counts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of changes (excluding common positions).
    pub fn total_changes(&self) -> usize {
        self.added + self.removed + self.updated
    }

    /// Returns true if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }
}

/// Returns true if the diff contains any added, removed, or updated position.
pub fn is_modified(diff: &DiffTree) -> bool {
    diff.is_modified()
}

/// Computes the diff of `actual` (the new value) against `base` (the baseline).
///
/// # Arguments
///
/// * `actual` - The new value, e.g. a freshly fetched configuration
/// * `base` - The baseline, e.g. the last synced snapshot
///
/// # Returns
///
/// Returns a [`DiffTree`]. Comparing a value with itself yields a tree
/// made of `Common` nodes only.
///
/// # Examples
///
/// ```
/// use treesync::{compare, DiffNode, DiffTree, Node};
///
/// let diff = compare(&Node::Number(43.0), &Node::Number(42.0));
/// assert_eq!(
///     diff,
///     DiffTree::Node(DiffNode::Updated {
///         value: Node::Number(43.0),
///         old_value: Node::Number(42.0),
///     })
/// );
/// ```
pub fn compare(actual: &Node, base: &Node) -> DiffTree {
    match (actual, base) {
        (Node::Array(actual_items), Node::Array(base_items)) => {
            DiffTree::Array(compare_arrays(actual_items, base_items))
        }
        (Node::Object(actual_map), Node::Object(base_map)) => {
            DiffTree::Object(compare_objects(actual_map, base_map))
        }
        _ if actual.is_scalar() && base.is_scalar() && actual.equals(base) => {
            DiffNode::Common(actual.clone()).into()
        }
        _ => DiffNode::Updated {
            value: actual.clone(),
            old_value: base.clone(),
        }
        .into(),
    }
}

/// Compares two possibly absent slots, as found under an object key.
fn compare_slot(actual: Option<&Node>, base: Option<&Node>) -> Option<DiffTree> {
    match (actual, base) {
        (None, None) => None,
        (None, Some(base)) => Some(DiffNode::Removed(base.clone()).into()),
        (Some(actual), None) => Some(DiffNode::Added(actual.clone()).into()),
        (Some(actual), Some(base)) => Some(compare(actual, base)),
    }
}

/// Compares two objects key by key.
///
/// Baseline keys are visited first, in baseline order, then the keys only
/// present in `actual`, in their own order.
fn compare_objects(actual: &Map, base: &Map) -> Vec<(String, DiffTree)> {
    let mut entries = Vec::with_capacity(base.len().max(actual.len()));

    for (key, base_value) in base.iter() {
        if let Some(sub) = compare_slot(actual.get(key), Some(base_value)) {
            entries.push((key.to_string(), sub));
        }
    }

    for (key, actual_value) in actual.iter() {
        if base.contains_key(key) {
            continue;
        }
        if let Some(sub) = compare_slot(Some(actual_value), None) {
            entries.push((key.to_string(), sub));
        }
    }

    entries
}

/// Aligns two arrays on their longest common subsequence.
///
/// For every anchor (and a final virtual anchor past the end), baseline
/// elements before the anchor are paired with the next unconsumed element of
/// `actual` when that element is not the anchor itself, producing a nested
/// comparison; unpaired baseline elements are removals. Leftover `actual`
/// elements before the anchor are additions.
fn compare_arrays(actual: &[Node], base: &[Node]) -> Vec<DiffTree> {
    let anchors = lcs(actual, base);
    tracing::trace!(
        actual_len = actual.len(),
        base_len = base.len(),
        common = anchors.len(),
        "aligned arrays"
    );

    let is_anchor = |anchor: Option<&Node>, item: &Node| anchor.is_some_and(|a| a.equals(item));

    let mut diff = Vec::with_capacity(actual.len().max(base.len()));
    let (mut ai, mut bi) = (0, 0);

    for k in 0..=anchors.len() {
        let anchor = anchors.get(k);

        while bi < base.len() && !is_anchor(anchor, &base[bi]) {
            if ai < actual.len() && !is_anchor(anchor, &actual[ai]) {
                diff.push(compare(&actual[ai], &base[bi]));
                ai += 1;
            } else {
                diff.push(DiffNode::Removed(base[bi].clone()).into());
            }
            bi += 1;
        }

        while ai < actual.len() && !is_anchor(anchor, &actual[ai]) {
            diff.push(DiffNode::Added(actual[ai].clone()).into());
            ai += 1;
        }

        if let Some(anchor) = anchor {
            diff.push(DiffNode::Common(anchor.clone()).into());
            ai += 1;
            bi += 1;
        }
    }

    diff
}
