//! Longest common subsequence over node sequences.
//!
//! Used by [`crate::diff::compare`] to find the anchor elements two arrays
//! share. The table is filled from the end of both sequences so the
//! reconstruction can walk forward, which keeps the chosen alignment stable
//! across runs.

use crate::tree::Node;

/// Returns the longest subsequence of values present, in order, in both `a` and `b`.
///
/// Elements are compared with structural equality ([`Node::equals`]).
///
/// # Examples
///
/// ```
/// use treesync::{lcs, Node};
///
/// let a = vec![Node::Number(1.0), Node::Number(2.0), Node::Number(3.0)];
/// let b = vec![Node::Number(1.0), Node::Number(3.0), Node::Number(4.0)];
/// assert_eq!(lcs(&a, &b), vec![Node::Number(1.0), Node::Number(3.0)]);
/// ```
pub fn lcs(a: &[Node], b: &[Node]) -> Vec<Node> {
    lcs_by(a, b, Node::equals)
}

/// Longest common subsequence with a caller-supplied equality predicate.
///
/// When several maximal subsequences exist the walk always prefers keeping
/// the earliest unmatched element of `a` in play: on a tie it advances `b`.
pub fn lcs_by<T, F>(a: &[T], b: &[T], eq: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return Vec::new();
    }

    // table[i][j] holds the LCS length of a[i..] and b[j..]
    let width = m + 1;
    let mut table = vec![0usize; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if eq(&a[i], &b[j]) {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut result = Vec::with_capacity(table[0]);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if eq(&a[i], &b[j]) {
            result.push(a[i].clone());
            i += 1;
            j += 1;
        } else if table[i * width + j + 1] >= table[(i + 1) * width + j] {
            j += 1;
        } else {
            i += 1;
        }
    }
    result
}
