//! Longest-common-subsequence alignment of two sequences.
//!
//! [`align`] turns two sequences and an equality predicate into a list of
//! edits in output order. Between two kept elements, every removal comes
//! before every insertion, so a region where both sides diverge reads as
//! "old lines, then new lines", the way a unified diff does.

/// One step of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// `left[left]` and `right[right]` match
    Keep { left: usize, right: usize },
    /// `left[i]` has no counterpart
    Remove(usize),
    /// `right[j]` has no counterpart
    Insert(usize),
}

impl Edit {
    pub fn is_keep(&self) -> bool {
        matches!(self, Edit::Keep { .. })
    }
}

/// Index pairs of a longest common subsequence, in increasing order.
///
/// Ties are resolved towards the earliest match on both sides.
pub fn lcs_pairs<L, R, F>(left: &[L], right: &[R], eq: F) -> Vec<(usize, usize)>
where
    F: Fn(&L, &R) -> bool,
{
    let (n, m) = (left.len(), right.len());
    // suffix[i][j] = LCS length of left[i..] and right[j..]
    let mut suffix = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            suffix[i][j] = if eq(&left[i], &right[j]) {
                suffix[i + 1][j + 1] + 1
            } else {
                suffix[i + 1][j].max(suffix[i][j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(suffix[0][0]);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if eq(&left[i], &right[j]) {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if suffix[i + 1][j] >= suffix[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

/// Align `left` against `right`.
pub fn align<L, R, F>(left: &[L], right: &[R], eq: F) -> Vec<Edit>
where
    F: Fn(&L, &R) -> bool,
{
    let mut edits = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    for (left_anchor, right_anchor) in lcs_pairs(left, right, eq) {
        edits.extend((i..left_anchor).map(Edit::Remove));
        edits.extend((j..right_anchor).map(Edit::Insert));
        edits.push(Edit::Keep {
            left: left_anchor,
            right: right_anchor,
        });
        i = left_anchor + 1;
        j = right_anchor + 1;
    }
    edits.extend((i..left.len()).map(Edit::Remove));
    edits.extend((j..right.len()).map(Edit::Insert));
    edits
}
