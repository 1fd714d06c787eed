// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range queries over a [`LabelIndex`].

use alloc::vec;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::label::Label;
use crate::tree::{Kind, LabelIndex, NodeIdx};
use crate::types::QueryWindow;

/// Traversal stack; balanced trees rarely need more than this many pending nodes.
type Stack = SmallVec<[NodeIdx; 64]>;

/// The labels matched by one query, in traversal order.
///
/// Borrows the index it came from, so it cannot outlive it. Use
/// [`Matches::to_owned_labels`] to hand results to code that must not alias the index.
#[derive(Clone, Debug, Default)]
pub struct Matches<'a> {
    labels: Vec<&'a Label>,
}

impl<'a> Matches<'a> {
    /// Number of matched labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over the matches in traversal order.
    pub fn iter(&self) -> core::iter::Copied<core::slice::Iter<'_, &'a Label>> {
        self.labels.iter().copied()
    }

    /// The matches as a slice.
    pub fn as_slice(&self) -> &[&'a Label] {
        &self.labels
    }

    /// Deep-copy the matched records, text included.
    pub fn to_owned_labels(&self) -> Vec<Label> {
        self.labels.iter().map(|&l| l.clone()).collect()
    }
}

impl<'a> IntoIterator for Matches<'a> {
    type Item = &'a Label;
    type IntoIter = vec::IntoIter<&'a Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.into_iter()
    }
}

impl<'a, 'm> IntoIterator for &'m Matches<'a> {
    type Item = &'a Label;
    type IntoIter = core::iter::Copied<core::slice::Iter<'m, &'a Label>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl LabelIndex {
    /// Every label with `t >= window.min_t` inside the window's rectangle (bounds inclusive).
    ///
    /// The result is exact, and for a given index and window always comes back in the same
    /// order: each node's own labels before its left subtree, left subtree before right.
    pub fn query(&self, window: &QueryWindow) -> Matches<'_> {
        let mut labels = Vec::new();
        self.query_into(window, &mut labels);
        Matches { labels }
    }

    /// Like [`query`](Self::query), but appends to a caller-owned buffer.
    pub fn query_into<'a>(&'a self, window: &QueryWindow, out: &mut Vec<&'a Label>) {
        self.visit(window, |label| out.push(label));
    }

    /// Number of labels [`query`](Self::query) would return.
    pub fn count(&self, window: &QueryWindow) -> usize {
        let mut n = 0;
        self.visit(window, |_| n += 1);
        n
    }

    fn visit<'a>(&'a self, window: &QueryWindow, mut emit: impl FnMut(&'a Label)) {
        if window.is_empty() || self.arena.is_empty() {
            return;
        }
        let mut stack = Stack::new();
        stack.push(NodeIdx::new(0));
        while let Some(idx) = stack.pop() {
            let node = &self.arena[idx.get()];
            // max_t is an exact upper bound for the whole subtree.
            if node.max_t < window.min_t || !window.intersects(node.bounds) {
                continue;
            }
            for label in &self.labels[node.own()] {
                if window.contains(label) {
                    emit(label);
                }
            }
            if let Kind::Split { left, right, .. } = node.kind {
                // Right first so the left subtree is popped first.
                stack.extend(right);
                stack.extend(left);
            }
        }
    }
}

/// Brute-force scan of `labels` against `window`, in slice order.
///
/// Reference answer for [`LabelIndex::query`]: both return the same set of labels.
pub fn scan<'a>(labels: &'a [Label], window: &QueryWindow) -> Vec<&'a Label> {
    if window.is_empty() {
        return Vec::new();
    }
    labels.iter().filter(|l| window.contains(l)).collect()
}
