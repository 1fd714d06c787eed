// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The read-only spatial-priority tree produced by [`IndexBuilder`](crate::IndexBuilder).
//!
//! Nodes live in a pre-order arena. Every node covers a contiguous span of the
//! label array; builds reorder labels so that a split node's label sits between
//! its left span and its right span.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

use crate::error::{InvariantKind, InvariantViolation};
use crate::label::Label;
use crate::types::{Axis, EMPTY_BOUNDS, union_bounds, union_point};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Kind {
    /// A bucket of up to `bucket_size` labels, all of the node's span.
    Leaf,
    /// One label at `mid`, left span `start..mid`, right span `mid + 1..end`.
    Split {
        mid: usize,
        left: Option<NodeIdx>,
        right: Option<NodeIdx>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) bounds: Rect,
    pub(crate) max_t: f64,
    pub(crate) axis: Axis,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) kind: Kind,
}

impl Node {
    /// Range of labels stored in this node itself (not in its children).
    #[inline]
    pub(crate) fn own(&self) -> core::ops::Range<usize> {
        match self.kind {
            Kind::Leaf => self.start..self.end,
            Kind::Split { mid, .. } => mid..mid + 1,
        }
    }
}

/// A static index over label records, answering `(min_t, rectangle)` range queries.
///
/// Built once by [`IndexBuilder`](crate::IndexBuilder) and immutable afterwards. There are no
/// mutating methods, so a shared `&LabelIndex` can be queried from many threads at once.
pub struct LabelIndex {
    pub(crate) labels: Vec<Label>,
    pub(crate) arena: Vec<Node>,
    pub(crate) depth: usize,
    pub(crate) bucket_size: usize,
}

impl LabelIndex {
    /// Number of label records.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a built index; builds reject empty datasets.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of tree nodes.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of levels, counting the root as one.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Leaf bucket threshold used by the build.
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Bounding box of every label.
    pub fn bounds(&self) -> Rect {
        self.arena.first().map_or(EMPTY_BOUNDS, |n| n.bounds)
    }

    /// Largest elimination time of any label.
    pub fn max_t(&self) -> f64 {
        self.arena.first().map_or(f64::NEG_INFINITY, |n| n.max_t)
    }

    /// All records, in tree order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The root node.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.node_ref(Some(NodeIdx::new(0)))
    }

    fn node_ref(&self, idx: Option<NodeIdx>) -> Option<NodeRef<'_>> {
        let idx = idx?;
        self.arena.get(idx.get()).map(|node| NodeRef {
            index: self,
            node,
            idx,
        })
    }

    /// Check every structural invariant of the tree.
    ///
    /// Verifies, for every node, that the bounding box and max-t aggregates are exact, that
    /// labels are partitioned around each split label, that child subtree sizes differ by at
    /// most one, and that the nodes cover each record exactly once.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut seen = vec![0_u8; self.labels.len()];
        if !self.arena.is_empty() {
            self.validate_node(NodeIdx::new(0), &mut seen)?;
        }
        if seen.iter().any(|&n| n != 1) {
            return Err(InvariantViolation {
                node: 0,
                kind: InvariantKind::Coverage,
            });
        }
        Ok(())
    }

    fn validate_node(&self, idx: NodeIdx, seen: &mut [u8]) -> Result<(), InvariantViolation> {
        let node = &self.arena[idx.get()];
        let fail = |kind| InvariantViolation {
            node: idx.get(),
            kind,
        };
        if node.start >= node.end || node.end > self.labels.len() {
            return Err(fail(InvariantKind::Coverage));
        }

        let mut bounds = EMPTY_BOUNDS;
        let mut max_t = f64::NEG_INFINITY;
        for i in node.own() {
            seen[i] = seen[i].saturating_add(1);
            let label = &self.labels[i];
            bounds = union_point(bounds, label.position());
            max_t = max_t.max(label.t());
        }

        if let Kind::Split { mid, left, right } = node.kind {
            let split = &self.labels[mid];
            let left_len = mid - node.start;
            let right_len = node.end - mid - 1;
            if left_len.abs_diff(right_len) > 1 {
                return Err(fail(InvariantKind::Balance));
            }
            let left_ok = self.labels[node.start..mid]
                .iter()
                .all(|l| node.axis.cmp_labels(l, split).is_le());
            let right_ok = self.labels[mid + 1..node.end]
                .iter()
                .all(|l| node.axis.cmp_labels(l, split).is_ge());
            if !left_ok || !right_ok {
                return Err(fail(InvariantKind::Partition));
            }
            for (child, len) in [(left, left_len), (right, right_len)] {
                match child {
                    Some(c) => {
                        self.validate_node(c, seen)?;
                        let child = &self.arena[c.get()];
                        if child.end - child.start != len {
                            return Err(fail(InvariantKind::Coverage));
                        }
                        bounds = union_bounds(bounds, child.bounds);
                        max_t = max_t.max(child.max_t);
                    }
                    None if len != 0 => return Err(fail(InvariantKind::Coverage)),
                    None => {}
                }
            }
        }

        if bounds != node.bounds {
            return Err(fail(InvariantKind::Bounds));
        }
        // Exact comparison on purpose: the aggregate must equal one of the stored t values.
        if max_t.to_bits() != node.max_t.to_bits() {
            return Err(fail(InvariantKind::MaxT));
        }
        Ok(())
    }
}

impl fmt::Debug for LabelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelIndex")
            .field("labels", &self.labels.len())
            .field("nodes", &self.arena.len())
            .field("depth", &self.depth)
            .field("bucket_size", &self.bucket_size)
            .finish_non_exhaustive()
    }
}

/// Borrowed view of one tree node.
#[derive(Copy, Clone)]
pub struct NodeRef<'a> {
    index: &'a LabelIndex,
    node: &'a Node,
    idx: NodeIdx,
}

impl<'a> NodeRef<'a> {
    /// Arena position of this node; the root is `0`.
    pub fn id(&self) -> usize {
        self.idx.get()
    }

    /// Bounding box of every label in this subtree.
    pub fn bounds(&self) -> Rect {
        self.node.bounds
    }

    /// Largest elimination time in this subtree.
    pub fn max_t(&self) -> f64 {
        self.node.max_t
    }

    /// Split axis for this node's depth.
    pub fn axis(&self) -> Axis {
        self.node.axis
    }

    /// Whether this node is a leaf bucket.
    pub fn is_leaf(&self) -> bool {
        matches!(self.node.kind, Kind::Leaf)
    }

    /// Labels stored in this node itself: the split label, or the whole bucket for a leaf.
    pub fn labels(&self) -> &'a [Label] {
        &self.index.labels[self.node.own()]
    }

    /// Number of labels in this subtree.
    pub fn subtree_len(&self) -> usize {
        self.node.end - self.node.start
    }

    /// Left child (labels at or below the split coordinate).
    pub fn left(&self) -> Option<Self> {
        match self.node.kind {
            Kind::Split { left, .. } => self.index.node_ref(left),
            Kind::Leaf => None,
        }
    }

    /// Right child (labels at or above the split coordinate).
    pub fn right(&self) -> Option<Self> {
        match self.node.kind {
            Kind::Split { right, .. } => self.index.node_ref(right),
            Kind::Leaf => None,
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.idx.get())
            .field("bounds", &self.node.bounds)
            .field("max_t", &self.node.max_t)
            .field("axis", &self.node.axis)
            .field("leaf", &self.is_leaf())
            .finish_non_exhaustive()
    }
}
