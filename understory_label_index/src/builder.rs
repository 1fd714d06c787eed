// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulk construction of a [`LabelIndex`].

use alloc::vec::Vec;

use crate::error::BuildError;
use crate::label::{Label, LabelInput};
use crate::tree::{Kind, LabelIndex, Node, NodeIdx};
use crate::types::{Axis, EMPTY_BOUNDS, union_bounds, union_point};

/// Tuning knobs for [`IndexBuilder`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BuildOptions {
    /// Spans of at most this many labels become a single leaf bucket.
    ///
    /// Values below `1` are treated as `1`, which gives one label per node.
    pub bucket_size: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { bucket_size: 8 }
    }
}

/// Builds a [`LabelIndex`] from a complete set of records in one pass.
///
/// Each level selects the median along the level's axis (x at even depths, y at odd
/// depths) with an in-place partition, so a build costs `O(n log n)` expected time and
/// sibling subtrees differ in size by at most one.
#[derive(Clone, Debug, Default)]
pub struct IndexBuilder {
    options: BuildOptions,
}

impl IndexBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the build options.
    #[must_use]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Options this builder will use.
    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Validate `inputs` and build an index from them.
    ///
    /// Fails with [`BuildError::EmptyDataset`] for an empty collection and with
    /// [`BuildError::MalformedRecord`] naming the first record with a non-finite
    /// coordinate or time, or with missing text. No tree is produced on failure.
    pub fn build(&self, inputs: Vec<LabelInput>) -> Result<LabelIndex, BuildError> {
        let result = self.try_build(inputs);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "label index build failed");
        }
        result
    }

    fn try_build(&self, inputs: Vec<LabelInput>) -> Result<LabelIndex, BuildError> {
        if inputs.is_empty() {
            return Err(BuildError::EmptyDataset);
        }
        let mut labels = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                input
                    .into_label()
                    .map_err(|reason| BuildError::MalformedRecord { index, reason })
            })
            .collect::<Result<Vec<Label>, _>>()?;
        Ok(self.build_valid(&mut labels).finish(labels))
    }

    fn build_valid(&self, labels: &mut [Label]) -> Partial {
        let bucket_size = self.options.bucket_size.max(1);
        let mut partial = Partial {
            arena: Vec::with_capacity(node_estimate(labels.len(), bucket_size)),
            depth: 0,
            bucket_size,
        };
        partial.build_node(labels, 0, 0, Axis::at_depth(0));
        partial
    }
}

/// Upper bound on nodes for `n >= 1` labels.
///
/// Every node holds at least one label, and leaves below a split hold at least
/// `bucket_size / 2` of them.
fn node_estimate(n: usize, bucket_size: usize) -> usize {
    (2 * n / (bucket_size / 2).max(1)).clamp(1, n.max(1))
}

/// Arena under construction; turned into a [`LabelIndex`] once every label is placed.
struct Partial {
    arena: Vec<Node>,
    depth: usize,
    bucket_size: usize,
}

impl Partial {
    /// Build the subtree for `span`, whose first label is `labels[offset]` in the final array.
    ///
    /// The node is pushed with seed aggregates before its children so the arena stays in
    /// pre-order, then the aggregates are filled in on the way back up.
    fn build_node(
        &mut self,
        span: &mut [Label],
        offset: usize,
        depth: usize,
        axis: Axis,
    ) -> NodeIdx {
        let idx = NodeIdx::new(self.arena.len());
        self.depth = self.depth.max(depth + 1);
        self.arena.push(Node {
            bounds: EMPTY_BOUNDS,
            max_t: f64::NEG_INFINITY,
            axis,
            start: offset,
            end: offset + span.len(),
            kind: Kind::Leaf,
        });

        let mut bounds = EMPTY_BOUNDS;
        let mut max_t = f64::NEG_INFINITY;

        if span.len() <= self.bucket_size {
            for label in span.iter() {
                bounds = union_point(bounds, label.position());
                max_t = max_t.max(label.t());
            }
        } else {
            let mid = span.len() / 2;
            let (lo, median, hi) = span.select_nth_unstable_by(mid, |a, b| axis.cmp_labels(a, b));
            bounds = union_point(bounds, median.position());
            max_t = max_t.max(median.t());

            let (next, below) = (depth + 1, axis.flip());
            let left = (!lo.is_empty()).then(|| self.build_node(lo, offset, next, below));
            let right =
                (!hi.is_empty()).then(|| self.build_node(hi, offset + mid + 1, next, below));
            for child in [left, right].into_iter().flatten() {
                let child = &self.arena[child.get()];
                bounds = union_bounds(bounds, child.bounds);
                max_t = max_t.max(child.max_t);
            }
            self.arena[idx.get()].kind = Kind::Split {
                mid: offset + mid,
                left,
                right,
            };
        }

        let node = &mut self.arena[idx.get()];
        node.bounds = bounds;
        node.max_t = max_t;
        idx
    }

    fn finish(self, labels: Vec<Label>) -> LabelIndex {
        tracing::debug!(
            labels = labels.len(),
            nodes = self.arena.len(),
            depth = self.depth,
            bucket_size = self.bucket_size,
            "built label index"
        );
        LabelIndex {
            labels,
            arena: self.arena,
            depth: self.depth,
            bucket_size: self.bucket_size,
        }
    }
}
