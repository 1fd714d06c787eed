// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build and validation errors.

use core::fmt;

/// Why a single input record was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MalformedReason {
    /// The x coordinate is NaN or infinite.
    NonFiniteX,
    /// The y coordinate is NaN or infinite.
    NonFiniteY,
    /// The elimination time is NaN or infinite.
    NonFiniteT,
    /// The record carries no label text.
    MissingText,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NonFiniteX => "x coordinate is not finite",
            Self::NonFiniteY => "y coordinate is not finite",
            Self::NonFiniteT => "elimination time is not finite",
            Self::MissingText => "label text is missing",
        })
    }
}

/// Error returned when an index cannot be built.
///
/// Builds are atomic: on error no tree exists, and nothing of the input is retained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// The input collection contained no records.
    EmptyDataset,
    /// A record failed validation.
    MalformedRecord {
        /// Position of the first offending record in the input collection.
        index: usize,
        /// What was wrong with it.
        reason: MalformedReason,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDataset => f.write_str("cannot build a label index from an empty dataset"),
            Self::MalformedRecord { index, reason } => {
                write!(f, "malformed label record at index {index}: {reason}")
            }
        }
    }
}

impl core::error::Error for BuildError {}

/// Which structural property a node failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// The stored bounding box differs from the union of the subtree's points.
    Bounds,
    /// The stored max-t differs from the maximum t of the subtree.
    MaxT,
    /// A label sits on the wrong side of its ancestor's split.
    Partition,
    /// Sibling subtree sizes differ by more than one.
    Balance,
    /// The number of stored labels differs from the number of records.
    Coverage,
}

/// A broken structural invariant found by [`LabelIndex::validate`](crate::LabelIndex::validate).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Arena position of the offending node.
    pub node: usize,
    /// The property that does not hold.
    pub kind: InvariantKind,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            InvariantKind::Bounds => "bounding box is not the exact union of its subtree",
            InvariantKind::MaxT => "max-t is not the exact maximum of its subtree",
            InvariantKind::Partition => "subtree is not partitioned around the split label",
            InvariantKind::Balance => "child subtree sizes differ by more than one",
            InvariantKind::Coverage => "stored labels do not cover every record exactly once",
        };
        write!(f, "node {}: {what}", self.node)
    }
}

impl core::error::Error for InvariantViolation {}
