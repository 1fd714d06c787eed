// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_label_index --heading-base-level=0

//! Understory Label Index: a static spatial-priority index for map labels.
//!
//! Each label is a point with an elimination time `t`: the label stays visible for
//! every query threshold at or below `t`. The index answers
//! "which labels lie inside this rectangle and have `t >= min_t`?" exactly, fast enough
//! to rerun on every frame of an interactive map.
//!
//! - Bulk-build once from a complete label set with [`IndexBuilder`]; the result is an
//!   immutable [`LabelIndex`].
//! - Query with a [`QueryWindow`] and get back [`Matches`], borrowed from the index.
//! - Wrap build attempts in an [`IndexHandle`] when a loader needs a validity flag.
//!
//! # Example
//!
//! ```rust
//! use understory_label_index::{IndexBuilder, LabelInput, QueryWindow};
//!
//! let index = IndexBuilder::new()
//!     .build(vec![
//!         LabelInput::new(0.0, 0.0, 5.0, 1, "A"),
//!         LabelInput::new(10.0, 10.0, 1.0, 2, "B"),
//!         LabelInput::new(5.0, 5.0, 3.0, 3, "C"),
//!     ])
//!     .unwrap();
//!
//! // B is inside the window but drops out at t = 2.
//! let hits = index.query(&QueryWindow::new(2.0, 0.0, 10.0, 0.0, 10.0));
//! let mut names: Vec<_> = hits.iter().map(|l| l.text()).collect();
//! names.sort();
//! assert_eq!(names, ["A", "C"]);
//! ```
//!
//! ## How it works
//!
//! The tree is a static k-d tree: each level splits its labels at the median along x
//! (even depths) or y (odd depths), down to leaf buckets of at most
//! [`BuildOptions::bucket_size`] labels. Every node also stores the exact bounding box
//! and the exact maximum `t` of its subtree. A query skips any subtree whose max-`t` is
//! below the threshold or whose box misses the window, which makes typical viewport
//! queries close to `O(log n + k)` for `k` matches. The worst case, when nothing can be
//! pruned, is a full `O(n)` walk.
//!
//! Results come back in a fixed order for a given index and window (pre-order, left
//! subtree before right), which keeps tests reproducible. The order has no other meaning.
//!
//! ## Float semantics
//!
//! Label coordinates and times must be finite; builds reject anything else with
//! [`BuildError::MalformedRecord`]. Query windows may be anything: inverted ranges and
//! NaN bounds simply match nothing.

#![no_std]

extern crate alloc;

mod builder;
mod error;
mod handle;
mod label;
mod query;
mod tree;
mod types;

pub use builder::{BuildOptions, IndexBuilder};
pub use error::{BuildError, InvariantKind, InvariantViolation, MalformedReason};
pub use handle::{IndexHandle, IndexStatus};
pub use label::{Label, LabelInput};
pub use query::{Matches, scan};
pub use tree::{LabelIndex, NodeRef};
pub use types::{Axis, QueryWindow};
