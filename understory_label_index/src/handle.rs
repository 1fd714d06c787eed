// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An owned handle around a build attempt and its validity flag.

use alloc::vec::Vec;

use crate::builder::{BuildOptions, IndexBuilder};
use crate::error::BuildError;
use crate::label::LabelInput;
use crate::tree::LabelIndex;

/// Outcome of a build attempt, fixed for the lifetime of the handle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum IndexStatus<'a> {
    /// The index is built and may be queried.
    Ready {
        /// Number of indexed labels.
        len: usize,
    },
    /// The build failed; there is nothing to query.
    Failed(&'a BuildError),
}

/// Owns the result of one build attempt.
///
/// This is what a loader keeps around: a build never fails to produce a handle, and
/// [`is_good`](Self::is_good) tells whether it holds a queryable index. Queries need a
/// [`&LabelIndex`](LabelIndex), which only a good handle hands out.
#[derive(Debug)]
pub struct IndexHandle {
    inner: Result<LabelIndex, BuildError>,
}

impl IndexHandle {
    /// Build from `inputs` with `options`, recording success or failure.
    pub fn build(inputs: Vec<LabelInput>, options: BuildOptions) -> Self {
        IndexBuilder::new().with_options(options).build(inputs).into()
    }

    /// Whether the build succeeded.
    pub fn is_good(&self) -> bool {
        self.inner.is_ok()
    }

    /// Status of the build attempt.
    pub fn status(&self) -> IndexStatus<'_> {
        match &self.inner {
            Ok(index) => IndexStatus::Ready { len: index.len() },
            Err(err) => IndexStatus::Failed(err),
        }
    }

    /// The index, if the build succeeded.
    pub fn get(&self) -> Option<&LabelIndex> {
        self.inner.as_ref().ok()
    }

    /// The build error, if the build failed.
    pub fn error(&self) -> Option<&BuildError> {
        self.inner.as_ref().err()
    }

    /// Consume the handle.
    pub fn into_result(self) -> Result<LabelIndex, BuildError> {
        self.inner
    }
}

impl From<Result<LabelIndex, BuildError>> for IndexHandle {
    fn from(inner: Result<LabelIndex, BuildError>) -> Self {
        Self { inner }
    }
}

impl From<LabelIndex> for IndexHandle {
    fn from(index: LabelIndex) -> Self {
        Self { inner: Ok(index) }
    }
}
