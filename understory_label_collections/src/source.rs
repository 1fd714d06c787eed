// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam to whatever parses label files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use understory_label_index::LabelInput;

use crate::error::SourceError;

/// Produces label records for a configured path.
///
/// File formats are the loader's business; this crate only builds and serves indexes.
/// Any `Fn(&Path) -> Result<Vec<LabelInput>, SourceError>` closure is a source.
pub trait LabelSource {
    /// Load every record stored at `path`.
    fn load(&self, path: &Path) -> Result<Vec<LabelInput>, SourceError>;
}

impl<F> LabelSource for F
where
    F: Fn(&Path) -> Result<Vec<LabelInput>, SourceError>,
{
    fn load(&self, path: &Path) -> Result<Vec<LabelInput>, SourceError> {
        self(path)
    }
}

/// A source backed by records held in memory, keyed by path.
///
/// Useful for tests and for data generated at runtime. Replacing the records for a path
/// and then reloading the matching collections mimics a label file being rewritten.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<HashMap<PathBuf, Vec<LabelInput>>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `records` under `path`, replacing what was there.
    pub fn insert(&self, path: impl Into<PathBuf>, records: Vec<LabelInput>) {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.insert(path.into(), records);
    }

    /// Forget the records under `path`.
    pub fn remove(&self, path: &Path) {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.remove(path);
    }
}

impl LabelSource for MemorySource {
    fn load(&self, path: &Path) -> Result<Vec<LabelInput>, SourceError> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no records for {}", path.display()).into())
    }
}
