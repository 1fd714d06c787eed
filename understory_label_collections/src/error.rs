// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for configuring, loading, and querying collections.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use understory_label_index::BuildError;

/// Boxed error returned by a [`LabelSource`](crate::LabelSource).
pub type SourceError = Box<dyn Error + Send + Sync + 'static>;

/// Errors raised by [`Collections`](crate::Collections) and endpoint configuration.
#[derive(Debug)]
pub enum CollectionsError {
    /// The endpoint configuration could not be read.
    ConfigIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The endpoint configuration is not valid JSON of the expected shape.
    ConfigParse(serde_json::Error),
    /// The configuration lists no endpoints.
    NoEndpoints,
    /// The label source failed to produce records for a collection.
    Load {
        /// Collection name.
        name: String,
        /// Underlying source error.
        source: SourceError,
    },
    /// Records were loaded but the index could not be built.
    Build {
        /// Collection name.
        name: String,
        /// Underlying build error.
        source: BuildError,
    },
    /// No collection with this name is configured.
    UnknownCollection(String),
    /// The collection is configured but has no valid index yet.
    Unavailable(String),
}

impl fmt::Display for CollectionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigIo { path, .. } => {
                write!(f, "cannot read endpoint configuration {}", path.display())
            }
            Self::ConfigParse(_) => f.write_str("cannot parse endpoint configuration"),
            Self::NoEndpoints => f.write_str("no endpoints configured"),
            Self::Load { name, .. } => write!(f, "cannot load labels for collection {name:?}"),
            Self::Build { name, .. } => write!(f, "cannot build index for collection {name:?}"),
            Self::UnknownCollection(name) => write!(f, "no collection named {name:?}"),
            Self::Unavailable(name) => write!(f, "collection {name:?} has no valid index"),
        }
    }
}

impl Error for CollectionsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigParse(source) => Some(source),
            Self::Load { source, .. } => Some(source.as_ref()),
            Self::Build { source, .. } => Some(source),
            Self::NoEndpoints | Self::UnknownCollection(_) | Self::Unavailable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_chain_their_cause() {
        let err = CollectionsError::Build {
            name: "city".into(),
            source: BuildError::EmptyDataset,
        };
        assert_eq!(err.to_string(), "cannot build index for collection \"city\"");
        let cause = err.source().unwrap();
        assert_eq!(
            cause.to_string(),
            "cannot build a label index from an empty dataset"
        );
    }

    #[test]
    fn plain_variants_have_no_source() {
        assert!(CollectionsError::NoEndpoints.source().is_none());
        assert!(
            CollectionsError::UnknownCollection("x".into())
                .source()
                .is_none()
        );
    }
}
