// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_label_collections --heading-base-level=0

//! Understory Label Collections: serve several label indexes by name.
//!
//! A label service usually hosts more than one dataset (cities, peaks, streets) and
//! replaces a dataset when its file is rewritten. This crate holds that state:
//!
//! - [`EndpointConfig`] maps collection names to label files, read from JSON with
//!   [`load_endpoint_configs`].
//! - A [`LabelSource`] turns a path into records. Parsing label files is left to the
//!   caller; [`MemorySource`] and plain closures cover tests and generated data.
//! - [`Collections`] builds one [`LabelIndex`](understory_label_index::LabelIndex) per
//!   collection, answers queries by name, and reloads collections atomically.
//!
//! # Example
//!
//! ```rust
//! use understory_label_collections::{Collections, EndpointConfig, MemorySource};
//! use understory_label_index::{LabelInput, QueryWindow};
//!
//! let source = MemorySource::new();
//! source.insert("city.labels", vec![
//!     LabelInput::new(0.0, 0.0, 5.0, 1, "A"),
//!     LabelInput::new(10.0, 10.0, 1.0, 2, "B"),
//! ]);
//!
//! let collections = Collections::new([EndpointConfig::new("city", "city.labels")], source);
//! assert_eq!(collections.names(), ["city"]);
//!
//! let labels = collections
//!     .query("city", &QueryWindow::new(2.0, 0.0, 10.0, 0.0, 10.0))
//!     .unwrap();
//! assert_eq!(labels.len(), 1);
//! assert_eq!(labels[0].text(), "A");
//! ```
//!
//! Failed loads and reloads are reported through `tracing`; install a subscriber to see them.

mod collections;
mod config;
mod error;
mod source;

pub use collections::Collections;
pub use config::{EndpointConfig, load_endpoint_configs, parse_endpoint_configs};
pub use error::{CollectionsError, SourceError};
pub use source::{LabelSource, MemorySource};
