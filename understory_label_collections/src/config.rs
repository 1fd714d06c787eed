// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Endpoint configuration: which label files are served under which names.
//!
//! The configuration is a JSON array:
//!
//! ```json
//! [
//!   { "name": "city", "path": "data/city.labels" },
//!   { "name": "peaks", "path": "/srv/labels/peaks.labels" }
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CollectionsError;

/// One named label collection and the file it is loaded from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Name the collection is served under.
    pub name: String,
    /// Path handed to the [`LabelSource`](crate::LabelSource).
    pub path: PathBuf,
}

impl EndpointConfig {
    /// Create a configuration entry.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Whether this entry is loaded from `path`, ignoring a leading `./` on either side.
    pub fn serves_path(&self, path: &Path) -> bool {
        normalize(&self.path) == normalize(path)
    }
}

fn normalize(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}

/// Parse endpoint configuration from JSON text. An empty list is an error.
pub fn parse_endpoint_configs(json: &str) -> Result<Vec<EndpointConfig>, CollectionsError> {
    let configs: Vec<EndpointConfig> =
        serde_json::from_str(json).map_err(CollectionsError::ConfigParse)?;
    if configs.is_empty() {
        return Err(CollectionsError::NoEndpoints);
    }
    Ok(configs)
}

/// Read and parse an endpoint configuration file.
pub fn load_endpoint_configs(path: &Path) -> Result<Vec<EndpointConfig>, CollectionsError> {
    let json = std::fs::read_to_string(path).map_err(|source| CollectionsError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse_endpoint_configs(&json)
}
