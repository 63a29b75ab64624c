// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Tool settings
//!
//! Loaded from `mp-builder.toml`, either at an explicit path or in the user
//! config directory. Every field is optional in the file; command-line flags
//! override what the file says.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::errors::{MpBuilderError, MpBuilderResult};
use crate::layout::{NODE_HEIGHT, NODE_WIDTH};

/// Settings file name
pub const SETTINGS_FILE: &str = "mp-builder.toml";

/// Settings for catalog access and rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the pipeline catalog is fetched from
    pub catalog_url: String,

    /// How long a cached catalog stays fresh
    pub catalog_cache_ttl_secs: u64,

    /// Timeout for the catalog request
    pub catalog_timeout_secs: u64,

    /// Never touch the network
    pub offline: bool,

    /// Node box height in the ASCII rendering
    pub node_height: usize,

    /// Node box width in the ASCII rendering
    pub node_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_cache_ttl_secs: 24 * 60 * 60,
            catalog_timeout_secs: 10,
            offline: false,
            node_height: NODE_HEIGHT,
            node_width: NODE_WIDTH,
        }
    }
}

impl Settings {
    /// Default settings file location for this user
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "mp-builder", "mp-builder")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Load settings.
    ///
    /// An explicit `path` must exist. Without one, the user's settings file
    /// is read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> MpBuilderResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> MpBuilderResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MpBuilderError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> MpBuilderResult<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml("offline = true\nnode_height = 7\n").unwrap();

        assert!(settings.offline);
        assert_eq!(settings.node_height, 7);
        assert_eq!(settings.catalog_url, DEFAULT_CATALOG_URL);
        assert_eq!(settings.node_width, NODE_WIDTH);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            Settings::from_toml("offline = maybe"),
            Err(MpBuilderError::Toml { .. })
        ));
    }

    #[test]
    fn test_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "catalog_url = \"http://localhost:8080/pipelines.json\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.catalog_url, "http://localhost:8080/pipelines.json");

        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(MpBuilderError::FileReadError { .. })
        ));
    }
}
