// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! On-disk cache for catalog downloads
//!
//! One JSON file per catalog URL, named by the BLAKE3 hash of the URL.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::CatalogEntry;
use crate::errors::{MpBuilderError, MpBuilderResult};

#[derive(Debug, Serialize, Deserialize)]
struct CachedCatalog {
    url: String,
    fetched_at: u64,
    entries: Vec<CatalogEntry>,
}

/// Filesystem cache of fetched catalogs
pub struct CatalogCache {
    dir: PathBuf,
    ttl: Duration,
}

impl CatalogCache {
    pub fn new(dir: PathBuf, ttl: Duration) -> Self {
        Self { dir, ttl }
    }

    /// Cache under the platform cache directory, if one can be determined
    pub fn default_location(ttl: Duration) -> Option<Self> {
        ProjectDirs::from("org", "mp-builder", "mp-builder")
            .map(|dirs| Self::new(dirs.cache_dir().join("catalog"), ttl))
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        let key = blake3::hash(url.as_bytes()).to_hex();
        self.dir.join(format!("{}.json", key))
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    /// Cached entries for `url`, unless missing, unreadable or expired
    pub fn load(&self, url: &str) -> Option<Vec<CatalogEntry>> {
        let content = std::fs::read_to_string(self.cache_path(url)).ok()?;
        let cached: CachedCatalog = serde_json::from_str(&content).ok()?;

        if cached.url != url {
            return None;
        }

        let age = Self::now().saturating_sub(cached.fetched_at);
        if age > self.ttl.as_secs() {
            tracing::debug!(url, age, "Cached catalog expired");
            return None;
        }

        Some(cached.entries)
    }

    /// Store entries for `url`
    pub fn store(&self, url: &str, entries: &[CatalogEntry]) -> MpBuilderResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| MpBuilderError::Catalog {
            message: format!("Failed to create cache directory: {}", e),
        })?;

        let cached = CachedCatalog {
            url: url.to_string(),
            fetched_at: Self::now(),
            entries: entries.to_vec(),
        };

        let path = self.cache_path(url);
        let json = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, json).map_err(|e| MpBuilderError::FileWriteError {
            path,
            error: e.to_string(),
        })
    }

    /// Drop the cached copy for `url`
    pub fn invalidate(&self, url: &str) {
        let _ = std::fs::remove_file(self.cache_path(url));
    }
}
