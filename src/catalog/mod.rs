// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Pipeline catalog lookup
//!
//! The catalog lists known pipelines by name. It is an injected, fallible
//! collaborator: every failure collapses into an empty list, and callers
//! branch on emptiness rather than on error type.

mod cache;
mod remote;

pub use cache::CatalogCache;
pub use remote::{fetch_remote_catalog, parse_remote_catalog, DEFAULT_CATALOG_URL};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::settings::Settings;
use crate::utils::create_spinner;

/// A known pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
}

impl CatalogEntry {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            description: description.into(),
        }
    }
}

/// Source of known pipelines
pub trait Catalog {
    /// All known pipelines; empty when the catalog is unavailable
    fn lookup(&self) -> Vec<CatalogEntry>;
}

/// Find an entry by pipeline name
pub fn find_entry<'a>(entries: &'a [CatalogEntry], name: &str) -> Option<&'a CatalogEntry> {
    entries.iter().find(|e| e.name == name)
}

/// A catalog that is never reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCatalog;

impl Catalog for OfflineCatalog {
    fn lookup(&self) -> Vec<CatalogEntry> {
        Vec::new()
    }
}

/// A fixed, in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

impl Catalog for StaticCatalog {
    fn lookup(&self) -> Vec<CatalogEntry> {
        self.entries.clone()
    }
}

/// Resolve the catalog for this process: disk cache first, then the network.
///
/// Honors offline mode and never fails; the result is meant to be wrapped
/// in a [`StaticCatalog`] and shared for the rest of the run.
pub async fn load_catalog(settings: &Settings) -> Vec<CatalogEntry> {
    if settings.offline {
        tracing::debug!("Offline mode, skipping catalog lookup");
        return Vec::new();
    }

    let cache = CatalogCache::default_location(Duration::from_secs(settings.catalog_cache_ttl_secs));

    if let Some(cached) = cache.as_ref().and_then(|c| c.load(&settings.catalog_url)) {
        tracing::debug!(entries = cached.len(), "Using cached pipeline catalog");
        return cached;
    }

    let spinner = create_spinner("Fetching pipeline catalog...");
    let entries = fetch_remote_catalog(
        &settings.catalog_url,
        Duration::from_secs(settings.catalog_timeout_secs),
    )
    .await;
    spinner.finish_and_clear();

    if !entries.is_empty() {
        if let Some(cache) = cache {
            if let Err(e) = cache.store(&settings.catalog_url, &entries) {
                tracing::debug!("Could not cache pipeline catalog: {}", e);
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_entry() {
        let entries = vec![
            CatalogEntry::new("rnaseq", "loc1", ""),
            CatalogEntry::new("sarek", "loc2", ""),
        ];
        assert_eq!(find_entry(&entries, "sarek").unwrap().location, "loc2");
        assert!(find_entry(&entries, "missing").is_none());
        assert!(OfflineCatalog.lookup().is_empty());
    }

    #[tokio::test]
    async fn test_offline_settings_skip_lookup() {
        let settings = Settings {
            offline: true,
            catalog_url: "http://127.0.0.1:9/pipelines.json".into(),
            ..Settings::default()
        };
        assert!(load_catalog(&settings).await.is_empty());
    }
}
