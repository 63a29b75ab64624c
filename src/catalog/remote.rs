// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Remote catalog in the nf-core `pipelines.json` format

use serde::Deserialize;
use std::time::Duration;

use super::CatalogEntry;
use crate::errors::{MpBuilderError, MpBuilderResult};

/// Where the nf-core project publishes its pipeline list
pub const DEFAULT_CATALOG_URL: &str = "https://nf-co.re/pipelines.json";

#[derive(Debug, Deserialize)]
struct RemoteCatalog {
    #[serde(default)]
    remote_workflows: Vec<RemoteWorkflow>,
}

#[derive(Debug, Deserialize)]
struct RemoteWorkflow {
    name: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "html_url")]
    url: Option<String>,
}

impl From<RemoteWorkflow> for CatalogEntry {
    fn from(wf: RemoteWorkflow) -> Self {
        let location = wf.url.unwrap_or_else(|| {
            let full_name = wf
                .full_name
                .unwrap_or_else(|| format!("nf-core/{}", wf.name));
            format!("https://github.com/{}", full_name)
        });

        CatalogEntry {
            name: wf.name,
            location,
            description: wf.description.unwrap_or_default(),
        }
    }
}

/// Parse a `pipelines.json` body into catalog entries
pub fn parse_remote_catalog(body: &str) -> MpBuilderResult<Vec<CatalogEntry>> {
    let catalog: RemoteCatalog = serde_json::from_str(body).map_err(|e| MpBuilderError::Catalog {
        message: format!("unexpected catalog format: {}", e),
    })?;

    Ok(catalog
        .remote_workflows
        .into_iter()
        .map(CatalogEntry::from)
        .collect())
}

async fn try_fetch(url: &str, timeout: Duration) -> MpBuilderResult<Vec<CatalogEntry>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("mp-builder/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| MpBuilderError::Catalog {
            message: e.to_string(),
        })?;

    let body = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| MpBuilderError::Catalog {
            message: e.to_string(),
        })?
        .text()
        .await
        .map_err(|e| MpBuilderError::Catalog {
            message: e.to_string(),
        })?;

    parse_remote_catalog(&body)
}

/// Download the catalog. Any failure yields an empty list.
pub async fn fetch_remote_catalog(url: &str, timeout: Duration) -> Vec<CatalogEntry> {
    match try_fetch(url, timeout).await {
        Ok(entries) => {
            tracing::debug!(url, entries = entries.len(), "Fetched pipeline catalog");
            entries
        }
        Err(e) => {
            tracing::warn!("Pipeline catalog unavailable ({}): {}", url, e);
            Vec::new()
        }
    }
}
