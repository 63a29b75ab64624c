// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Catalog command - list known pipelines

use colored::Colorize;
use miette::Result;
use std::time::Duration;

use crate::catalog::{load_catalog, CatalogCache};
use crate::settings::Settings;
use crate::utils::print_warning;

/// Run the catalog command
pub async fn run(filter: Option<String>, refresh: bool, settings: Settings, verbose: bool) -> Result<()> {
    if refresh {
        if let Some(cache) =
            CatalogCache::default_location(Duration::from_secs(settings.catalog_cache_ttl_secs))
        {
            cache.invalidate(&settings.catalog_url);
        }
    }

    let entries = load_catalog(&settings).await;
    if entries.is_empty() {
        print_warning("Pipeline catalog is unavailable");
        return Ok(());
    }

    let needle = filter.as_deref().map(str::to_lowercase);
    let shown: Vec<_> = entries
        .iter()
        .filter(|e| needle.as_ref().map_or(true, |n| e.name.to_lowercase().contains(n.as_str())))
        .collect();

    for entry in &shown {
        println!("{} {}", format!("{:<28}", entry.name).bold(), entry.location.dimmed());
        if verbose && !entry.description.is_empty() {
            println!("    {}", entry.description);
        }
    }

    println!();
    println!("{} of {} pipeline(s)", shown.len(), entries.len());
    Ok(())
}
