// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Validate command - check a meta-pipeline document

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::{open_graph, with_hint};
use crate::settings::Settings;

/// Run the validate command
pub async fn run(config_path: PathBuf, settings: Settings, verbose: bool) -> Result<()> {
    println!("{}", "Validating meta-pipeline...".bold());
    println!();

    let (validated, graph) = match open_graph(&config_path, &settings).await {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("  {} {}", "✗".red(), config_path.display());
            return Err(with_hint(e).into());
        }
    };

    println!(
        "  {} Document is valid (config_version {})",
        "✓".green(),
        validated.version
    );
    println!(
        "  {} {} step(s), {} transition(s), no cycles",
        "✓".green(),
        graph.step_count(),
        graph.transition_count()
    );

    if verbose {
        println!();
        println!("{}:", "Steps".bold());
        for node in graph.nodes().filter(|n| !n.is_root) {
            let location = node.location().unwrap_or("-");
            let source = if node.is_cataloged { " [catalog]" } else { "" };
            println!(
                "    - {} ({}) {}{}",
                node.id,
                node.label(),
                location.dimmed(),
                source.dimmed()
            );
        }
    }

    println!();

    if validated.has_warnings() {
        println!("{}", "Meta-pipeline is valid but has warnings.".yellow().bold());
    } else {
        println!("{}", "Meta-pipeline is valid!".green().bold());
    }
    Ok(())
}
